//! Second-order tensors built from outer products of frame vectors.
use std::{
    array,
    collections::BTreeMap,
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Mul, Neg, Sub},
};

use nox_sym::Expr;
use tracing::warn;

use crate::{Axis, Basis, Matrix3, ReferenceFrame, Result, Vector};

/// A finite sum of `coeff * (a | b)` terms over frame unit vectors.
#[derive(Clone, Default)]
pub struct Dyadic(BTreeMap<(Basis, Basis), Expr>);

impl Dyadic {
    pub fn zero() -> Self {
        Dyadic::default()
    }

    pub fn terms(&self) -> impl Iterator<Item = (&(Basis, Basis), &Expr)> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn insert_add(&mut self, key: (Basis, Basis), coeff: Expr) {
        let sum = match self.0.remove(&key) {
            Some(prev) => prev + coeff,
            None => coeff,
        };
        if !sum.is_zero() {
            self.0.insert(key, sum);
        }
    }

    pub(crate) fn auto_simplify(self) -> Self {
        match self.0.keys().next() {
            Some((b, _)) if b.frame.auto_simplify() => self.simplify(),
            _ => self,
        }
    }

    fn map_coeffs(&self, mut f: impl FnMut(&Expr) -> Expr) -> Self {
        let mut out = Dyadic::zero();
        for (k, c) in &self.0 {
            out.insert_add(k.clone(), f(c));
        }
        out
    }

    pub fn simplify(&self) -> Self {
        self.map_coeffs(Expr::simplify)
    }

    pub fn subs(&self, var: &Expr, value: &Expr) -> Result<Self> {
        let mut out = Dyadic::zero();
        for (k, c) in &self.0 {
            out.insert_add(k.clone(), c.subs(var, value)?);
        }
        Ok(out)
    }

    /// `self · v`: contracts the second slot.
    pub fn dot_vector(&self, v: &Vector) -> Result<Vector> {
        let mut out = Vector::zero();
        for ((a, b), c) in &self.0 {
            let k = Vector::unit(b.clone()).dot(v)?;
            out += Vector::unit(a.clone()) * (c * &k);
        }
        Ok(out.auto_simplify())
    }

    /// `v · self`: contracts the first slot.
    pub fn vector_dot(&self, v: &Vector) -> Result<Vector> {
        let mut out = Vector::zero();
        for ((a, b), c) in &self.0 {
            let k = v.dot(&Vector::unit(a.clone()))?;
            out += Vector::unit(b.clone()) * (c * &k);
        }
        Ok(out.auto_simplify())
    }

    /// `self · other`: contracts the inner pair of slots.
    pub fn dot_dyadic(&self, other: &Dyadic) -> Result<Dyadic> {
        let mut out = Dyadic::zero();
        for ((a, b), c1) in &self.0 {
            for ((d, e), c2) in &other.0 {
                let k = Vector::unit(b.clone()).dot(&Vector::unit(d.clone()))?;
                out.insert_add((a.clone(), e.clone()), c1 * c2 * k);
            }
        }
        Ok(out.auto_simplify())
    }

    /// `self × v`: crosses `v` into the second slot.
    pub fn cross_vector(&self, v: &Vector) -> Result<Dyadic> {
        let mut out = Dyadic::zero();
        for ((a, b), c) in &self.0 {
            let crossed = Vector::unit(b.clone()).cross(v)?;
            out += &(Vector::unit(a.clone()) * c.clone()).outer(&crossed);
        }
        Ok(out.auto_simplify())
    }

    /// `v × self`: crosses `v` into the first slot.
    pub fn vector_cross(&self, v: &Vector) -> Result<Dyadic> {
        let mut out = Dyadic::zero();
        for ((a, b), c) in &self.0 {
            let crossed = v.cross(&Vector::unit(a.clone()))?;
            out += &(crossed * c.clone()).outer(&Vector::unit(b.clone()));
        }
        Ok(out.auto_simplify())
    }

    /// Re-expresses both slots in `frame`.
    pub fn express(&self, frame: &ReferenceFrame) -> Result<Dyadic> {
        self.express_pair(frame, frame)
    }

    /// Re-expresses the first slot in `first` and the second in `second`.
    pub fn express_pair(&self, first: &ReferenceFrame, second: &ReferenceFrame) -> Result<Dyadic> {
        let mut out = Dyadic::zero();
        for ((a, b), c) in &self.0 {
            let a = Vector::unit(a.clone()).express(first)?;
            let b = Vector::unit(b.clone()).express(second)?;
            out += &(a * c.clone()).outer(&b);
        }
        Ok(out.auto_simplify())
    }

    /// Components `first.i · self · first.j`.
    pub fn to_matrix(&self, frame: &ReferenceFrame) -> Result<Matrix3> {
        self.to_matrix_pair(frame, frame)
    }

    pub fn to_matrix_pair(
        &self,
        first: &ReferenceFrame,
        second: &ReferenceFrame,
    ) -> Result<Matrix3> {
        let rows = self.express_pair(first, second)?;
        Ok(Matrix3(array::from_fn(|i| {
            array::from_fn(|j| match (Axis::from_index(i), Axis::from_index(j)) {
                (Some(ai), Some(aj)) => rows
                    .0
                    .get(&(first.basis(ai), second.basis(aj)))
                    .cloned()
                    .unwrap_or_default(),
                _ => Expr::zero(),
            })
        })))
    }

    /// Time derivative in `frame`, by the product rule over each slot.
    pub fn dt(&self, frame: &ReferenceFrame) -> Result<Dyadic> {
        let mut out = Dyadic::zero();
        for ((a, b), c) in &self.0 {
            let (ua, ub) = (Vector::unit(a.clone()), Vector::unit(b.clone()));
            out.insert_add((a.clone(), b.clone()), c.try_dt()?);
            out += &(ua.dt(frame)? * c.clone()).outer(&ub);
            out += &(ua * c.clone()).outer(&ub.dt(frame)?);
        }
        Ok(out)
    }

    /// Equality that reports unconnected frames as an error.
    pub fn try_eq(&self, other: &Dyadic) -> Result<bool> {
        let diff = self - other;
        let Some(frame) = diff.0.keys().next().map(|(a, _)| a.frame.clone()) else {
            return Ok(true);
        };
        Ok(diff.express(&frame)?.is_empty())
    }
}

impl PartialEq for Dyadic {
    fn eq(&self, other: &Self) -> bool {
        match self.try_eq(other) {
            Ok(eq) => eq,
            Err(err) => {
                warn!(%err, "comparing dyadics across unconnected frames");
                false
            }
        }
    }
}

impl PartialEq<i64> for Dyadic {
    fn eq(&self, other: &i64) -> bool {
        *other == 0 && *self == Dyadic::zero()
    }
}

impl fmt::Display for Dyadic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("0");
        }
        for (i, ((a, b), c)) in self.0.iter().enumerate() {
            if i != 0 {
                f.write_str(" + ")?;
            }
            if *c == 1 {
                write!(f, "({a}|{b})")?;
            } else {
                write!(f, "({c})*({a}|{b})")?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Dyadic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl AddAssign<&Dyadic> for Dyadic {
    fn add_assign(&mut self, rhs: &Dyadic) {
        for (k, c) in &rhs.0 {
            self.insert_add(k.clone(), c.clone());
        }
    }
}

impl Add<&Dyadic> for &Dyadic {
    type Output = Dyadic;

    fn add(self, rhs: &Dyadic) -> Dyadic {
        let mut out = self.clone();
        out += rhs;
        out
    }
}

impl Add for Dyadic {
    type Output = Dyadic;

    fn add(mut self, rhs: Dyadic) -> Dyadic {
        self += &rhs;
        self
    }
}

impl Neg for &Dyadic {
    type Output = Dyadic;

    fn neg(self) -> Dyadic {
        self.map_coeffs(|c| -c)
    }
}

impl Neg for Dyadic {
    type Output = Dyadic;

    fn neg(self) -> Dyadic {
        -&self
    }
}

impl Sub<&Dyadic> for &Dyadic {
    type Output = Dyadic;

    fn sub(self, rhs: &Dyadic) -> Dyadic {
        self + &(-rhs)
    }
}

impl Sub for Dyadic {
    type Output = Dyadic;

    fn sub(self, rhs: Dyadic) -> Dyadic {
        &self - &rhs
    }
}

impl Mul<&Expr> for &Dyadic {
    type Output = Dyadic;

    fn mul(self, rhs: &Expr) -> Dyadic {
        self.map_coeffs(|c| c * rhs)
    }
}

impl Mul<Expr> for Dyadic {
    type Output = Dyadic;

    fn mul(self, rhs: Expr) -> Dyadic {
        &self * &rhs
    }
}

impl Mul<Dyadic> for Expr {
    type Output = Dyadic;

    fn mul(self, rhs: Dyadic) -> Dyadic {
        &rhs * &self
    }
}

impl Mul<&Dyadic> for &Expr {
    type Output = Dyadic;

    fn mul(self, rhs: &Dyadic) -> Dyadic {
        rhs * self
    }
}

impl Mul<Dyadic> for &Expr {
    type Output = Dyadic;

    fn mul(self, rhs: Dyadic) -> Dyadic {
        &rhs * self
    }
}

impl Sum for Dyadic {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Dyadic::zero(), |acc, d| acc + d)
    }
}
