//! Frame-aware symbolic vectors.
use std::{
    array,
    collections::{BTreeMap, BTreeSet},
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, BitOr, Mul, Neg, Sub, SubAssign},
};

use nox_sym::Expr;
use tracing::warn;

use crate::{Axis, Dyadic, ReferenceFrame, Result};

/// A unit vector of a specific frame.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Basis {
    pub frame: ReferenceFrame,
    pub axis: Axis,
}

impl fmt::Display for Basis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.frame, self.axis)
    }
}

/// A finite sum of scaled unit vectors, possibly spanning several frames.
///
/// Coefficients are never zero, so the zero vector is the empty map. Two
/// vectors compare equal when their difference, re-expressed in a single
/// frame, is empty.
#[derive(Clone, Default)]
pub struct Vector(BTreeMap<Basis, Expr>);

impl Vector {
    pub fn zero() -> Self {
        Vector::default()
    }

    pub fn unit(basis: Basis) -> Self {
        Vector(BTreeMap::from([(basis, Expr::one())]))
    }

    /// `c[0] * frame.x + c[1] * frame.y + c[2] * frame.z`.
    pub fn from_components(frame: &ReferenceFrame, c: [Expr; 3]) -> Self {
        Axis::ALL
            .into_iter()
            .zip(c)
            .map(|(axis, e)| (frame.basis(axis), e))
            .collect()
    }

    pub fn terms(&self) -> impl Iterator<Item = (&Basis, &Expr)> {
        self.0.iter()
    }

    pub fn coeff(&self, basis: &Basis) -> Expr {
        self.0.get(basis).cloned().unwrap_or_default()
    }

    /// True when no terms are stored. A non-empty vector may still be zero
    /// once its frames are combined; compare with `== 0` for that.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn frames(&self) -> BTreeSet<ReferenceFrame> {
        self.0.keys().map(|b| b.frame.clone()).collect()
    }

    /// Components grouped by frame.
    pub(crate) fn by_frame(&self) -> BTreeMap<ReferenceFrame, [Expr; 3]> {
        let mut out: BTreeMap<ReferenceFrame, [Expr; 3]> = BTreeMap::new();
        for (basis, coeff) in &self.0 {
            out.entry(basis.frame.clone()).or_default()[basis.axis.index()] = coeff.clone();
        }
        out
    }

    fn insert_add(&mut self, basis: Basis, coeff: Expr) {
        let sum = match self.0.remove(&basis) {
            Some(prev) => prev + coeff,
            None => coeff,
        };
        if !sum.is_zero() {
            self.0.insert(basis, sum);
        }
    }

    pub fn map_coeffs(&self, mut f: impl FnMut(&Expr) -> Expr) -> Self {
        self.0.iter().map(|(b, c)| (b.clone(), f(c))).collect()
    }

    pub fn try_map_coeffs(&self, mut f: impl FnMut(&Expr) -> Result<Expr>) -> Result<Self> {
        let mut out = Vector::zero();
        for (b, c) in &self.0 {
            out.insert_add(b.clone(), f(c)?);
        }
        Ok(out)
    }

    pub(crate) fn auto_simplify(self) -> Self {
        match self.0.keys().next() {
            Some(b) if b.frame.auto_simplify() => self.simplify(),
            _ => self,
        }
    }

    pub fn simplify(&self) -> Self {
        self.map_coeffs(Expr::simplify)
    }

    pub fn subs(&self, var: &Expr, value: &Expr) -> Result<Self> {
        self.try_map_coeffs(|c| Ok(c.subs(var, value)?))
    }

    /// Components of the vector in `frame`.
    pub fn to_matrix(&self, frame: &ReferenceFrame) -> Result<[Expr; 3]> {
        let expressed = self.express(frame)?;
        Ok(array::from_fn(|i| {
            Axis::from_index(i)
                .map(|axis| expressed.coeff(&frame.basis(axis)))
                .unwrap_or_default()
        }))
    }

    /// The scalar product, re-expressing `other` into each frame of `self`.
    pub fn dot(&self, other: &Vector) -> Result<Expr> {
        let mut out = Expr::zero();
        for (frame, a) in self.by_frame() {
            for (other_frame, b) in other.by_frame() {
                let b = if other_frame == frame {
                    b
                } else {
                    other_frame.dcm(&frame)?.dot(&b)
                };
                out += a.iter().zip(&b).map(|(x, y)| x * y).sum::<Expr>();
            }
        }
        if self.frames().first().is_some_and(ReferenceFrame::auto_simplify) {
            out = out.simplify();
        }
        Ok(out)
    }

    /// The vector product. Each frame of `self` receives the part of the
    /// result computed with `other` re-expressed in that frame.
    pub fn cross(&self, other: &Vector) -> Result<Vector> {
        let mut out = Vector::zero();
        for (frame, a) in self.by_frame() {
            let b = other.to_matrix(&frame)?;
            let c = [
                &a[1] * &b[2] - &a[2] * &b[1],
                &a[2] * &b[0] - &a[0] * &b[2],
                &a[0] * &b[1] - &a[1] * &b[0],
            ];
            out += Vector::from_components(&frame, c);
        }
        Ok(out.auto_simplify())
    }

    /// The dyadic `self ⊗ other`.
    pub fn outer(&self, other: &Vector) -> Dyadic {
        let mut out = Dyadic::zero();
        for (a, ca) in &self.0 {
            for (b, cb) in &other.0 {
                out.insert_add((a.clone(), b.clone()), ca * cb);
            }
        }
        out.auto_simplify()
    }

    pub fn magnitude(&self) -> Result<Expr> {
        Ok(self.dot(self)?.sqrt())
    }

    pub fn normalize(&self) -> Result<Vector> {
        let mag = self.magnitude()?;
        if mag.is_zero() {
            return Err(nox_sym::Error::DivisionByZero.into());
        }
        self.try_map_coeffs(|c| Ok(c.checked_div(&mag)?))
    }

    /// Partial derivative with respect to `var`, taken in `frame`.
    ///
    /// Terms whose frame's orientation relative to `frame` does not involve
    /// `var` are differentiated in place; the rest are first re-expressed in
    /// `frame`.
    pub fn diff(&self, var: &Expr, frame: &ReferenceFrame) -> Result<Vector> {
        let mut out = Vector::zero();
        for (component_frame, c) in self.by_frame() {
            let part = Vector::from_components(&component_frame, c);
            if component_frame == *frame || frame.dcm(&component_frame)?.diff(var)?.is_zero() {
                out += part.try_map_coeffs(|e| Ok(e.diff(var)?))?;
            } else {
                let expressed = part.to_matrix(frame)?;
                let mut d = array::from_fn(|_| Expr::zero());
                for (slot, e) in d.iter_mut().zip(&expressed) {
                    *slot = e.diff(var)?;
                }
                out += Vector::from_components(frame, d);
            }
        }
        Ok(out)
    }

    /// Time derivative as seen from `frame`, using the transport theorem for
    /// every term fixed in another frame.
    pub fn dt(&self, frame: &ReferenceFrame) -> Result<Vector> {
        let mut out = Vector::zero();
        for (component_frame, c) in self.by_frame() {
            let part = Vector::from_components(&component_frame, c);
            out += part.try_map_coeffs(|e| Ok(e.try_dt()?))?;
            if component_frame != *frame {
                out += component_frame.ang_vel_in(frame)?.cross(&part)?;
            }
        }
        Ok(out)
    }

    /// Equality that reports unconnected frames as an error.
    pub fn try_eq(&self, other: &Vector) -> Result<bool> {
        let diff = self - other;
        let Some(frame) = diff.0.keys().next().map(|b| b.frame.clone()) else {
            return Ok(true);
        };
        Ok(diff.express(&frame)?.is_empty())
    }
}

impl FromIterator<(Basis, Expr)> for Vector {
    fn from_iter<I: IntoIterator<Item = (Basis, Expr)>>(iter: I) -> Self {
        let mut out = Vector::zero();
        for (basis, coeff) in iter {
            out.insert_add(basis, coeff);
        }
        out
    }
}

impl PartialEq for Vector {
    fn eq(&self, other: &Self) -> bool {
        match self.try_eq(other) {
            Ok(eq) => eq,
            Err(err) => {
                warn!(%err, "comparing vectors across unconnected frames");
                false
            }
        }
    }
}

/// Only `0` compares equal, and only to the zero vector.
impl PartialEq<i64> for Vector {
    fn eq(&self, other: &i64) -> bool {
        *other == 0 && *self == Vector::zero()
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("0");
        }
        for (i, (basis, coeff)) in self.0.iter().enumerate() {
            if i != 0 {
                f.write_str(" + ")?;
            }
            if *coeff == 1 {
                write!(f, "{basis}")?;
            } else {
                write!(f, "({coeff})*{basis}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl Add<&Vector> for &Vector {
    type Output = Vector;

    fn add(self, rhs: &Vector) -> Vector {
        let mut out = self.clone();
        out += rhs;
        out
    }
}

impl Add<Vector> for Vector {
    type Output = Vector;

    fn add(mut self, rhs: Vector) -> Vector {
        self += rhs;
        self
    }
}

impl Add<&Vector> for Vector {
    type Output = Vector;

    fn add(mut self, rhs: &Vector) -> Vector {
        self += rhs;
        self
    }
}

impl AddAssign<&Vector> for Vector {
    fn add_assign(&mut self, rhs: &Vector) {
        for (b, c) in &rhs.0 {
            self.insert_add(b.clone(), c.clone());
        }
    }
}

impl AddAssign<Vector> for Vector {
    fn add_assign(&mut self, rhs: Vector) {
        for (b, c) in rhs.0 {
            self.insert_add(b, c);
        }
    }
}

impl Neg for &Vector {
    type Output = Vector;

    fn neg(self) -> Vector {
        self.map_coeffs(|c| -c)
    }
}

impl Neg for Vector {
    type Output = Vector;

    fn neg(self) -> Vector {
        -&self
    }
}

impl Sub<&Vector> for &Vector {
    type Output = Vector;

    fn sub(self, rhs: &Vector) -> Vector {
        self + &(-rhs)
    }
}

impl Sub<Vector> for Vector {
    type Output = Vector;

    fn sub(self, rhs: Vector) -> Vector {
        self + (-rhs)
    }
}

impl Sub<&Vector> for Vector {
    type Output = Vector;

    fn sub(self, rhs: &Vector) -> Vector {
        self + (-rhs)
    }
}

impl SubAssign<&Vector> for Vector {
    fn sub_assign(&mut self, rhs: &Vector) {
        *self += -rhs;
    }
}

impl Mul<&Expr> for &Vector {
    type Output = Vector;

    fn mul(self, rhs: &Expr) -> Vector {
        self.map_coeffs(|c| c * rhs)
    }
}

impl Mul<Expr> for Vector {
    type Output = Vector;

    fn mul(self, rhs: Expr) -> Vector {
        &self * &rhs
    }
}

impl Mul<&Vector> for &Expr {
    type Output = Vector;

    fn mul(self, rhs: &Vector) -> Vector {
        rhs * self
    }
}

impl Mul<Vector> for &Expr {
    type Output = Vector;

    fn mul(self, rhs: Vector) -> Vector {
        &rhs * self
    }
}

impl Mul<Vector> for Expr {
    type Output = Vector;

    fn mul(self, rhs: Vector) -> Vector {
        &rhs * &self
    }
}

impl Mul<Vector> for i64 {
    type Output = Vector;

    fn mul(self, rhs: Vector) -> Vector {
        &rhs * &Expr::int(self)
    }
}

impl Mul<&Vector> for i64 {
    type Output = Vector;

    fn mul(self, rhs: &Vector) -> Vector {
        rhs * &Expr::int(self)
    }
}

impl BitOr<&Vector> for &Vector {
    type Output = Dyadic;

    fn bitor(self, rhs: &Vector) -> Dyadic {
        self.outer(rhs)
    }
}

impl BitOr<Vector> for Vector {
    type Output = Dyadic;

    fn bitor(self, rhs: Vector) -> Dyadic {
        self.outer(&rhs)
    }
}

impl Sum for Vector {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Vector::zero(), |acc, v| acc + v)
    }
}

impl<'a> Sum<&'a Vector> for Vector {
    fn sum<I: Iterator<Item = &'a Vector>>(iter: I) -> Self {
        iter.fold(Vector::zero(), |acc, v| acc + v)
    }
}
