//! The `Expr` value type and the rational functions backing it.
use std::{fmt, sync::Arc};

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive};

use crate::{
    Error, Result,
    atom::{Atom, Symbol},
    poly::{Coeff, Monomial, Poly, int},
    trig,
};

/// A quotient of two normalized polynomials.
///
/// The denominator is never zero, is `1` whenever it is a constant, shares no
/// monomial factor with the numerator and has a leading coefficient of one.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct Frac {
    pub(crate) num: Poly,
    pub(crate) den: Poly,
}

impl Frac {
    pub(crate) fn zero() -> Frac {
        Frac::poly(Poly::zero())
    }

    pub(crate) fn one() -> Frac {
        Frac::poly(Poly::one())
    }

    pub(crate) fn poly(num: Poly) -> Frac {
        Frac {
            num,
            den: Poly::one(),
        }
    }

    pub(crate) fn constant(c: Coeff) -> Frac {
        Frac::poly(Poly::constant(c))
    }

    pub(crate) fn atom(atom: Atom) -> Frac {
        Frac::poly(Poly::atom(atom))
    }

    /// Normalizes `num / den`. `den` must not be zero.
    pub(crate) fn new(num: Poly, den: Poly) -> Frac {
        if num.is_zero() {
            return Frac::zero();
        }
        if let Some(c) = den.as_constant() {
            return Frac::poly(num.scale(&c.recip()));
        }
        let common = num.content().gcd(&den.content());
        let (num, den) = match (num.div_monomial(&common), den.div_monomial(&common)) {
            (Some(n), Some(d)) if !common.is_one() => (n, d),
            _ => (num, den),
        };
        if let Some(c) = den.as_constant() {
            return Frac::poly(num.scale(&c.recip()));
        }
        let Some((lead, lc)) = den.leading().map(|(m, c)| (m.clone(), c.clone())) else {
            return Frac::poly(num);
        };
        let (num, den) = if lc.is_one() {
            (num, den)
        } else {
            let inv = lc.recip();
            (num.scale(&inv), den.scale(&inv))
        };
        if num.terms.len() == den.terms.len() {
            if let Some(k) = num.terms.get(&lead) {
                let k = k.clone();
                if num == den.scale(&k) {
                    return Frac::constant(k);
                }
            }
        }
        Frac { num, den }
    }

    pub(crate) fn is_zero(&self) -> bool {
        self.num.is_zero()
    }

    pub(crate) fn is_poly(&self) -> bool {
        self.den.is_one()
    }

    pub(crate) fn is_time(&self) -> bool {
        self.is_poly() && self.num == Poly::atom(Atom::time())
    }

    pub(crate) fn as_constant(&self) -> Option<Coeff> {
        if self.is_poly() {
            self.num.as_constant()
        } else {
            None
        }
    }

    pub(crate) fn depends_on(&self, var: &Atom) -> bool {
        self.num.depends_on(var) || self.den.depends_on(var)
    }

    pub(crate) fn add(&self, other: &Frac) -> Frac {
        let sum = if self.den == other.den {
            if self.is_poly() {
                Frac::poly(self.num.add(&other.num))
            } else {
                Frac::new(self.num.add(&other.num), self.den.clone())
            }
        } else {
            Frac::new(
                self.num.mul(&other.den).add(&other.num.mul(&self.den)),
                self.den.mul(&other.den),
            )
        };
        trig::harmonize(&sum).unwrap_or(sum)
    }

    pub(crate) fn neg(&self) -> Frac {
        Frac {
            num: self.num.neg(),
            den: self.den.clone(),
        }
    }

    pub(crate) fn sub(&self, other: &Frac) -> Frac {
        self.add(&other.neg())
    }

    pub(crate) fn mul(&self, other: &Frac) -> Frac {
        if self.is_poly() && other.is_poly() {
            return Frac::poly(self.num.mul(&other.num));
        }
        Frac::new(self.num.mul(&other.num), self.den.mul(&other.den))
    }

    pub(crate) fn div(&self, other: &Frac) -> Result<Frac> {
        if other.is_zero() {
            return Err(Error::DivisionByZero);
        }
        Ok(Frac::new(
            self.num.mul(&other.den),
            self.den.mul(&other.num),
        ))
    }

    /// Divides by a polynomial known to be non-zero.
    pub(crate) fn div_poly(&self, den: &Poly) -> Frac {
        Frac::new(self.num.clone(), self.den.mul(den))
    }

    pub(crate) fn pow(&self, n: u32) -> Frac {
        if self.is_poly() {
            return Frac::poly(self.num.pow(n));
        }
        Frac::new(self.num.pow(n), self.den.pow(n))
    }

    /// The square root, pulling out every factor it can. Symbols are taken as
    /// non-negative, so `sqrt(x^2) = x`.
    pub(crate) fn sqrt(&self) -> Frac {
        if self.is_poly() {
            return Frac::poly(sqrt_poly(&self.num));
        }
        Frac::new(sqrt_poly(&self.num.mul(&self.den)), self.den.clone())
    }

    /// True when the numerator's leading coefficient is negative.
    pub(crate) fn is_negative(&self) -> bool {
        self.num.leading().is_some_and(|(_, c)| c.is_negative())
    }
}

fn sqrt_poly(p: &Poly) -> Poly {
    if p.is_zero() {
        return Poly::zero();
    }
    if p.terms.len() == 1 {
        let Some((m, c)) = p.terms.iter().next() else {
            return Poly::zero();
        };
        if let Some((root, rest)) = sqrt_rational(c) {
            let mut outside = Monomial::one();
            let mut inside = Monomial::one();
            for (a, e) in &m.0 {
                if e / 2 > 0 {
                    outside.0.push((a.clone(), e / 2));
                }
                if e % 2 == 1 {
                    inside.0.push((a.clone(), 1));
                }
            }
            let radicand = Poly::term(inside, rest);
            let root_of_rest = if radicand.is_one() {
                Poly::one()
            } else {
                Poly::atom(Atom::Sqrt(Arc::new(radicand)))
            };
            return Poly::term(outside, root).mul(&root_of_rest);
        }
    }
    Poly::atom(Atom::Sqrt(Arc::new(p.clone())))
}

/// Splits a positive rational `c` into `root^2 * rest` with `rest` a squarefree integer.
pub(crate) fn sqrt_rational(c: &Coeff) -> Option<(Coeff, Coeff)> {
    if !c.is_positive() {
        return None;
    }
    let n = (c.numer() * c.denom()).to_u64()?;
    if n > 1 << 40 {
        return None;
    }
    let (mut n, mut root, mut rest) = (n, 1u64, 1u64);
    let mut p = 2u64;
    while p * p <= n {
        let mut count = 0;
        while n % p == 0 {
            n /= p;
            count += 1;
        }
        root *= p.pow(count / 2);
        if count % 2 == 1 {
            rest *= p;
        }
        p += 1;
    }
    rest *= n;
    let root = Coeff::new(BigInt::from(root), c.denom().clone());
    Some((root, Coeff::from_integer(BigInt::from(rest))))
}

/// An exact symbolic scalar.
///
/// Expressions are immutable and always stored in normal form: polynomial
/// parts are expanded with like terms collected, trigonometric functions are
/// reduced modulo `sin^2 + cos^2 = 1`, and sums inside `sin`/`cos` are split
/// with the angle addition formulas. Equality is semantic: `a == b` holds
/// exactly when `a - b` normalizes to zero.
#[derive(Clone)]
pub struct Expr(pub(crate) Arc<Frac>);

impl Expr {
    pub(crate) fn from_frac(frac: Frac) -> Expr {
        Expr(Arc::new(frac))
    }

    pub(crate) fn from_poly(poly: Poly) -> Expr {
        Expr::from_frac(Frac::poly(poly))
    }

    pub(crate) fn frac(&self) -> &Frac {
        &self.0
    }

    pub(crate) fn as_atom(&self) -> Option<&Atom> {
        let frac = self.frac();
        if !frac.is_poly() || frac.num.terms.len() != 1 {
            return None;
        }
        let (m, c) = frac.num.terms.iter().next()?;
        match &m.0[..] {
            [(atom, 1)] if c.is_one() => Some(atom),
            _ => None,
        }
    }

    pub(crate) fn as_variable(&self) -> Result<&Atom> {
        self.as_atom()
            .filter(|a| a.is_variable())
            .ok_or_else(|| Error::NotAVariable(self.to_string()))
    }

    pub fn zero() -> Expr {
        Expr::from_frac(Frac::zero())
    }

    pub fn one() -> Expr {
        Expr::from_frac(Frac::one())
    }

    pub fn int(n: i64) -> Expr {
        Expr::from_frac(Frac::constant(int(n)))
    }

    /// Creates the exact rational `num / den`.
    ///
    /// # Panics
    /// Panics if `den` is zero.
    pub fn rational(num: i64, den: i64) -> Expr {
        Expr::from_frac(Frac::constant(BigRational::new(
            BigInt::from(num),
            BigInt::from(den),
        )))
    }

    pub fn pi() -> Expr {
        Expr::from_frac(Frac::atom(Atom::Pi))
    }

    /// A constant symbol.
    pub fn symbol(name: impl AsRef<str>) -> Expr {
        Expr::from_frac(Frac::atom(Atom::Symbol(Symbol::new(name))))
    }

    /// Creates one symbol per whitespace or comma separated name.
    pub fn symbols(names: &str) -> Vec<Expr> {
        split_names(names).map(Expr::symbol).collect()
    }

    /// The time symbol `t`.
    pub fn time() -> Expr {
        Expr::from_frac(Frac::atom(Atom::time()))
    }

    /// A function of time, such as a generalized coordinate `q(t)`.
    pub fn dynamic(name: impl AsRef<str>) -> Expr {
        Expr::from_frac(Frac::atom(Atom::Dynamic {
            name: Symbol::new(name),
            order: 0,
        }))
    }

    /// Creates one dynamic symbol per whitespace or comma separated name.
    pub fn dynamic_symbols(names: &str) -> Vec<Expr> {
        split_names(names).map(Expr::dynamic).collect()
    }

    pub fn sin(&self) -> Expr {
        Expr::from_poly(trig::sin_cos(self.frac()).0)
    }

    pub fn cos(&self) -> Expr {
        Expr::from_poly(trig::sin_cos(self.frac()).1)
    }

    pub fn tan(&self) -> Result<Expr> {
        let (sin, cos) = trig::sin_cos(self.frac());
        Ok(Expr::from_frac(Frac::poly(sin).div(&Frac::poly(cos))?))
    }

    /// Square root under the assumption that every symbol is non-negative.
    ///
    /// Numbers use the principal root, so `sqrt((-2)^2) = 2`, but an even
    /// power of a symbol is taken out unchanged: `sqrt(x^2) = x`, not `|x|`.
    pub fn sqrt(&self) -> Expr {
        Expr::from_frac(self.frac().sqrt())
    }

    pub fn pow(&self, n: u32) -> Expr {
        Expr::from_frac(self.frac().pow(n))
    }

    /// Integer power, allowing negative exponents.
    pub fn powi(&self, n: i32) -> Result<Expr> {
        let pos = self.pow(n.unsigned_abs());
        if n >= 0 {
            Ok(pos)
        } else {
            Expr::one().checked_div(&pos)
        }
    }

    pub fn checked_div(&self, rhs: &Expr) -> Result<Expr> {
        Ok(Expr::from_frac(self.frac().div(rhs.frac())?))
    }

    pub fn is_zero(&self) -> bool {
        self.frac().is_zero()
    }

    /// True if the expression contains no symbols or functions.
    pub fn is_number(&self) -> bool {
        self.as_rational().is_some()
    }

    /// True if the expression does not depend on any symbol or dynamic symbol.
    pub fn is_constant(&self) -> bool {
        let frac = self.frac();
        frac.num
            .atoms()
            .chain(frac.den.atoms())
            .all(|a| is_constant_atom(a))
    }

    pub fn as_rational(&self) -> Option<BigRational> {
        self.frac().as_constant()
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.as_rational()
            .filter(|r| r.is_integer())
            .and_then(|r| r.to_integer().to_i64())
    }

    /// True for a bare symbol or dynamic symbol, the valid targets of
    /// [`Expr::diff`] and [`Expr::subs`].
    pub fn is_variable(&self) -> bool {
        self.as_variable().is_ok()
    }

    /// Returns true if the expression does not change with `var`.
    pub fn free_of(&self, var: &Expr) -> Result<bool> {
        Ok(!self.frac().depends_on(var.as_variable()?))
    }

    /// True if the expression changes with time, either through `t` itself
    /// or through a dynamic symbol.
    pub fn depends_on_time(&self) -> bool {
        self.frac().depends_on(&Atom::time())
    }

    /// Cancels the denominator when it divides the numerator exactly.
    pub fn simplify(&self) -> Expr {
        let frac = self.frac();
        if frac.is_poly() {
            return self.clone();
        }
        match frac.num.try_div(&frac.den) {
            Some(q) => {
                tracing::trace!(expr = %self, "cancelled denominator");
                Expr::from_poly(q)
            }
            None => self.clone(),
        }
    }
}

fn is_constant_atom(atom: &Atom) -> bool {
    match atom {
        Atom::Pi => true,
        Atom::Sqrt(p) => p.atoms().all(is_constant_atom),
        Atom::Sin(arg) | Atom::Cos(arg) => arg
            .num
            .atoms()
            .chain(arg.den.atoms())
            .all(is_constant_atom),
        _ => false,
    }
}

fn split_names(names: &str) -> impl Iterator<Item = &str> {
    names
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
}

impl Default for Expr {
    fn default() -> Self {
        Expr::zero()
    }
}

impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 || self.frac().sub(other.frac()).is_zero()
    }
}

impl PartialEq<i64> for Expr {
    fn eq(&self, other: &i64) -> bool {
        self.as_rational() == Some(int(*other))
    }
}

impl From<i64> for Expr {
    fn from(n: i64) -> Self {
        Expr::int(n)
    }
}

impl From<i32> for Expr {
    fn from(n: i32) -> Self {
        Expr::int(n.into())
    }
}

impl From<BigRational> for Expr {
    fn from(r: BigRational) -> Self {
        Expr::from_frac(Frac::constant(r))
    }
}

impl From<&Expr> for Expr {
    fn from(e: &Expr) -> Self {
        e.clone()
    }
}

impl fmt::Display for Frac {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_poly() {
            write!(f, "{}", self.num)
        } else {
            write!(f, "({})/({})", self.num, self.den)
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.frac())
    }
}

impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.frac())
    }
}
