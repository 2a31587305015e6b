//! Sparse multivariate polynomials over atoms with exact rational coefficients.
use std::{
    cmp::Ordering,
    collections::{BTreeMap, btree_map::Entry},
    fmt,
};

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};
use smallvec::SmallVec;

use crate::{atom::Atom, expr::sqrt_rational};

pub(crate) type Coeff = BigRational;

pub(crate) fn int(n: i64) -> Coeff {
    Coeff::from_integer(BigInt::from(n))
}

/// A product of atoms raised to positive powers, sorted by atom.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct Monomial(pub(crate) SmallVec<[(Atom, u32); 4]>);

impl Monomial {
    pub(crate) fn one() -> Self {
        Monomial::default()
    }

    pub(crate) fn atom(atom: Atom) -> Self {
        Monomial::power(atom, 1)
    }

    pub(crate) fn power(atom: Atom, exp: u32) -> Self {
        let mut out = Monomial::one();
        if exp > 0 {
            out.0.push((atom, exp));
        }
        out
    }

    pub(crate) fn is_one(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn degree(&self) -> u32 {
        self.0.iter().map(|(_, e)| e).sum()
    }

    pub(crate) fn exponent(&self, atom: &Atom) -> u32 {
        self.0
            .iter()
            .find(|(a, _)| a == atom)
            .map(|(_, e)| *e)
            .unwrap_or(0)
    }

    pub(crate) fn mul(&self, other: &Monomial) -> Monomial {
        let mut out = SmallVec::with_capacity(self.0.len() + other.0.len());
        let (mut i, mut j) = (0, 0);
        while i < self.0.len() && j < other.0.len() {
            let (a, ea) = &self.0[i];
            let (b, eb) = &other.0[j];
            match a.cmp(b) {
                Ordering::Less => {
                    out.push((a.clone(), *ea));
                    i += 1;
                }
                Ordering::Greater => {
                    out.push((b.clone(), *eb));
                    j += 1;
                }
                Ordering::Equal => {
                    out.push((a.clone(), ea + eb));
                    i += 1;
                    j += 1;
                }
            }
        }
        out.extend(self.0[i..].iter().cloned());
        out.extend(other.0[j..].iter().cloned());
        Monomial(out)
    }

    /// Exact division, `None` if `other` does not divide `self`.
    pub(crate) fn divide(&self, other: &Monomial) -> Option<Monomial> {
        let mut out = self.0.clone();
        for (atom, e) in &other.0 {
            let pos = out.iter().position(|(a, _)| a == atom)?;
            if out[pos].1 < *e {
                return None;
            }
            out[pos].1 -= e;
            if out[pos].1 == 0 {
                out.remove(pos);
            }
        }
        Some(Monomial(out))
    }

    pub(crate) fn gcd(&self, other: &Monomial) -> Monomial {
        Monomial(
            self.0
                .iter()
                .filter_map(|(a, e)| {
                    let f = other.exponent(a);
                    (f > 0).then(|| (a.clone(), (*e).min(f)))
                })
                .collect(),
        )
    }

    /// Graded lexicographic order, used to pick leading terms.
    pub(crate) fn grlex_cmp(&self, other: &Monomial) -> Ordering {
        self.degree().cmp(&other.degree()).then_with(|| {
            let (mut i, mut j) = (0, 0);
            loop {
                match (self.0.get(i), other.0.get(j)) {
                    (None, None) => return Ordering::Equal,
                    (Some(_), None) => return Ordering::Greater,
                    (None, Some(_)) => return Ordering::Less,
                    (Some((a, ea)), Some((b, eb))) => match a.cmp(b) {
                        Ordering::Less => return Ordering::Greater,
                        Ordering::Greater => return Ordering::Less,
                        Ordering::Equal => match ea.cmp(eb) {
                            Ordering::Equal => {
                                i += 1;
                                j += 1;
                            }
                            ord => return ord,
                        },
                    },
                }
            }
        })
    }

    /// First factor that has a square reduction and an exponent of at least two.
    fn reducible(&self) -> Option<(usize, Poly)> {
        self.0
            .iter()
            .enumerate()
            .filter(|(_, (_, e))| *e >= 2)
            .find_map(|(i, (a, _))| a.square().map(|sq| (i, sq)))
    }

    /// Combines square roots of positive constants into a single root,
    /// `sqrt(a) * sqrt(b) = sqrt(a * b)`, moving square factors into the
    /// returned coefficient.
    fn merge_numeric_roots(self, c: Coeff) -> (Monomial, Coeff) {
        let is_numeric_root = |a: &Atom| {
            matches!(a, Atom::Sqrt(p) if p.as_constant().is_some_and(|k| k.is_positive()))
        };
        if self.0.iter().filter(|(a, _)| is_numeric_root(a)).count() < 2 {
            return (self, c);
        }
        let mut radicand = Coeff::one();
        let mut coeff = c.clone();
        let mut rest = Monomial::one();
        for (atom, e) in &self.0 {
            match atom {
                Atom::Sqrt(p) if is_numeric_root(atom) => {
                    let k = p.as_constant().unwrap_or_else(Coeff::one);
                    for _ in 0..e / 2 {
                        coeff *= &k;
                    }
                    if e % 2 == 1 {
                        radicand *= k;
                    }
                }
                _ => rest.0.push((atom.clone(), *e)),
            }
        }
        let Some((root, remaining)) = sqrt_rational(&radicand) else {
            return (self, c);
        };
        coeff *= root;
        if !remaining.is_one() {
            let sqrt = Atom::Sqrt(std::sync::Arc::new(Poly::constant(remaining)));
            rest = rest.mul(&Monomial::atom(sqrt));
        }
        (rest, coeff)
    }
}

/// A polynomial in normal form.
///
/// No coefficient is zero, `sin(x)` never appears squared (it is rewritten
/// through `sin(x)^2 = 1 - cos(x)^2`) and square roots never appear squared.
/// Under those rules two polynomials are equal as functions exactly when
/// they are equal as maps.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct Poly {
    pub(crate) terms: BTreeMap<Monomial, Coeff>,
}

impl Poly {
    pub(crate) fn zero() -> Self {
        Poly::default()
    }

    pub(crate) fn one() -> Self {
        Poly::constant(Coeff::one())
    }

    pub(crate) fn constant(c: Coeff) -> Self {
        Poly::term(Monomial::one(), c)
    }

    /// A single term. The monomial must already be reduced.
    pub(crate) fn term(m: Monomial, c: Coeff) -> Self {
        let mut out = Poly::zero();
        out.add_term(m, c);
        out
    }

    pub(crate) fn atom(atom: Atom) -> Self {
        Poly::term(Monomial::atom(atom), Coeff::one())
    }

    pub(crate) fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    pub(crate) fn is_one(&self) -> bool {
        self.as_constant().is_some_and(|c| c.is_one())
    }

    pub(crate) fn as_constant(&self) -> Option<Coeff> {
        match self.terms.len() {
            0 => Some(Coeff::zero()),
            1 => self.terms.get(&Monomial::one()).cloned(),
            _ => None,
        }
    }

    pub(crate) fn leading(&self) -> Option<(&Monomial, &Coeff)> {
        self.terms.iter().max_by(|(a, _), (b, _)| a.grlex_cmp(b))
    }

    pub(crate) fn add_term(&mut self, m: Monomial, c: Coeff) {
        if c.is_zero() {
            return;
        }
        match self.terms.entry(m) {
            Entry::Occupied(mut e) => {
                let sum = e.get() + &c;
                if sum.is_zero() {
                    e.remove();
                } else {
                    *e.get_mut() = sum;
                }
            }
            Entry::Vacant(e) => {
                e.insert(c);
            }
        }
    }

    /// Adds `c * m`, applying the square reductions to `m` first.
    fn add_reduced(&mut self, m: Monomial, c: Coeff) {
        let (m, c) = m.merge_numeric_roots(c);
        let Some((idx, square)) = m.reducible() else {
            self.add_term(m, c);
            return;
        };
        let mut rest = m;
        let e = rest.0[idx].1;
        if e % 2 == 0 {
            rest.0.remove(idx);
        } else {
            rest.0[idx].1 = 1;
        }
        let replaced = Poly::term(rest, c).mul(&square.pow(e / 2));
        for (m, c) in replaced.terms {
            self.add_term(m, c);
        }
    }

    pub(crate) fn add(&self, other: &Poly) -> Poly {
        let mut out = self.clone();
        for (m, c) in &other.terms {
            out.add_term(m.clone(), c.clone());
        }
        out
    }

    pub(crate) fn neg(&self) -> Poly {
        Poly {
            terms: self.terms.iter().map(|(m, c)| (m.clone(), -c)).collect(),
        }
    }

    pub(crate) fn sub(&self, other: &Poly) -> Poly {
        self.add(&other.neg())
    }

    pub(crate) fn scale(&self, k: &Coeff) -> Poly {
        if k.is_zero() {
            return Poly::zero();
        }
        Poly {
            terms: self.terms.iter().map(|(m, c)| (m.clone(), c * k)).collect(),
        }
    }

    pub(crate) fn mul(&self, other: &Poly) -> Poly {
        let mut out = Poly::zero();
        for (m1, c1) in &self.terms {
            for (m2, c2) in &other.terms {
                out.add_reduced(m1.mul(m2), c1 * c2);
            }
        }
        out
    }

    pub(crate) fn pow(&self, n: u32) -> Poly {
        let mut out = Poly::one();
        for _ in 0..n {
            out = out.mul(self);
        }
        out
    }

    /// Largest monomial dividing every term.
    pub(crate) fn content(&self) -> Monomial {
        let mut iter = self.terms.keys();
        let Some(first) = iter.next() else {
            return Monomial::one();
        };
        iter.fold(first.clone(), |acc, m| acc.gcd(m))
    }

    pub(crate) fn div_monomial(&self, m: &Monomial) -> Option<Poly> {
        let mut out = Poly::zero();
        for (term, c) in &self.terms {
            out.add_term(term.divide(m)?, c.clone());
        }
        Some(out)
    }

    /// Exact division by `divisor`, if the division algorithm finds one.
    pub(crate) fn try_div(&self, divisor: &Poly) -> Option<Poly> {
        let (lm, lc) = divisor.leading()?;
        let (lm, lc) = (lm.clone(), lc.clone());
        let mut rem = self.clone();
        let mut quot = Poly::zero();
        let limit = 64 * (self.terms.len() + 1);
        for _ in 0..limit {
            let Some((m, c)) = rem.leading().map(|(m, c)| (m.clone(), c.clone())) else {
                return Some(quot);
            };
            let qm = m.divide(&lm)?;
            let qc = c / &lc;
            let step = Poly::term(qm.clone(), qc.clone());
            rem = rem.sub(&step.mul(divisor));
            quot.add_term(qm, qc);
        }
        None
    }

    /// Substitutes each atom for which `f` returns a replacement, keeping the
    /// rest, and renormalizes the products.
    pub(crate) fn replace_atoms(&self, f: &impl Fn(&Atom) -> Option<Poly>) -> Poly {
        let mut out = Poly::zero();
        for (m, c) in &self.terms {
            let mut term = Poly::constant(c.clone());
            for (atom, e) in &m.0 {
                let factor = f(atom).unwrap_or_else(|| Poly::atom(atom.clone()));
                term = term.mul(&factor.pow(*e));
            }
            out = out.add(&term);
        }
        out
    }

    pub(crate) fn depends_on(&self, var: &Atom) -> bool {
        self.terms
            .keys()
            .any(|m| m.0.iter().any(|(a, _)| a.depends_on(var)))
    }

    pub(crate) fn atoms(&self) -> impl Iterator<Item = &Atom> {
        self.terms.keys().flat_map(|m| m.0.iter().map(|(a, _)| a))
    }
}

impl fmt::Display for Monomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (atom, e)) in self.0.iter().enumerate() {
            if i != 0 {
                f.write_str("*")?;
            }
            write!(f, "{atom}")?;
            if *e > 1 {
                write!(f, "^{e}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for Poly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.terms.is_empty() {
            return f.write_str("0");
        }
        for (i, (m, c)) in self.terms.iter().enumerate() {
            let abs = c.abs();
            match (i, c.is_negative()) {
                (0, true) => f.write_str("-")?,
                (0, false) => {}
                (_, true) => f.write_str(" - ")?,
                (_, false) => f.write_str(" + ")?,
            }
            if m.is_one() {
                write!(f, "{abs}")?;
            } else if abs.is_one() {
                write!(f, "{m}")?;
            } else {
                write!(f, "{abs}*{m}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom::Symbol;

    fn sym(name: &str) -> Poly {
        Poly::atom(Atom::Symbol(Symbol::new(name)))
    }

    #[test]
    fn test_collects_like_terms() {
        let x = sym("x");
        let y = sym("y");
        let p = x.add(&y).mul(&x.sub(&y));
        let expected = x.mul(&x).sub(&y.mul(&y));
        assert_eq!(p, expected);
        assert!(p.sub(&expected).is_zero());
    }

    #[test]
    fn test_grlex_leading_term() {
        let x = sym("x");
        let y = sym("y");
        let p = x.add(&y.mul(&y)).add(&Poly::one());
        let (m, _) = p.leading().unwrap();
        assert_eq!(m.degree(), 2);
    }

    #[test]
    fn test_try_div() {
        let x = sym("x");
        let one = Poly::one();
        let num = x.mul(&x).sub(&one);
        let q = num.try_div(&x.sub(&one)).unwrap();
        assert_eq!(q, x.add(&one));
        assert!(x.try_div(&x.add(&one)).is_none());
    }

    #[test]
    fn test_numeric_roots_merge() {
        let root = |n: i64| Poly::atom(Atom::Sqrt(std::sync::Arc::new(Poly::constant(int(n)))));
        let product = root(2).mul(&root(3));
        assert_eq!(product, root(6));
        assert_eq!(root(6).mul(&root(3)), root(2).scale(&int(3)));
        assert_eq!(root(2).mul(&root(3)).mul(&root(6)), Poly::constant(int(6)));
        let x = sym("x");
        assert_eq!(x.mul(&root(2)).mul(&root(5)), x.mul(&root(10)));
    }
}
