//! Normal form of `sin` and `cos`.
//!
//! Arguments are split term by term with the angle addition formulas, small
//! integer multiples are expanded, and multiples of `pi` that land on a
//! multiple of 30 or 45 degrees evaluate exactly. Sums that mix rational
//! multiples of one angle, such as `sin(q)` and `sin(q/2)`, are rewritten in
//! terms of their common base angle by [`harmonize`].
use std::{collections::BTreeMap, sync::Arc};

use num_bigint::BigInt;
use num_traits::{One, Signed, ToPrimitive, Zero};

use crate::{
    atom::Atom,
    expr::Frac,
    poly::{Coeff, Monomial, Poly, int},
};

const MAX_EXPANDED_MULTIPLE: i64 = 12;

/// Largest multiple of a common base angle that [`harmonize`] expands.
const MAX_HARMONIZED_MULTIPLE: i64 = 24;

/// Returns `(sin(arg), cos(arg))` in normal form.
pub(crate) fn sin_cos(arg: &Frac) -> (Poly, Poly) {
    if !arg.is_poly() {
        return opaque(arg);
    }
    let pi = Monomial::atom(Atom::Pi);
    let mut acc = (Poly::zero(), Poly::one());
    for (m, c) in &arg.num.terms {
        let part = if *m == pi {
            pi_multiple(c)
        } else {
            term(m, c)
        };
        acc = add_angles(&acc, &part);
    }
    acc
}

fn add_angles((s1, c1): &(Poly, Poly), (s2, c2): &(Poly, Poly)) -> (Poly, Poly) {
    (
        s1.mul(c2).add(&c1.mul(s2)),
        c1.mul(c2).sub(&s1.mul(s2)),
    )
}

fn term(m: &Monomial, c: &Coeff) -> (Poly, Poly) {
    if c.is_negative() {
        let (s, co) = term(m, &-c);
        return (s.neg(), co);
    }
    let multiple = c
        .is_integer()
        .then(|| c.to_integer().to_i64())
        .flatten()
        .filter(|n| (2..=MAX_EXPANDED_MULTIPLE).contains(n));
    match multiple {
        Some(n) if !m.is_one() => {
            multiple_of(&atoms(Frac::poly(Poly::term(m.clone(), Coeff::one()))), n)
        }
        _ => atoms(Frac::poly(Poly::term(m.clone(), c.clone()))),
    }
}

/// `(sin(n * x), cos(n * x))` from `(sin(x), cos(x))`, for `n >= 1`.
fn multiple_of(unit: &(Poly, Poly), n: i64) -> (Poly, Poly) {
    let mut acc = unit.clone();
    for _ in 1..n {
        acc = add_angles(&acc, unit);
    }
    acc
}

/// The `c * m` argument of a `sin` or `cos` atom, when it is a single
/// positive multiple of a monomial other than `pi`.
fn single_term_arg(atom: &Atom) -> Option<(&Monomial, &Coeff)> {
    let (Atom::Sin(arg) | Atom::Cos(arg)) = atom else {
        return None;
    };
    if !arg.is_poly() || arg.num.terms.len() != 1 {
        return None;
    }
    let (m, c) = arg.num.terms.iter().next()?;
    (!m.is_one() && *m != Monomial::atom(Atom::Pi) && c.is_positive()).then_some((m, c))
}

fn gcd_int(a: &BigInt, b: &BigInt) -> BigInt {
    let (mut a, mut b) = (a.abs(), b.abs());
    while !b.is_zero() {
        let r = &a % &b;
        a = b;
        b = r;
    }
    a
}

/// Largest rational `g` such that both `a / g` and `b / g` are integers.
fn gcd_rational(a: &Coeff, b: &Coeff) -> Coeff {
    let num = gcd_int(&(a.numer() * b.denom()), &(b.numer() * a.denom()));
    Coeff::new(num, a.denom() * b.denom())
}

/// Rewrites `sin`/`cos` atoms whose arguments are different rational
/// multiples of the same monomial through their common base angle, so that
/// `sin(q)` next to `sin(q/2)` becomes `2*sin(q/2)*cos(q/2)`.
///
/// Returns `None` when there is nothing to rewrite.
pub(crate) fn harmonize(frac: &Frac) -> Option<Frac> {
    let mut multiples: BTreeMap<&Monomial, Vec<&Coeff>> = BTreeMap::new();
    for atom in frac.num.atoms().chain(frac.den.atoms()) {
        if let Some((m, c)) = single_term_arg(atom) {
            multiples.entry(m).or_default().push(c);
        }
    }
    let bases: BTreeMap<Monomial, Coeff> = multiples
        .into_iter()
        .filter(|(_, cs)| cs.iter().any(|c| *c != cs[0]))
        .filter_map(|(m, cs)| {
            let base = cs.iter().fold(Coeff::zero(), |g, c| gcd_rational(&g, c));
            cs.iter()
                .all(|c| (*c / &base).to_integer() <= BigInt::from(MAX_HARMONIZED_MULTIPLE))
                .then(|| (m.clone(), base))
        })
        .collect();
    if bases.is_empty() {
        return None;
    }
    let rewrite = |atom: &Atom| -> Option<Poly> {
        let (m, c) = single_term_arg(atom)?;
        let base = bases.get(m)?;
        let n = (c / base).to_integer().to_i64()?;
        let unit = atoms(Frac::poly(Poly::term(m.clone(), base.clone())));
        let (s, co) = multiple_of(&unit, n);
        Some(if matches!(atom, Atom::Sin(_)) { s } else { co })
    };
    let den = frac.den.replace_atoms(&rewrite);
    if den.is_zero() {
        return None;
    }
    Some(Frac::new(frac.num.replace_atoms(&rewrite), den))
}

fn atoms(arg: Frac) -> (Poly, Poly) {
    let arg = Arc::new(arg);
    (
        Poly::atom(Atom::Sin(arg.clone())),
        Poly::atom(Atom::Cos(arg)),
    )
}

fn opaque(arg: &Frac) -> (Poly, Poly) {
    if arg.is_negative() {
        let (s, c) = atoms(arg.neg());
        (s.neg(), c)
    } else {
        atoms(arg.clone())
    }
}

/// `sin` and `cos` of `k * pi`.
fn pi_multiple(k: &Coeff) -> (Poly, Poly) {
    let two = int(2);
    let k = k - (k / &two).floor() * &two;
    if k.is_zero() {
        return (Poly::zero(), Poly::one());
    }
    let degrees = &k * int(180);
    let exact = degrees
        .is_integer()
        .then(|| degrees.to_integer().to_i64())
        .flatten()
        .filter(|d| d % 30 == 0 || d % 45 == 0);
    match exact {
        Some(d) => exact_degrees(d),
        None => atoms(Frac::poly(Poly::term(Monomial::atom(Atom::Pi), k))),
    }
}

/// Exact values for `d` in `[0, 360)`.
fn exact_degrees(d: i64) -> (Poly, Poly) {
    match d {
        0..=90 => first_quadrant(d),
        91..=180 => {
            let (s, c) = first_quadrant(180 - d);
            (s, c.neg())
        }
        181..=270 => {
            let (s, c) = first_quadrant(d - 180);
            (s.neg(), c.neg())
        }
        _ => {
            let (s, c) = first_quadrant(360 - d);
            (s.neg(), c)
        }
    }
}

fn first_quadrant(d: i64) -> (Poly, Poly) {
    let half = Poly::constant(Coeff::new(1.into(), 2.into()));
    let half_root = |n: i64| Frac::constant(int(n)).sqrt().num.mul(&half);
    match d {
        0 => (Poly::zero(), Poly::one()),
        30 => (half.clone(), half_root(3)),
        45 => (half_root(2), half_root(2)),
        60 => (half_root(3), half),
        _ => (Poly::one(), Poly::zero()),
    }
}

#[cfg(test)]
mod tests {
    use crate::Expr;

    #[test]
    fn test_exact_angles() {
        let pi = Expr::pi();
        assert_eq!(pi.sin(), 0);
        assert_eq!(pi.cos(), -1);
        assert_eq!((&pi / 6).sin(), Expr::rational(1, 2));
        assert_eq!((&pi / 4).cos(), Expr::int(2).sqrt() / 2);
        assert_eq!((Expr::int(5) * &pi / 3).sin(), -(Expr::int(3).sqrt() / 2));
        assert_eq!((Expr::int(-1) * &pi / 2).sin(), -1);
        assert_eq!((Expr::int(7) * &pi / 2).cos(), 0);
    }

    #[test]
    fn test_angle_addition() {
        let [a, b] = [Expr::symbol("a"), Expr::symbol("b")];
        let lhs = (&a + &b).sin();
        let rhs = a.sin() * b.cos() + a.cos() * b.sin();
        assert_eq!(lhs, rhs);
        assert_eq!((&a - &b).cos(), a.cos() * b.cos() + a.sin() * b.sin());
        assert_eq!((Expr::int(2) * &a).sin(), Expr::int(2) * a.sin() * a.cos());
    }

    #[test]
    fn test_half_angles() {
        let q = Expr::dynamic("q");
        let half = &q / 2;
        let double = Expr::int(2) * half.sin() * half.cos();
        assert_eq!(double, q.sin());
        assert_eq!(Expr::int(2) * half.cos().pow(2) - 1, q.cos());
        assert_eq!(q.sin() - double, 0);
        let third = &q / 3;
        let sixth = &q / 6;
        assert_eq!((&third + &sixth).sin(), half.sin());
        assert_eq!(
            Expr::int(2) * third.sin() * third.cos(),
            (Expr::int(2) * &q / 3).sin()
        );
    }

    #[test]
    fn test_shifted_by_pi() {
        let q = Expr::dynamic("q");
        let pi = Expr::pi();
        assert_eq!((&q + &pi / 2).sin(), q.cos());
        assert_eq!((&q + &pi).cos(), -q.cos());
        let e = Expr::int(2).sqrt() * (&q + &pi / 4).cos();
        assert_eq!(e, q.cos() - q.sin());
    }

    #[test]
    fn test_odd_even() {
        let x = Expr::symbol("x");
        assert_eq!((-&x).sin(), -x.sin());
        assert_eq!((-&x).cos(), x.cos());
        assert_eq!(x.tan().unwrap() * x.cos(), x.sin());
    }
}
