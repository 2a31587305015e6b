//! Differentiation, substitution and integration with respect to time.
use std::sync::Arc;

use num_traits::One;

use crate::{
    Error, Expr, Result,
    atom::Atom,
    expr::Frac,
    poly::{Coeff, Monomial, Poly, int},
    trig,
};

impl Frac {
    pub(crate) fn diff(&self, var: &Atom) -> Result<Frac> {
        let dn = diff_poly(&self.num, var)?;
        if self.is_poly() {
            return Ok(dn);
        }
        let dd = diff_poly(&self.den, var)?;
        let num = dn
            .mul(&Frac::poly(self.den.clone()))
            .sub(&dd.mul(&Frac::poly(self.num.clone())));
        Ok(num.div_poly(&self.den.mul(&self.den)))
    }

    pub(crate) fn subs(&self, var: &Atom, value: &Frac) -> Result<Frac> {
        let num = subs_poly(&self.num, var, value)?;
        if self.is_poly() {
            return Ok(num);
        }
        num.div(&subs_poly(&self.den, var, value)?)
    }

    /// Antiderivative with respect to time, up to a constant.
    pub(crate) fn integrate_time(&self) -> Frac {
        let time = Atom::time();
        if self.den.depends_on(&time) {
            return Frac::atom(Atom::Integral(Arc::new(self.clone())));
        }
        let mut out = Frac::zero();
        for (m, c) in &self.num.terms {
            out = out.add(&integrate_term(m, c));
        }
        out.div_poly(&self.den)
    }
}

fn integrate_term(m: &Monomial, c: &Coeff) -> Frac {
    let time = Atom::time();
    let mut k = 0;
    let mut free = Monomial::one();
    let mut dep = Monomial::one();
    for (atom, e) in &m.0 {
        if atom.is_time() {
            k = *e;
        } else if atom.depends_on(&time) {
            dep.0.push((atom.clone(), *e));
        } else {
            free.0.push((atom.clone(), *e));
        }
    }
    let outside = Frac::poly(Poly::term(free, c.clone()));
    if dep.is_one() {
        let raised = Poly::term(
            Monomial::power(time, k + 1),
            Coeff::new(1.into(), (k + 1).into()),
        );
        return outside.mul(&Frac::poly(raised));
    }
    if let (0, [(Atom::Dynamic { name, order }, 1)]) = (k, &dep.0[..]) {
        if *order > 0 {
            let lower = Atom::Dynamic {
                name: name.clone(),
                order: order - 1,
            };
            return outside.mul(&Frac::atom(lower));
        }
    }
    let integrand = Poly::term(Monomial::power(time, k).mul(&dep), Coeff::one());
    outside.mul(&Frac::atom(Atom::Integral(Arc::new(Frac::poly(integrand)))))
}

fn diff_poly(p: &Poly, var: &Atom) -> Result<Frac> {
    let mut out = Frac::zero();
    for (m, c) in &p.terms {
        for (i, (atom, e)) in m.0.iter().enumerate() {
            let d = diff_atom(atom, var)?;
            if d.is_zero() {
                continue;
            }
            let mut rest = m.clone();
            if *e == 1 {
                rest.0.remove(i);
            } else {
                rest.0[i].1 -= 1;
            }
            let factor = Poly::term(rest, c * int(*e as i64));
            out = out.add(&d.mul(&Frac::poly(factor)));
        }
    }
    Ok(out)
}

fn diff_atom(atom: &Atom, var: &Atom) -> Result<Frac> {
    if atom == var {
        return Ok(Frac::one());
    }
    let time = var.is_time();
    Ok(match atom {
        Atom::Pi | Atom::Symbol(_) => Frac::zero(),
        Atom::Dynamic { name, order } if time => Frac::atom(Atom::Dynamic {
            name: name.clone(),
            order: order + 1,
        }),
        Atom::Dynamic { .. } => Frac::zero(),
        Atom::DynamicAt { name, order, at } => {
            let d_at = at.diff(var)?;
            if d_at.is_zero() {
                return Ok(d_at);
            }
            Frac::atom(Atom::dynamic_at(name.clone(), order + 1, (**at).clone())).mul(&d_at)
        }
        Atom::Sqrt(p) => {
            let dp = diff_poly(p, var)?;
            let twice_root = Poly::atom(atom.clone()).scale(&int(2));
            dp.div_poly(&twice_root)
        }
        Atom::Sin(arg) => Frac::atom(Atom::Cos(arg.clone())).mul(&arg.diff(var)?),
        Atom::Cos(arg) => Frac::atom(Atom::Sin(arg.clone()))
            .neg()
            .mul(&arg.diff(var)?),
        Atom::Integral(f) if time => (**f).clone(),
        Atom::Integral(f) => f.diff(var)?.integrate_time(),
        Atom::IntegralAt { integrand, at } => {
            let t = Atom::time();
            let at_end = integrand.subs(&t, at)?.mul(&at.diff(var)?);
            if time {
                at_end
            } else {
                let inner = integrand.diff(var)?.integrate_time();
                at_end.add(&inner.subs(&t, at)?)
            }
        }
    })
}

fn subs_poly(p: &Poly, var: &Atom, value: &Frac) -> Result<Frac> {
    let mut out = Frac::zero();
    for (m, c) in &p.terms {
        let mut term = Frac::constant(c.clone());
        for (atom, e) in &m.0 {
            term = term.mul(&subs_atom(atom, var, value)?.pow(*e));
        }
        out = out.add(&term);
    }
    Ok(out)
}

fn subs_atom(atom: &Atom, var: &Atom, value: &Frac) -> Result<Frac> {
    if atom == var {
        return Ok(value.clone());
    }
    let time = var.is_time();
    Ok(match atom {
        Atom::Pi | Atom::Symbol(_) => Frac::atom(atom.clone()),
        Atom::Dynamic { name, order } if time => {
            Frac::atom(Atom::dynamic_at(name.clone(), *order, value.clone()))
        }
        Atom::Dynamic { .. } => Frac::atom(atom.clone()),
        Atom::DynamicAt { name, order, at } => {
            Frac::atom(Atom::dynamic_at(name.clone(), *order, at.subs(var, value)?))
        }
        Atom::Sqrt(p) => subs_poly(p, var, value)?.sqrt(),
        Atom::Sin(arg) => Frac::poly(trig::sin_cos(&arg.subs(var, value)?).0),
        Atom::Cos(arg) => Frac::poly(trig::sin_cos(&arg.subs(var, value)?).1),
        Atom::Integral(f) if time => Frac::atom(Atom::integral_at((**f).clone(), value.clone())),
        Atom::Integral(f) => f.subs(var, value)?.integrate_time(),
        Atom::IntegralAt { integrand, at } if time => Frac::atom(Atom::integral_at(
            (**integrand).clone(),
            at.subs(var, value)?,
        )),
        Atom::IntegralAt { integrand, at } => {
            let at = at.subs(var, value)?;
            integrand
                .subs(var, value)?
                .integrate_time()
                .subs(&Atom::time(), &at)?
        }
    })
}

impl Expr {
    /// Partial derivative with respect to a symbol or dynamic symbol.
    ///
    /// Dynamic symbols are functions of time, so differentiating with respect
    /// to [`Expr::time`] raises their derivative order.
    pub fn diff(&self, var: &Expr) -> Result<Expr> {
        let var = var.as_variable()?;
        Ok(Expr::from_frac(self.frac().diff(var)?))
    }

    /// Total derivative with respect to time.
    ///
    /// # Panics
    /// Panics if the derivative evaluates an integrand at one of its poles,
    /// in the same way that division by an exact zero does. Use
    /// [`Expr::try_dt`] to get an error instead.
    pub fn dt(&self) -> Expr {
        match self.try_dt() {
            Ok(d) => d,
            Err(err) => panic!("time derivative of {self} is undefined: {err}"),
        }
    }

    /// Total derivative with respect to time, failing with
    /// [`Error::DivisionByZero`] where [`Expr::dt`] would panic.
    pub fn try_dt(&self) -> Result<Expr> {
        Ok(Expr::from_frac(self.frac().diff(&Atom::time())?))
    }

    /// Antiderivative with respect to time, with no integration constant.
    pub fn integrate_time(&self) -> Expr {
        Expr::from_frac(self.frac().integrate_time())
    }

    /// Definite integral with respect to time from `lower` to `t`.
    pub fn integrate_time_from(&self, lower: &Expr) -> Result<Expr> {
        let antiderivative = self.frac().integrate_time();
        let at_lower = antiderivative.subs(&Atom::time(), lower.frac())?;
        Ok(Expr::from_frac(antiderivative.sub(&at_lower)))
    }

    /// Replaces every occurrence of `var` with `value`.
    ///
    /// Substituting for the time symbol evaluates dynamic symbols at `value`.
    pub fn subs(&self, var: &Expr, value: &Expr) -> Result<Expr> {
        let var = var.as_variable()?;
        Ok(Expr::from_frac(self.frac().subs(var, value.frac())?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diff_rules() {
        let [x, y] = [Expr::symbol("x"), Expr::symbol("y")];
        let e = x.pow(3) * &y + x.sin();
        assert_eq!(e.diff(&x).unwrap(), Expr::int(3) * x.pow(2) * &y + x.cos());
        assert_eq!(e.diff(&y).unwrap(), x.pow(3));
        let q = &x / &y;
        assert_eq!(q.diff(&y).unwrap(), -(&x / y.pow(2)));
        assert_eq!(x.sqrt().diff(&x).unwrap(), Expr::one() / (Expr::int(2) * x.sqrt()));
    }

    #[test]
    fn test_not_a_variable() {
        let x = Expr::symbol("x");
        let err = x.diff(&(Expr::int(2) * &x)).unwrap_err();
        assert!(matches!(err, Error::NotAVariable(_)));
        assert!(x.subs(&Expr::int(1), &x).is_err());
    }

    #[test]
    fn test_dynamic_time_derivative() {
        let q = Expr::dynamic("q");
        let qd = q.dt();
        assert_eq!(q.sin().dt(), q.cos() * &qd);
        assert_eq!(qd.dt(), q.diff(&Expr::time()).unwrap().dt());
        assert_eq!(q.diff(&qd).unwrap(), 0);
        assert_eq!((q.sin() * &qd).diff(&qd).unwrap(), q.sin());
        assert_eq!(Expr::symbol("c").dt(), 0);
        assert_eq!(q.sin().try_dt().unwrap(), q.cos() * &qd);
    }

    #[test]
    fn test_try_dt_reports_poles() {
        let t = Expr::time();
        let log = (Expr::one() / &t).integrate_time_from(&Expr::zero()).unwrap();
        assert_eq!(log.try_dt(), Err(Error::DivisionByZero));
        let shifted = (Expr::one() / &t).integrate_time_from(&Expr::one()).unwrap();
        assert_eq!(shifted.try_dt().unwrap(), Expr::one() / &t);
    }

    #[test]
    fn test_integrate_time() {
        let t = Expr::time();
        let q = Expr::dynamic("q");
        let a = Expr::symbol("a");
        assert_eq!((&a * &t).integrate_time(), &a * t.pow(2) / 2);
        assert_eq!(q.dt().integrate_time(), q);
        let i = q.integrate_time();
        assert_eq!(i.dt(), q);
        let e = (q.sin() + &a).integrate_time();
        assert_eq!(e.dt(), q.sin() + &a);
    }

    #[test]
    fn test_definite_integral() {
        let t = Expr::time();
        let t0 = Expr::symbol("t0");
        let v = Expr::symbol("v");
        let pos = v.integrate_time_from(&t0).unwrap();
        assert_eq!(pos, &v * &t - &v * &t0);
        let q = Expr::dynamic("q");
        let e = q.dt().integrate_time_from(&t0).unwrap();
        assert_eq!(e, &q - q.subs(&t, &t0).unwrap());
    }

    #[test]
    fn test_subs_evaluates_dynamics() {
        let t = Expr::time();
        let q = Expr::dynamic("q");
        let at_zero = q.subs(&t, &Expr::zero()).unwrap();
        assert!(!at_zero.depends_on_time());
        assert_eq!(at_zero.subs(&t, &t).unwrap(), at_zero);
        assert_eq!((&q * 2).subs(&q, &Expr::pi()).unwrap().sin(), 0);
        let x = Expr::symbol("x");
        let e = (&x + Expr::pi() / 2).cos();
        assert_eq!(e.subs(&x, &Expr::zero()).unwrap(), 0);
        assert_eq!(
            (Expr::one() / &x).subs(&x, &Expr::zero()),
            Err(Error::DivisionByZero)
        );
    }
}
