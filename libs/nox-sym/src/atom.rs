//! Indivisible factors of a monomial.
use std::{fmt, sync::Arc};

use crate::{expr::Frac, poly::Poly};

/// Name of the time symbol that dynamic symbols depend on.
pub const TIME: &str = "t";

/// An interned symbol name.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(Arc<str>);

impl Symbol {
    pub fn new(name: impl AsRef<str>) -> Self {
        Symbol(Arc::from(name.as_ref()))
    }

    /// The independent time variable.
    pub fn time() -> Self {
        Symbol::new(TIME)
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    pub fn is_time(&self) -> bool {
        &*self.0 == TIME
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A factor that the polynomial layer treats as an opaque variable.
///
/// Arguments of functions are stored already normalized, so two atoms are
/// equal exactly when they are structurally equal.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) enum Atom {
    Pi,
    Symbol(Symbol),
    /// `name(t)` differentiated `order` times with respect to time.
    Dynamic {
        name: Symbol,
        order: u32,
    },
    /// A dynamic symbol evaluated at a time other than `t`.
    DynamicAt {
        name: Symbol,
        order: u32,
        at: Arc<Frac>,
    },
    /// Square root. Constant radicands are positive and squarefree; symbolic
    /// factors are treated as non-negative, so even powers are taken out.
    Sqrt(Arc<Poly>),
    /// Sine of an argument whose leading coefficient is positive.
    Sin(Arc<Frac>),
    Cos(Arc<Frac>),
    /// Indefinite integral with respect to time.
    Integral(Arc<Frac>),
    /// Antiderivative evaluated at `at`.
    IntegralAt {
        integrand: Arc<Frac>,
        at: Arc<Frac>,
    },
}

impl Atom {
    pub(crate) fn time() -> Atom {
        Atom::Symbol(Symbol::time())
    }

    pub(crate) fn is_time(&self) -> bool {
        matches!(self, Atom::Symbol(s) if s.is_time())
    }

    /// Whether this atom can be used as a differentiation variable.
    pub(crate) fn is_variable(&self) -> bool {
        matches!(self, Atom::Symbol(_) | Atom::Dynamic { .. })
    }

    pub(crate) fn dynamic_at(name: Symbol, order: u32, at: Frac) -> Atom {
        if at.is_time() {
            Atom::Dynamic { name, order }
        } else {
            Atom::DynamicAt {
                name,
                order,
                at: Arc::new(at),
            }
        }
    }

    pub(crate) fn integral_at(integrand: Frac, at: Frac) -> Atom {
        if at.is_time() {
            Atom::Integral(Arc::new(integrand))
        } else {
            Atom::IntegralAt {
                integrand: Arc::new(integrand),
                at: Arc::new(at),
            }
        }
    }

    /// Returns true if the atom changes when `var` changes.
    ///
    /// Dynamic symbols and time integrals depend on the time symbol.
    pub(crate) fn depends_on(&self, var: &Atom) -> bool {
        if self == var {
            return true;
        }
        let time = var.is_time();
        match self {
            Atom::Pi | Atom::Symbol(_) => false,
            Atom::Dynamic { .. } => time,
            Atom::DynamicAt { at, .. } => at.depends_on(var),
            Atom::Sqrt(p) => p.depends_on(var),
            Atom::Sin(arg) | Atom::Cos(arg) => arg.depends_on(var),
            Atom::Integral(f) => time || f.depends_on(var),
            Atom::IntegralAt { integrand, at } => {
                at.depends_on(var) || (!time && integrand.depends_on(var))
            }
        }
    }

    /// Replacement for `self^2` when a reduction rule applies.
    pub(crate) fn square(&self) -> Option<Poly> {
        match self {
            Atom::Sin(arg) => {
                let cos = Poly::atom(Atom::Cos(arg.clone()));
                Some(Poly::one().sub(&cos.mul(&cos)))
            }
            Atom::Sqrt(radicand) => Some((**radicand).clone()),
            _ => None,
        }
    }
}

fn primes(order: u32) -> String {
    "'".repeat(order as usize)
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Atom::Pi => f.write_str("pi"),
            Atom::Symbol(s) => write!(f, "{s}"),
            Atom::Dynamic { name, order } => write!(f, "{name}{}", primes(*order)),
            Atom::DynamicAt { name, order, at } => write!(f, "{name}{}({at})", primes(*order)),
            Atom::Sqrt(p) => write!(f, "sqrt({p})"),
            Atom::Sin(arg) => write!(f, "sin({arg})"),
            Atom::Cos(arg) => write!(f, "cos({arg})"),
            Atom::Integral(integrand) => write!(f, "Integral({integrand}, {TIME})"),
            Atom::IntegralAt { integrand, at } => {
                write!(f, "Integral({integrand}, {TIME})|{TIME}={at}")
            }
        }
    }
}
