//! Kind-checked free functions over scalars, vectors and dyadics.
use std::fmt;

use nox_sym::Expr;

use crate::{Dyadic, Error, ReferenceFrame, Result, Vector};

/// Any value the free functions accept.
#[derive(Clone, Debug, PartialEq)]
pub enum Operand {
    Scalar(Expr),
    Vector(Vector),
    Dyadic(Dyadic),
}

impl Operand {
    fn kind(&self) -> &'static str {
        match self {
            Operand::Scalar(_) => "scalar",
            Operand::Vector(_) => "vector",
            Operand::Dyadic(_) => "dyadic",
        }
    }

    pub fn into_scalar(self) -> Result<Expr> {
        match self {
            Operand::Scalar(e) => Ok(e),
            other => Err(Error::Operand(format!("expected a scalar, got a {}", other.kind()))),
        }
    }

    pub fn into_vector(self) -> Result<Vector> {
        match self {
            Operand::Vector(v) => Ok(v),
            other => Err(Error::Operand(format!("expected a vector, got a {}", other.kind()))),
        }
    }

    pub fn into_dyadic(self) -> Result<Dyadic> {
        match self {
            Operand::Dyadic(d) => Ok(d),
            other => Err(Error::Operand(format!("expected a dyadic, got a {}", other.kind()))),
        }
    }
}

impl From<Expr> for Operand {
    fn from(e: Expr) -> Self {
        Operand::Scalar(e)
    }
}

impl From<i64> for Operand {
    fn from(n: i64) -> Self {
        Operand::Scalar(Expr::int(n))
    }
}

impl From<i32> for Operand {
    fn from(n: i32) -> Self {
        Operand::Scalar(Expr::int(n.into()))
    }
}

impl From<Vector> for Operand {
    fn from(v: Vector) -> Self {
        Operand::Vector(v)
    }
}

impl From<&Vector> for Operand {
    fn from(v: &Vector) -> Self {
        Operand::Vector(v.clone())
    }
}

impl From<Dyadic> for Operand {
    fn from(d: Dyadic) -> Self {
        Operand::Dyadic(d)
    }
}

impl From<&Dyadic> for Operand {
    fn from(d: &Dyadic) -> Self {
        Operand::Dyadic(d.clone())
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Scalar(e) => write!(f, "{e}"),
            Operand::Vector(v) => write!(f, "{v}"),
            Operand::Dyadic(d) => write!(f, "{d}"),
        }
    }
}

fn mismatch(op: &str, a: &Operand, b: &Operand) -> Error {
    Error::Operand(format!("{op} is not defined for a {} and a {}", a.kind(), b.kind()))
}

/// Scalar product. Vector·Vector gives a scalar, any product with a dyadic
/// contracts the adjacent slots.
pub fn dot(a: impl Into<Operand>, b: impl Into<Operand>) -> Result<Operand> {
    let (a, b) = (a.into(), b.into());
    match (&a, &b) {
        (Operand::Vector(u), Operand::Vector(v)) => Ok(Operand::Scalar(u.dot(v)?)),
        (Operand::Dyadic(d), Operand::Vector(v)) => Ok(Operand::Vector(d.dot_vector(v)?)),
        (Operand::Vector(v), Operand::Dyadic(d)) => Ok(Operand::Vector(d.vector_dot(v)?)),
        (Operand::Dyadic(d), Operand::Dyadic(e)) => Ok(Operand::Dyadic(d.dot_dyadic(e)?)),
        _ => Err(mismatch("dot", &a, &b)),
    }
}

/// Vector product. Crossing into a dyadic acts on its adjacent slot.
pub fn cross(a: impl Into<Operand>, b: impl Into<Operand>) -> Result<Operand> {
    let (a, b) = (a.into(), b.into());
    match (&a, &b) {
        (Operand::Vector(u), Operand::Vector(v)) => Ok(Operand::Vector(u.cross(v)?)),
        (Operand::Dyadic(d), Operand::Vector(v)) => Ok(Operand::Dyadic(d.cross_vector(v)?)),
        (Operand::Vector(v), Operand::Dyadic(d)) => Ok(Operand::Dyadic(d.vector_cross(v)?)),
        _ => Err(mismatch("cross", &a, &b)),
    }
}

/// Outer product of two vectors.
pub fn outer(a: impl Into<Operand>, b: impl Into<Operand>) -> Result<Operand> {
    let (a, b) = (a.into(), b.into());
    match (&a, &b) {
        (Operand::Vector(u), Operand::Vector(v)) => Ok(Operand::Dyadic(u.outer(v))),
        _ => Err(mismatch("outer", &a, &b)),
    }
}

/// Re-expresses a vector or dyadic in `frame`. Scalars pass through.
pub fn express(value: impl Into<Operand>, frame: &ReferenceFrame) -> Result<Operand> {
    match value.into() {
        Operand::Scalar(e) => Ok(Operand::Scalar(e)),
        Operand::Vector(v) => Ok(Operand::Vector(v.express(frame)?)),
        Operand::Dyadic(d) => Ok(Operand::Dyadic(d.express(frame)?)),
    }
}

/// Sum of two operands of the same kind, where a scalar zero also stands for
/// the zero vector or zero dyadic.
pub fn add(a: impl Into<Operand>, b: impl Into<Operand>) -> Result<Operand> {
    let (a, b) = (a.into(), b.into());
    match (a, b) {
        (Operand::Scalar(x), Operand::Scalar(y)) => Ok(Operand::Scalar(x + y)),
        (Operand::Vector(u), Operand::Vector(v)) => Ok(Operand::Vector(u + v)),
        (Operand::Dyadic(d), Operand::Dyadic(e)) => Ok(Operand::Dyadic(d + e)),
        (Operand::Scalar(z), other) | (other, Operand::Scalar(z)) if z.is_zero() => Ok(other),
        (a, b) => Err(mismatch("add", &a, &b)),
    }
}
