//! Exact symbolic scalars for multibody kinematics.
//!
//! [`Expr`] represents rational functions over symbols, dynamic symbols
//! (functions of time), `pi`, square roots and `sin`/`cos`. Every value is
//! kept in a canonical form so equality checks are exact.

mod atom;
mod calculus;
mod error;
mod expr;
mod ops;
mod poly;
mod trig;

pub use atom::{Symbol, TIME};
pub use error::*;
pub use expr::*;

pub use num_rational::BigRational;
