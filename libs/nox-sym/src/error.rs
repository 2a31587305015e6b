//! Provides error definitions.
use thiserror::Error;

/// Errors raised by symbolic operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Differentiation and substitution only accept a bare symbol or dynamic symbol.
    #[error("expected a symbol or dynamic symbol, got {0}")]
    NotAVariable(String),

    /// The denominator of a division simplified to exactly zero.
    #[error("division by zero")]
    DivisionByZero,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
