//! Provides error definitions for the frame graph.
use thiserror::Error;

/// Represents the errors that can occur while building frames or operating
/// on vectors and dyadics.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// An operand of `dot`, `cross` or `outer` had the wrong kind.
    #[error("unsupported operand: {0}")]
    Operand(String),

    /// The two frames are not connected in the relevant graph.
    #[error("no path from {from} to {to}")]
    NoPath { from: String, to: String },

    /// Orientation parameters were malformed.
    #[error("invalid orientation: {0}")]
    InvalidOrientation(String),

    /// A rotation sequence string was not one of the twelve Euler orders.
    #[error("invalid rotation order {0:?}")]
    InvalidRotationOrder(String),

    /// A frame with the same name already exists in this graph.
    #[error("duplicate frame name {0:?}")]
    DuplicateName(String),

    /// The configuration document could not be parsed.
    #[error("config parsing failed: {0}")]
    Config(String),

    /// Error from the symbolic backend.
    #[error(transparent)]
    Sym(#[from] nox_sym::Error),
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
