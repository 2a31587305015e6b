use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("no path from point {from} to point {to}")]
    NoPath { from: String, to: String },

    #[error("velocity of point {point} has not been defined in frame {frame}")]
    UndefinedVelocity { point: String, frame: String },

    #[error("duplicate point name {0:?}")]
    DuplicateName(String),

    #[error("invalid kinematics: {0}")]
    InvalidKinematics(String),

    #[error(transparent)]
    Frames(#[from] nox_frames::Error),

    #[error(transparent)]
    Sym(#[from] nox_sym::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
