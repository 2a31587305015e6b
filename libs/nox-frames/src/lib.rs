//! Symbolic vectors and dyadics over a graph of rotating reference frames.
//!
//! ```
//! use nox_frames::{FrameGraph, Orientation};
//! use nox_sym::Expr;
//!
//! let graph = FrameGraph::new();
//! let n = graph.frame("N").unwrap();
//! let q1 = Expr::dynamic("q1");
//! let a = n.orient_new("A", Orientation::axis(q1.clone(), n.z())).unwrap();
//! assert_eq!(n.x().dot(&a.x()).unwrap(), q1.cos());
//! ```
mod config;
mod dcm;
mod dyadic;
mod error;
mod express;
mod graph;
mod operand;
mod orientation;
mod vector;

pub use config::Config;
pub use dcm::{DCM, Matrix3};
pub use dyadic::Dyadic;
pub use error::{Error, Result};
pub use graph::{Axis, FrameGraph, FrameId, ReferenceFrame};
pub use operand::{Operand, add, cross, dot, express, outer};
pub use orientation::{OrientParam, Orientation, RotationOrder};
pub use vector::{Basis, Vector};
