//! Classical mechanics over [`nox_frames`]: points, particles, rigid bodies,
//! momenta, energies and kinematic equations.
mod body;
mod error;
mod functions;
mod kinematics;
mod motion;
mod point;

pub use body::{Body, Particle, RigidBody};
pub use error::{Error, Result};
pub use functions::{
    angular_momentum, inertia, inertia_of_point_mass, kinetic_energy, linear_momentum,
    partial_velocity, potential_energy,
};
pub use kinematics::kinematic_equations;
pub use motion::{MotionConditions, get_motion_params};
pub use point::{Point, PointGraph, PointId};
