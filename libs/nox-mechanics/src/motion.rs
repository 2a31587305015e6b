use nox_frames::{ReferenceFrame, Vector};
use nox_sym::Expr;

use crate::Result;

/// Known motion of a point in a frame, plus the times at which the lower
/// derivatives are given.
///
/// `velocity` holds at `timevalue2`, `position` at `timevalue1`. Unset
/// vectors are zero and unset times are `0`.
#[derive(Clone, Debug, Default)]
pub struct MotionConditions {
    pub acceleration: Vector,
    pub velocity: Vector,
    pub position: Vector,
    pub timevalue1: Expr,
    pub timevalue2: Expr,
}

/// Returns `(acceleration, velocity, position)` in `frame`.
///
/// The highest non-zero derivative among acceleration and velocity is
/// integrated down from its boundary conditions; when both are zero the
/// position is differentiated instead.
pub fn get_motion_params(
    frame: &ReferenceFrame,
    conditions: &MotionConditions,
) -> Result<(Vector, Vector, Vector)> {
    let MotionConditions {
        acceleration,
        velocity,
        position,
        timevalue1,
        timevalue2,
    } = conditions;
    if *acceleration != 0 {
        let vel = integrate(acceleration, velocity, timevalue2, frame)?;
        let pos = integrate(&vel, position, timevalue1, frame)?;
        Ok((acceleration.clone(), vel, pos))
    } else if *velocity != 0 {
        let acc = velocity.dt(frame)?;
        let pos = integrate(velocity, position, timevalue1, frame)?;
        Ok((acc, velocity.clone(), pos))
    } else {
        let vel = position.dt(frame)?;
        let acc = vel.dt(frame)?;
        Ok((acc, vel, position.clone()))
    }
}

/// Integrates `derivative` from `at` to `t` along each axis of `frame`,
/// starting from the value `condition` takes at `at`.
fn integrate(
    derivative: &Vector,
    condition: &Vector,
    at: &Expr,
    frame: &ReferenceFrame,
) -> Result<Vector> {
    if *derivative == 0 {
        return Ok(condition.clone());
    }
    let t = Expr::time();
    let rates = derivative.to_matrix(frame)?;
    let start = condition.to_matrix(frame)?;
    let mut out = [Expr::zero(), Expr::zero(), Expr::zero()];
    for ((slot, rate), start) in out.iter_mut().zip(&rates).zip(&start) {
        *slot = start.subs(&t, at)? + rate.integrate_time_from(at)?;
    }
    Ok(Vector::from_components(frame, out))
}
