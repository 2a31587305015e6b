use nox_frames::{FrameGraph, Matrix3, Orientation, RotationOrder};
use nox_sym::Expr;
use tracing::trace;

use crate::{Error, Result};

/// Kinematic differential equations relating generalized speeds to the time
/// derivatives of orientation coordinates.
///
/// `rot_type` is one of `"body"`, `"space"` or `"quaternion"` (any case).
/// Body and space rotations take three coordinates and a three-axis
/// `rot_order`; quaternions take four coordinates, scalar part first, and an
/// empty order. Each returned expression has the form `q_i' - f_i(q, u)`, the
/// coordinate rates solved from the body angular velocity measure numbers
/// `u`.
pub fn kinematic_equations(
    speeds: &[Expr],
    coords: &[Expr],
    rot_type: &str,
    rot_order: &str,
) -> Result<Vec<Expr>> {
    let [u1, u2, u3] = speeds else {
        return Err(Error::InvalidKinematics(format!(
            "expected 3 speeds, got {}",
            speeds.len()
        )));
    };
    trace!(rot_type, rot_order, "kinematic equations");
    match rot_type.to_ascii_lowercase().as_str() {
        "quaternion" => {
            if !rot_order.is_empty() {
                return Err(Error::InvalidKinematics(
                    "quaternion kinematics take no rotation order".into(),
                ));
            }
            let [e0, e1, e2, e3] = coords else {
                return Err(Error::InvalidKinematics(format!(
                    "expected 4 quaternion coordinates, got {}",
                    coords.len()
                )));
            };
            let half = |e: Expr| e / 2;
            Ok(vec![
                e1.try_dt()? - half(e0 * u1 - e3 * u2 + e2 * u3),
                e2.try_dt()? - half(e3 * u1 + e0 * u2 - e1 * u3),
                e3.try_dt()? - half(-(e2 * u1) + e1 * u2 + e0 * u3),
                e0.try_dt()? - half(-(e1 * u1) - e2 * u2 - e3 * u3),
            ])
        }
        kind @ ("body" | "space") => {
            let [q1, q2, q3] = coords else {
                return Err(Error::InvalidKinematics(format!(
                    "expected 3 coordinates, got {}",
                    coords.len()
                )));
            };
            if !coords.iter().all(|q| q.is_variable() && q.depends_on_time()) {
                return Err(Error::InvalidKinematics(
                    "coordinates must be dynamic symbols".into(),
                ));
            }
            let order: RotationOrder = rot_order.parse()?;
            let angles = [q1.clone(), q2.clone(), q3.clone()];
            let orientation = if kind == "body" {
                Orientation::Body { angles, order }
            } else {
                Orientation::Space { angles, order }
            };
            let graph = FrameGraph::new();
            let parent = graph.frame("N")?;
            let child = parent.orient_new("B", orientation)?;
            let w = child.ang_vel_in(&parent)?.to_matrix(&child)?;
            let rates = [q1.try_dt()?, q2.try_dt()?, q3.try_dt()?];
            // w = m * rates, with m a function of the coordinates only.
            let mut m = Matrix3::zeros();
            for (row, w) in m.0.iter_mut().zip(&w) {
                for (entry, rate) in row.iter_mut().zip(&rates) {
                    *entry = w.diff(rate)?;
                    for other in &rates {
                        if !entry.free_of(other)? {
                            return Err(Error::InvalidKinematics(format!(
                                "angular velocity is not linear in {other}"
                            )));
                        }
                    }
                }
            }
            let inverse = m.try_inverse().map_err(|_| {
                Error::InvalidKinematics(format!("{kind} {rot_order} kinematics are singular"))
            })?;
            let solved = inverse.dot(&[u1.clone(), u2.clone(), u3.clone()]);
            Ok(rates
                .into_iter()
                .zip(solved)
                .map(|(rate, s)| rate - s)
                .collect())
        }
        other => Err(Error::InvalidKinematics(format!(
            "unsupported rotation type {other:?}"
        ))),
    }
}
