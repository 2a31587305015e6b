//! Inertia construction and system-wide sums over bodies.
use nox_frames::{Dyadic, ReferenceFrame, Vector};
use nox_sym::Expr;

use crate::{Body, Point, Result};

/// The symmetric inertia dyadic with the given moments and products in
/// `frame`.
pub fn inertia(
    frame: &ReferenceFrame,
    ixx: impl Into<Expr>,
    iyy: impl Into<Expr>,
    izz: impl Into<Expr>,
    ixy: impl Into<Expr>,
    iyz: impl Into<Expr>,
    izx: impl Into<Expr>,
) -> Dyadic {
    let (ixx, iyy, izz) = (ixx.into(), iyy.into(), izz.into());
    let (ixy, iyz, izx) = (ixy.into(), iyz.into(), izx.into());
    let (x, y, z) = (frame.x(), frame.y(), frame.z());
    [
        (&ixx, &x, &x),
        (&ixy, &x, &y),
        (&izx, &x, &z),
        (&ixy, &y, &x),
        (&iyy, &y, &y),
        (&iyz, &y, &z),
        (&izx, &z, &x),
        (&iyz, &z, &y),
        (&izz, &z, &z),
    ]
    .into_iter()
    .map(|(k, a, b)| k * &(a | b))
    .sum()
}

/// Inertia of a point mass at `pos`, about the origin of `pos`, in `frame`.
pub fn inertia_of_point_mass(
    mass: impl Into<Expr>,
    pos: &Vector,
    frame: &ReferenceFrame,
) -> Result<Dyadic> {
    let mass = mass.into();
    let unit = inertia(frame, 1, 1, 1, 0, 0, 0);
    let r2 = pos.dot(pos)?;
    Ok(&unit * &(&mass * &r2) - &pos.outer(pos) * &mass)
}

/// Total linear momentum of `bodies` in `frame`.
pub fn linear_momentum(frame: &ReferenceFrame, bodies: &[&dyn Body]) -> Result<Vector> {
    let mut out = Vector::zero();
    for body in bodies {
        out += body.linear_momentum(frame)?;
    }
    Ok(out)
}

/// Total angular momentum of `bodies` about `point` in `frame`.
pub fn angular_momentum(
    point: &Point,
    frame: &ReferenceFrame,
    bodies: &[&dyn Body],
) -> Result<Vector> {
    let mut out = Vector::zero();
    for body in bodies {
        out += body.angular_momentum(point, frame)?;
    }
    Ok(out)
}

pub fn kinetic_energy(frame: &ReferenceFrame, bodies: &[&dyn Body]) -> Result<Expr> {
    let mut out = Expr::zero();
    for body in bodies {
        out += body.kinetic_energy(frame)?;
    }
    Ok(out)
}

pub fn potential_energy(bodies: &[&dyn Body]) -> Expr {
    bodies.iter().map(|b| b.potential_energy()).sum()
}

/// Partial velocities: entry `[i][j]` is the derivative of `vel_list[i]` with
/// respect to the generalized speed `u_list[j]`, taken in `frame`.
pub fn partial_velocity(
    vel_list: &[Vector],
    u_list: &[Expr],
    frame: &ReferenceFrame,
) -> Result<Vec<Vec<Vector>>> {
    vel_list
        .iter()
        .map(|v| {
            u_list
                .iter()
                .map(|u| Ok(v.diff(u, frame)?))
                .collect::<Result<Vec<_>>>()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use nox_frames::FrameGraph;

    use super::*;

    #[test]
    fn test_inertia_symmetry() {
        let n = FrameGraph::new().frame("N").unwrap();
        let [a, b, c] = [Expr::symbol("a"), Expr::symbol("b"), Expr::symbol("c")];
        let i = inertia(&n, 1, 2, 3, a.clone(), b.clone(), c.clone());
        let m = i.to_matrix(&n).unwrap();
        assert_eq!(m, m.transpose());
        assert_eq!(m.0[0][1], a);
        assert_eq!(m.0[1][2], b);
        assert_eq!(m.0[2][0], c);
    }

    #[test]
    fn test_partial_velocity_rejects_non_variables() {
        let n = FrameGraph::new().frame("N").unwrap();
        let u = Expr::dynamic("u");
        let v = &u * n.x();
        let err = partial_velocity(&[v], &[&u * 2], &n);
        assert!(err.is_err());
    }
}
