//! Ways of orienting a child frame relative to its parent.
use std::{array, fmt, str::FromStr};

use nox_sym::Expr;

use crate::{Axis, DCM, Error, Matrix3, ReferenceFrame, Result, Vector};

/// An Euler rotation sequence such as `313` or `XYZ`.
///
/// Consecutive axes must differ, which leaves the twelve classic orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationOrder(pub [Axis; 3]);

impl FromStr for RotationOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidRotationOrder(s.to_string());
        let axes = s
            .chars()
            .map(|c| match c.to_ascii_uppercase() {
                '1' | 'X' => Some(Axis::X),
                '2' | 'Y' => Some(Axis::Y),
                '3' | 'Z' => Some(Axis::Z),
                _ => None,
            })
            .collect::<Option<Vec<_>>>()
            .ok_or_else(invalid)?;
        let [a, b, c] = axes[..] else {
            return Err(invalid());
        };
        if a == b || b == c {
            return Err(invalid());
        }
        Ok(RotationOrder([a, b, c]))
    }
}

impl fmt::Display for RotationOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for axis in self.0 {
            write!(f, "{}", axis.index() + 1)?;
        }
        Ok(())
    }
}

/// How a new frame is rotated relative to its parent.
#[derive(Debug, Clone)]
pub enum Orientation {
    /// A simple rotation by `angle` about `axis`, a vector fixed in the parent.
    Axis { angle: Expr, axis: Vector },
    /// Three successive rotations about the axes of the rotating frame.
    Body {
        angles: [Expr; 3],
        order: RotationOrder,
    },
    /// Three successive rotations about the axes of the parent.
    Space {
        angles: [Expr; 3],
        order: RotationOrder,
    },
    /// Euler parameters with the scalar part first.
    Quaternion([Expr; 4]),
    /// The matrix that `parent.dcm(&child)` returns.
    Dcm(DCM),
}

/// One positional parameter for [`Orientation::parse`].
#[derive(Debug, Clone)]
pub enum OrientParam {
    Scalar(Expr),
    Vector(Vector),
    Order(String),
    Matrix(DCM),
}

impl From<Expr> for OrientParam {
    fn from(e: Expr) -> Self {
        OrientParam::Scalar(e)
    }
}

impl From<&Expr> for OrientParam {
    fn from(e: &Expr) -> Self {
        OrientParam::Scalar(e.clone())
    }
}

impl From<i64> for OrientParam {
    fn from(n: i64) -> Self {
        OrientParam::Scalar(Expr::int(n))
    }
}

impl From<Vector> for OrientParam {
    fn from(v: Vector) -> Self {
        OrientParam::Vector(v)
    }
}

impl From<&str> for OrientParam {
    fn from(s: &str) -> Self {
        OrientParam::Order(s.to_string())
    }
}

impl From<DCM> for OrientParam {
    fn from(m: DCM) -> Self {
        OrientParam::Matrix(m)
    }
}

/// Angular velocity of a child in its parent, in one of the two frames.
#[derive(Debug, Clone)]
pub(crate) enum AngVel {
    InParent([Expr; 3]),
    InChild([Expr; 3]),
}

#[derive(Debug, Clone)]
pub(crate) struct Resolved {
    /// Maps child components to parent components.
    pub(crate) child_to_parent: DCM,
    pub(crate) ang_vel: AngVel,
}

impl Orientation {
    pub fn axis(angle: impl Into<Expr>, axis: Vector) -> Self {
        Orientation::Axis {
            angle: angle.into(),
            axis,
        }
    }

    pub fn body(angles: [Expr; 3], order: &str) -> Result<Self> {
        Ok(Orientation::Body {
            angles,
            order: order.parse()?,
        })
    }

    pub fn space(angles: [Expr; 3], order: &str) -> Result<Self> {
        Ok(Orientation::Space {
            angles,
            order: order.parse()?,
        })
    }

    pub fn quaternion(params: [Expr; 4]) -> Self {
        Orientation::Quaternion(params)
    }

    pub fn dcm(matrix: DCM) -> Self {
        Orientation::Dcm(matrix)
    }

    /// Builds an orientation from a method name (`Axis`, `Body`, `Space`,
    /// `Quaternion` or `DCM`, case-insensitive) and its positional parameters.
    pub fn parse(method: &str, params: impl IntoIterator<Item = OrientParam>) -> Result<Self> {
        let params: Vec<OrientParam> = params.into_iter().collect();
        let invalid = |msg: &str| Error::InvalidOrientation(format!("{method}: {msg}"));
        match method.to_ascii_uppercase().as_str() {
            "AXIS" => match <[OrientParam; 2]>::try_from(params) {
                Ok([OrientParam::Scalar(angle), OrientParam::Vector(axis)]) => {
                    Ok(Orientation::Axis { angle, axis })
                }
                _ => Err(invalid("expected an angle and an axis vector")),
            },
            m @ ("BODY" | "SPACE") => match <[OrientParam; 4]>::try_from(params) {
                Ok(
                    [
                        OrientParam::Scalar(a),
                        OrientParam::Scalar(b),
                        OrientParam::Scalar(c),
                        OrientParam::Order(order),
                    ],
                ) => {
                    let angles = [a, b, c];
                    if m == "BODY" {
                        Orientation::body(angles, &order)
                    } else {
                        Orientation::space(angles, &order)
                    }
                }
                _ => Err(invalid("expected three angles and a rotation order")),
            },
            "QUATERNION" => {
                let scalars = params
                    .into_iter()
                    .map(|p| match p {
                        OrientParam::Scalar(e) => Some(e),
                        _ => None,
                    })
                    .collect::<Option<Vec<_>>>()
                    .and_then(|v| <[Expr; 4]>::try_from(v).ok());
                scalars
                    .map(Orientation::Quaternion)
                    .ok_or_else(|| invalid("expected four parameters"))
            }
            "DCM" => match <[OrientParam; 1]>::try_from(params) {
                Ok([OrientParam::Matrix(m)]) => Ok(Orientation::Dcm(m)),
                _ => Err(invalid("expected a single 3x3 matrix")),
            },
            _ => Err(Error::InvalidOrientation(format!(
                "unsupported method {method:?}"
            ))),
        }
    }

    pub fn method(&self) -> &'static str {
        match self {
            Orientation::Axis { .. } => "Axis",
            Orientation::Body { .. } => "Body",
            Orientation::Space { .. } => "Space",
            Orientation::Quaternion(_) => "Quaternion",
            Orientation::Dcm(_) => "DCM",
        }
    }

    pub(crate) fn resolve(&self, parent: &ReferenceFrame) -> Result<Resolved> {
        match self {
            Orientation::Axis { angle, axis } => axis_angle(parent, angle, axis),
            Orientation::Body { angles, order } => {
                let [r1, r2, r3] = elementary(angles, order);
                from_matrix(&(&r1 * &r2) * &r3)
            }
            Orientation::Space { angles, order } => {
                let [r1, r2, r3] = elementary(angles, order);
                from_matrix(&(&r3 * &r2) * &r1)
            }
            Orientation::Quaternion(q) => quaternion(q),
            Orientation::Dcm(m) => from_matrix(m.transpose()),
        }
    }
}

fn elementary(angles: &[Expr; 3], order: &RotationOrder) -> [Matrix3; 3] {
    array::from_fn(|i| Matrix3::rotation(order.0[i], &angles[i]))
}

/// Derives the body angular velocity `vee(R^T * dR/dt)`.
fn from_matrix(child_to_parent: DCM) -> Result<Resolved> {
    let omega = &child_to_parent.transpose() * &child_to_parent.dt()?;
    Ok(Resolved {
        ang_vel: AngVel::InChild(omega.vee()),
        child_to_parent,
    })
}

fn axis_angle(parent: &ReferenceFrame, angle: &Expr, axis: &Vector) -> Result<Resolved> {
    let k = axis.to_matrix(parent)?;
    if k.iter().all(Expr::is_zero) {
        return Err(Error::InvalidOrientation("axis must be non-zero".into()));
    }
    if axis.dt(parent)? != 0 {
        return Err(Error::InvalidOrientation(
            "axis cannot be time-varying".into(),
        ));
    }
    let norm = k.iter().map(|e| e.pow(2)).sum::<Expr>().sqrt();
    let mut unit = k.clone();
    for e in &mut unit {
        *e = e.checked_div(&norm)?;
    }
    let (c, s) = (angle.cos(), angle.sin());
    let r = &(&Matrix3::identity().scale(&c) + &Matrix3::outer(&unit, &unit).scale(&(1 - &c)))
        + &Matrix3::skew(&unit).scale(&s);
    let rate = angle.try_dt()?;
    Ok(Resolved {
        child_to_parent: r,
        ang_vel: AngVel::InParent(unit.map(|e| e * &rate)),
    })
}

fn quaternion(q: &[Expr; 4]) -> Result<Resolved> {
    let norm: Expr = q.iter().map(|e| e.pow(2)).sum();
    if norm.is_number() && norm != 1 {
        return Err(Error::InvalidOrientation(format!(
            "quaternion must have unit norm, got {norm}"
        )));
    }
    let [q0, q1, q2, q3] = q;
    let two = |e: Expr| e * 2;
    let r = Matrix3([
        [
            q0.pow(2) + q1.pow(2) - q2.pow(2) - q3.pow(2),
            two(q1 * q2 - q0 * q3),
            two(q0 * q2 + q1 * q3),
        ],
        [
            two(q1 * q2 + q0 * q3),
            q0.pow(2) - q1.pow(2) + q2.pow(2) - q3.pow(2),
            two(q2 * q3 - q0 * q1),
        ],
        [
            two(q1 * q3 - q0 * q2),
            two(q0 * q1 + q2 * q3),
            q0.pow(2) - q1.pow(2) - q2.pow(2) + q3.pow(2),
        ],
    ]);
    let [q0d, q1d, q2d, q3d] = [q0.try_dt()?, q1.try_dt()?, q2.try_dt()?, q3.try_dt()?];
    let w = [
        two(&q1d * q0 + &q2d * q3 - &q3d * q2 - &q0d * q1),
        two(&q2d * q0 + &q3d * q1 - &q1d * q3 - &q0d * q2),
        two(&q3d * q0 + &q1d * q2 - &q2d * q1 - &q0d * q3),
    ];
    Ok(Resolved {
        child_to_parent: r,
        ang_vel: AngVel::InChild(w),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FrameGraph;

    #[test]
    fn test_rotation_order() {
        assert_eq!(
            "313".parse::<RotationOrder>().unwrap(),
            RotationOrder([Axis::Z, Axis::X, Axis::Z])
        );
        assert_eq!("xyz".parse::<RotationOrder>().unwrap().to_string(), "123");
        for bad in ["", "12", "1234", "112", "133", "124", "abc"] {
            assert!(matches!(
                bad.parse::<RotationOrder>(),
                Err(Error::InvalidRotationOrder(_))
            ));
        }
    }

    #[test]
    fn test_parse_methods() {
        let n = FrameGraph::new().frame("N").unwrap();
        let q = Expr::dynamic_symbols("q1 q2 q3 q4");
        let params = [OrientParam::from(&q[0]), OrientParam::from(n.z())];
        let axis = Orientation::parse("axis", params).unwrap();
        assert_eq!(axis.method(), "Axis");
        let mut params: Vec<OrientParam> = q[..3].iter().map(OrientParam::from).collect();
        params.push(OrientParam::from("313"));
        let body = Orientation::parse("Body", params).unwrap();
        assert_eq!(body.method(), "Body");
        let params = [OrientParam::from(&q[0]), OrientParam::from("12")];
        assert!(Orientation::parse("Space", params).is_err());
        let quat = Orientation::parse("Quaternion", q.iter().map(OrientParam::from)).unwrap();
        assert_eq!(quat.method(), "Quaternion");
        assert!(Orientation::parse("Quaternion", q[..3].iter().map(OrientParam::from)).is_err());
        let dcm = Orientation::parse("DCM", [OrientParam::from(DCM::identity())]).unwrap();
        assert_eq!(dcm.method(), "DCM");
        assert!(matches!(
            Orientation::parse("Euler", Vec::new()),
            Err(Error::InvalidOrientation(_))
        ));
    }

    #[test]
    fn test_body_matches_successive_axes() {
        let graph = FrameGraph::new();
        let n = graph.frame("N").unwrap();
        let q = Expr::dynamic_symbols("q1 q2 q3");
        let b = n
            .orient_new("B", Orientation::body(q.clone().try_into().unwrap(), "123").unwrap())
            .unwrap();
        let a1 = n.orient_new("A1", Orientation::axis(q[0].clone(), n.x())).unwrap();
        let a2 = a1.orient_new("A2", Orientation::axis(q[1].clone(), a1.y())).unwrap();
        let a3 = a2.orient_new("A3", Orientation::axis(q[2].clone(), a2.z())).unwrap();
        assert_eq!(n.dcm(&b).unwrap(), n.dcm(&a3).unwrap());
        assert_eq!(b.ang_vel_in(&n).unwrap(), a3.ang_vel_in(&n).unwrap());
    }

    #[test]
    fn test_space_reverses_body() {
        let graph = FrameGraph::new();
        let n = graph.frame("N").unwrap();
        let q: [Expr; 3] = Expr::symbols("a b c").try_into().unwrap();
        let reversed = [q[2].clone(), q[1].clone(), q[0].clone()];
        let s = n.orient_new("S", Orientation::space(q, "123").unwrap()).unwrap();
        let b = n
            .orient_new("B", Orientation::body(reversed, "321").unwrap())
            .unwrap();
        assert_eq!(s.dcm(&n).unwrap(), b.dcm(&n).unwrap());
    }

    #[test]
    fn test_quaternion() {
        let graph = FrameGraph::new();
        let n = graph.frame("N").unwrap();
        let half = Expr::rational(1, 2);
        let c = Expr::int(2).sqrt() * &half;
        let quat = [c.clone(), Expr::zero(), Expr::zero(), c];
        let a = n.orient_new("A", Orientation::quaternion(quat)).unwrap();
        let z = n
            .orient_new("Z", Orientation::axis(Expr::pi() / 2, n.z()))
            .unwrap();
        assert_eq!(n.dcm(&a).unwrap(), n.dcm(&z).unwrap());
        let err = n
            .orient_new("Q", Orientation::quaternion([1, 1, 0, 0].map(Expr::int)))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidOrientation(_)));
        let symbolic = Expr::dynamic_symbols("q0 q1 q2 q3").try_into().unwrap();
        assert!(n.orient_new("S", Orientation::quaternion(symbolic)).is_ok());
    }

    #[test]
    fn test_explicit_dcm() {
        let graph = FrameGraph::new();
        let n = graph.frame("N").unwrap();
        let q = Expr::dynamic("q");
        let m = Matrix3::rotation(Axis::X, &q).transpose();
        let a = n.orient_new("A", Orientation::dcm(m.clone())).unwrap();
        assert_eq!(n.dcm(&a).unwrap(), m);
        assert_eq!(a.ang_vel_in(&n).unwrap(), q.dt() * a.x());
    }

    #[test]
    fn test_axis_validation() {
        let graph = FrameGraph::new();
        let n = graph.frame("N").unwrap();
        let q = Expr::dynamic("q");
        let zero = Orientation::axis(q.clone(), Vector::zero());
        assert!(matches!(n.orient_new("A", zero), Err(Error::InvalidOrientation(_))));
        let moving = Orientation::axis(q.clone(), &q * n.x() + n.y());
        assert!(matches!(n.orient_new("B", moving), Err(Error::InvalidOrientation(_))));
        let tilted = n
            .orient_new("C", Orientation::axis(q.clone(), n.x() + n.y()))
            .unwrap();
        let w = tilted.ang_vel_in(&n).unwrap();
        assert_eq!(w.magnitude().unwrap(), q.dt());
    }
}
