//! Particles and rigid bodies.
use nox_frames::{Dyadic, ReferenceFrame, Vector};
use nox_sym::Expr;

use crate::{Point, Result, inertia_of_point_mass};

/// Anything that carries mass and can report its momenta and energies.
pub trait Body {
    fn name(&self) -> &str;

    fn mass(&self) -> &Expr;

    fn linear_momentum(&self, frame: &ReferenceFrame) -> Result<Vector>;

    /// Angular momentum about `point` in `frame`.
    fn angular_momentum(&self, point: &Point, frame: &ReferenceFrame) -> Result<Vector>;

    fn kinetic_energy(&self, frame: &ReferenceFrame) -> Result<Expr>;

    fn potential_energy(&self) -> &Expr;
}

/// A point mass.
#[derive(Clone, Debug)]
pub struct Particle {
    pub name: String,
    pub point: Point,
    pub mass: Expr,
    pub potential_energy: Expr,
}

impl Particle {
    pub fn new(name: impl Into<String>, point: Point, mass: impl Into<Expr>) -> Self {
        Particle {
            name: name.into(),
            point,
            mass: mass.into(),
            potential_energy: Expr::zero(),
        }
    }

    pub fn set_potential_energy(&mut self, value: impl Into<Expr>) {
        self.potential_energy = value.into();
    }
}

impl Body for Particle {
    fn name(&self) -> &str {
        &self.name
    }

    fn mass(&self) -> &Expr {
        &self.mass
    }

    fn linear_momentum(&self, frame: &ReferenceFrame) -> Result<Vector> {
        Ok(self.point.vel(frame)? * self.mass.clone())
    }

    fn angular_momentum(&self, point: &Point, frame: &ReferenceFrame) -> Result<Vector> {
        let r = self.point.pos_from(point)?;
        Ok(r.cross(&self.linear_momentum(frame)?)?)
    }

    fn kinetic_energy(&self, frame: &ReferenceFrame) -> Result<Expr> {
        let v = self.point.vel(frame)?;
        Ok(&self.mass * v.dot(&v)? / 2)
    }

    fn potential_energy(&self) -> &Expr {
        &self.potential_energy
    }
}

/// A rigid body with a mass center fixed in its body frame.
///
/// The inertia is given about an arbitrary point; the central inertia is
/// derived from it with the parallel axis theorem.
#[derive(Clone, Debug)]
pub struct RigidBody {
    pub name: String,
    pub masscenter: Point,
    pub frame: ReferenceFrame,
    pub mass: Expr,
    inertia: (Dyadic, Point),
    central_inertia: Dyadic,
    pub potential_energy: Expr,
}

impl RigidBody {
    pub fn new(
        name: impl Into<String>,
        masscenter: Point,
        frame: ReferenceFrame,
        mass: impl Into<Expr>,
        inertia: (Dyadic, Point),
    ) -> Result<Self> {
        let mass = mass.into();
        let central_inertia = central(&mass, &masscenter, &frame, &inertia)?;
        Ok(RigidBody {
            name: name.into(),
            masscenter,
            frame,
            mass,
            inertia,
            central_inertia,
            potential_energy: Expr::zero(),
        })
    }

    pub fn inertia(&self) -> &(Dyadic, Point) {
        &self.inertia
    }

    pub fn central_inertia(&self) -> &Dyadic {
        &self.central_inertia
    }

    pub fn set_inertia(&mut self, inertia: (Dyadic, Point)) -> Result<()> {
        self.central_inertia = central(&self.mass, &self.masscenter, &self.frame, &inertia)?;
        self.inertia = inertia;
        Ok(())
    }

    pub fn set_potential_energy(&mut self, value: impl Into<Expr>) {
        self.potential_energy = value.into();
    }
}

fn central(
    mass: &Expr,
    masscenter: &Point,
    frame: &ReferenceFrame,
    (dyadic, point): &(Dyadic, Point),
) -> Result<Dyadic> {
    let shift = inertia_of_point_mass(mass.clone(), &masscenter.pos_from(point)?, frame)?;
    Ok(dyadic - &shift)
}

impl Body for RigidBody {
    fn name(&self) -> &str {
        &self.name
    }

    fn mass(&self) -> &Expr {
        &self.mass
    }

    fn linear_momentum(&self, frame: &ReferenceFrame) -> Result<Vector> {
        Ok(self.masscenter.vel(frame)? * self.mass.clone())
    }

    fn angular_momentum(&self, point: &Point, frame: &ReferenceFrame) -> Result<Vector> {
        let w = self.frame.ang_vel_in(frame)?;
        let r = self.masscenter.pos_from(point)?;
        let spin = self.central_inertia.dot_vector(&w)?;
        Ok(spin + r.cross(&self.linear_momentum(frame)?)?)
    }

    fn kinetic_energy(&self, frame: &ReferenceFrame) -> Result<Expr> {
        let w = self.frame.ang_vel_in(frame)?;
        let v = self.masscenter.vel(frame)?;
        let rotational = w.dot(&self.central_inertia.dot_vector(&w)?)?;
        let translational = &self.mass * v.dot(&v)?;
        Ok((rotational + translational) / 2)
    }

    fn potential_energy(&self) -> &Expr {
        &self.potential_energy
    }
}

#[cfg(test)]
mod tests {
    use nox_frames::FrameGraph;

    use super::*;
    use crate::{PointGraph, inertia};

    #[test]
    fn test_central_inertia_shift() {
        let n = FrameGraph::new().frame("N").unwrap();
        let points = PointGraph::new();
        let o = points.point("O").unwrap();
        let l = Expr::symbol("l");
        let cm = o.locate_new("CM", &(&l * n.x())).unwrap();
        let m = Expr::symbol("m");
        let about_o = inertia(&n, 0, &m * l.pow(2), &m * l.pow(2), 0, 0, 0);
        let body = RigidBody::new("B", cm, n.clone(), m, (about_o, o)).unwrap();
        assert_eq!(*body.central_inertia(), 0);
    }

    #[test]
    fn test_particle() {
        let n = FrameGraph::new().frame("N").unwrap();
        let points = PointGraph::new();
        let o = points.point("O").unwrap();
        let p = o.locate_new("P", &n.x()).unwrap();
        p.set_vel(&n, &(Expr::int(3) * n.y()));
        let mut pa = Particle::new("Pa", p, 2);
        assert_eq!(pa.linear_momentum(&n).unwrap(), Expr::int(6) * n.y());
        assert_eq!(pa.angular_momentum(&o, &n).unwrap(), Expr::int(6) * n.z());
        assert_eq!(pa.kinetic_energy(&n).unwrap(), 9);
        pa.set_potential_energy(Expr::symbol("V"));
        assert_eq!(*pa.potential_energy(), Expr::symbol("V"));
    }
}
