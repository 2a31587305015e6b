use nox_frames::{
    Error, FrameGraph, Operand, Orientation, ReferenceFrame, Vector, cross, dot, express, outer,
};
use nox_sym::Expr;

mod util;

struct Chain {
    n: ReferenceFrame,
    a: ReferenceFrame,
    b: ReferenceFrame,
    c: ReferenceFrame,
    q1: Expr,
    s1: Expr,
    c1: Expr,
    s2: Expr,
    c2: Expr,
    s3: Expr,
    c3: Expr,
}

fn chain() -> Chain {
    util::trace_init();
    let graph = FrameGraph::new();
    let q = Expr::symbols("q1 q2 q3");
    let n = graph.frame("N").unwrap();
    let a = n
        .orient_new("A", Orientation::axis(q[0].clone(), n.z()))
        .unwrap();
    let b = a
        .orient_new("B", Orientation::axis(q[1].clone(), a.x()))
        .unwrap();
    let c = b
        .orient_new("C", Orientation::axis(q[2].clone(), b.y()))
        .unwrap();
    Chain {
        n,
        a,
        b,
        c,
        q1: q[0].clone(),
        s1: q[0].sin(),
        c1: q[0].cos(),
        s2: q[1].sin(),
        c2: q[1].cos(),
        s3: q[2].sin(),
        c3: q[2].cos(),
    }
}

fn dot_s(u: &Vector, v: &Vector) -> Expr {
    dot(u, v).unwrap().into_scalar().unwrap()
}

fn cross_v(u: &Vector, v: &Vector) -> Vector {
    cross(u, v).unwrap().into_vector().unwrap()
}

fn express_v(v: &Vector, frame: &ReferenceFrame) -> Vector {
    express(v, frame).unwrap().into_vector().unwrap()
}

#[test]
fn test_dot() {
    let Chain { a, .. } = chain();
    let basis = [a.x(), a.y(), a.z()];
    for (i, u) in basis.iter().enumerate() {
        for (j, v) in basis.iter().enumerate() {
            assert_eq!(dot_s(u, v), i64::from(i == j));
        }
    }
}

#[test]
fn test_dot_different_frames() {
    let t = chain();
    let (n, a, c) = (&t.n, &t.a, &t.c);
    assert_eq!(dot_s(&n.x(), &a.x()), t.c1);
    assert_eq!(dot_s(&n.x(), &a.y()), -&t.s1);
    assert_eq!(dot_s(&n.x(), &a.z()), 0);
    assert_eq!(dot_s(&n.y(), &a.x()), t.s1);
    assert_eq!(dot_s(&n.y(), &a.y()), t.c1);
    assert_eq!(dot_s(&n.y(), &a.z()), 0);
    assert_eq!(dot_s(&n.z(), &a.x()), 0);
    assert_eq!(dot_s(&n.z(), &a.y()), 0);
    assert_eq!(dot_s(&n.z(), &a.z()), 1);

    let shifted = Expr::int(2).sqrt() * (&t.q1 + Expr::pi() / 4).cos();
    assert_eq!(dot_s(&n.x(), &(a.x() + a.y())), shifted);
    assert_eq!(dot_s(&(a.x() + a.y()), &n.x()), shifted);

    assert_eq!(dot_s(&a.x(), &c.x()), t.c3);
    assert_eq!(dot_s(&a.x(), &c.y()), 0);
    assert_eq!(dot_s(&a.x(), &c.z()), t.s3);
    assert_eq!(dot_s(&a.y(), &c.x()), &t.s2 * &t.s3);
    assert_eq!(dot_s(&a.y(), &c.y()), t.c2);
    assert_eq!(dot_s(&a.y(), &c.z()), -(&t.s2 * &t.c3));
    assert_eq!(dot_s(&a.z(), &c.x()), -(&t.c2 * &t.s3));
    assert_eq!(dot_s(&a.z(), &c.y()), t.s2);
    assert_eq!(dot_s(&a.z(), &c.z()), &t.c2 * &t.c3);
}

#[test]
fn test_cross() {
    let Chain { a, .. } = chain();
    assert_eq!(cross_v(&a.x(), &a.x()), 0);
    assert_eq!(cross_v(&a.x(), &a.y()), a.z());
    assert_eq!(cross_v(&a.x(), &a.z()), -a.y());

    assert_eq!(cross_v(&a.y(), &a.x()), -a.z());
    assert_eq!(cross_v(&a.y(), &a.y()), 0);
    assert_eq!(cross_v(&a.y(), &a.z()), a.x());

    assert_eq!(cross_v(&a.z(), &a.x()), a.y());
    assert_eq!(cross_v(&a.z(), &a.y()), -a.x());
    assert_eq!(cross_v(&a.z(), &a.z()), 0);
}

#[test]
fn test_cross_different_frames() {
    let t = chain();
    let (n, a, c) = (&t.n, &t.a, &t.c);
    let (s1, c1, s3, c3) = (&t.s1, &t.c1, &t.s3, &t.c3);
    assert_eq!(cross_v(&n.x(), &a.x()), s1 * a.z());
    assert_eq!(cross_v(&n.x(), &a.y()), c1 * a.z());
    assert_eq!(cross_v(&n.x(), &a.z()), -(s1 * a.x()) - c1 * a.y());
    assert_eq!(cross_v(&n.y(), &a.x()), -(c1 * a.z()));
    assert_eq!(cross_v(&n.y(), &a.y()), s1 * a.z());
    assert_eq!(cross_v(&n.y(), &a.z()), c1 * a.x() - s1 * a.y());
    assert_eq!(cross_v(&n.z(), &a.x()), a.y());
    assert_eq!(cross_v(&n.z(), &a.y()), -a.x());
    assert_eq!(cross_v(&n.z(), &a.z()), 0);

    assert_eq!(cross_v(&n.x(), &(a.x() + a.y())), s1 * a.z() + c1 * a.z());
    assert_eq!(cross_v(&(a.x() + a.y()), &n.x()), -(s1 * a.z()) - c1 * a.z());

    assert_eq!(cross_v(&a.x(), &c.x()), s3 * c.y());
    assert_eq!(cross_v(&a.x(), &c.y()), -(s3 * c.x()) + c3 * c.z());
    assert_eq!(cross_v(&a.x(), &c.z()), -(c3 * c.y()));
    assert_eq!(cross_v(&c.x(), &a.x()), -(s3 * c.y()));
    assert_eq!(cross_v(&c.y(), &a.x()), s3 * c.x() - c3 * c.z());
    assert_eq!(cross_v(&c.z(), &a.x()), c3 * c.y());
}

#[test]
fn test_operator_match() {
    let graph = FrameGraph::new();
    let a = graph.frame("A").unwrap();
    let v = a.x() + a.y();
    let d = &v | &v;
    let zerov = Vector::zero();
    let zerod = nox_frames::Dyadic::zero();

    assert_eq!(dot(&d, &d).unwrap(), Operand::Dyadic(d.dot_dyadic(&d).unwrap()));
    assert_eq!(dot(&d, &zerod).unwrap(), Operand::Dyadic(zerod.clone()));
    assert_eq!(dot(&zerod, &d).unwrap(), Operand::Dyadic(zerod.clone()));
    assert_eq!(dot(&d, &v).unwrap(), Operand::Vector(d.dot_vector(&v).unwrap()));
    assert_eq!(dot(&v, &d).unwrap(), Operand::Vector(d.vector_dot(&v).unwrap()));
    assert_eq!(dot(&d, &zerov).unwrap(), Operand::Vector(Vector::zero()));
    assert_eq!(dot(&zerov, &d).unwrap(), Operand::Vector(Vector::zero()));
    assert_eq!(dot(&v, &v).unwrap(), Operand::Scalar(Expr::int(2)));
    assert_eq!(dot(&v, &zerov).unwrap(), Operand::Scalar(Expr::zero()));
    assert_eq!(dot(&zerov, &v).unwrap(), Operand::Scalar(Expr::zero()));

    assert_eq!(cross(&d, &v).unwrap(), Operand::Dyadic(d.cross_vector(&v).unwrap()));
    assert_eq!(cross(&v, &d).unwrap(), Operand::Dyadic(d.vector_cross(&v).unwrap()));
    assert_eq!(cross(&d, &zerov).unwrap(), Operand::Dyadic(zerod.clone()));
    assert_eq!(cross(&zerov, &d).unwrap(), Operand::Dyadic(zerod.clone()));
    assert_eq!(cross(&v, &v).unwrap(), Operand::Vector(Vector::zero()));
    assert_eq!(cross(&v, &zerov).unwrap(), Operand::Vector(Vector::zero()));
    assert_eq!(cross(&zerov, &v).unwrap(), Operand::Vector(Vector::zero()));

    assert_eq!(outer(&v, &v).unwrap(), Operand::Dyadic(d.clone()));
    assert_eq!(outer(&v, &zerov).unwrap(), Operand::Dyadic(zerod.clone()));
    assert_eq!(outer(&zerov, &v).unwrap(), Operand::Dyadic(zerod.clone()));

    let rejected = [
        dot(&d, Expr::zero()),
        dot(Expr::zero(), &d),
        dot(&d, 0),
        dot(0, &d),
        dot(&v, Expr::zero()),
        dot(Expr::zero(), &v),
        dot(&v, 0),
        dot(0, &v),
        cross(&d, &d),
        cross(&d, &zerod),
        cross(&zerod, &d),
        cross(&d, 0),
        cross(0, &d),
        cross(&v, Expr::zero()),
        cross(Expr::zero(), &v),
        cross(&v, 0),
        cross(0, &v),
        outer(&d, &d),
        outer(&d, &zerod),
        outer(&zerod, &d),
        outer(&d, &v),
        outer(&v, &d),
        outer(&d, &zerov),
        outer(&zerov, &d),
        outer(&d, 0),
        outer(0, &d),
        outer(&v, Expr::zero()),
        outer(Expr::zero(), &v),
        outer(&v, 0),
        outer(0, &v),
    ];
    for result in rejected {
        assert!(matches!(result, Err(Error::Operand(_))), "{result:?}");
    }
}

#[test]
fn test_express_unit_vectors() {
    let t = chain();
    let (n, a, b, c) = (&t.n, &t.a, &t.b, &t.c);
    let (s1, c1, s2, c2, s3, c3) = (&t.s1, &t.c1, &t.s2, &t.c2, &t.s3, &t.c3);

    assert_eq!(express_v(&a.x(), c), c3 * c.x() + s3 * c.z());
    assert_eq!(
        express_v(&a.y(), c),
        s2 * s3 * c.x() + c2 * c.y() - s2 * c3 * c.z()
    );
    assert_eq!(
        express_v(&a.z(), c),
        -(s3 * c2) * c.x() + s2 * c.y() + c2 * c3 * c.z()
    );
    assert_eq!(express_v(&a.x(), n), c1 * n.x() + s1 * n.y());
    assert_eq!(express_v(&a.y(), n), -s1 * n.x() + c1 * n.y());
    assert_eq!(express_v(&a.z(), n), n.z());
    assert_eq!(express_v(&a.x(), a), a.x());
    assert_eq!(express_v(&a.y(), a), a.y());
    assert_eq!(express_v(&a.z(), a), a.z());
    assert_eq!(express_v(&a.x(), b), b.x());
    assert_eq!(express_v(&a.y(), b), c2 * b.y() - s2 * b.z());
    assert_eq!(express_v(&a.z(), b), s2 * b.y() + c2 * b.z());

    assert_eq!(express_v(&n.x(), n), n.x());
    assert_eq!(express_v(&n.y(), n), n.y());
    assert_eq!(express_v(&n.z(), n), n.z());
    assert_eq!(express_v(&n.x(), a), c1 * a.x() - s1 * a.y());
    assert_eq!(express_v(&n.y(), a), s1 * a.x() + c1 * a.y());
    assert_eq!(express_v(&n.z(), a), a.z());
    assert_eq!(
        express_v(&n.x(), b),
        c1 * b.x() - s1 * c2 * b.y() + s1 * s2 * b.z()
    );
    assert_eq!(
        express_v(&n.y(), b),
        s1 * b.x() + c1 * c2 * b.y() - s2 * c1 * b.z()
    );
    assert_eq!(express_v(&n.z(), b), s2 * b.y() + c2 * b.z());
    assert_eq!(
        express_v(&n.x(), c),
        (c1 * c3 - s1 * s2 * s3) * c.x() - s1 * c2 * c.y() + (s3 * c1 + s1 * s2 * c3) * c.z()
    );
    assert_eq!(
        express_v(&n.y(), c),
        (s1 * c3 + s2 * s3 * c1) * c.x() + c1 * c2 * c.y() + (s1 * s3 - s2 * c1 * c3) * c.z()
    );
    assert_eq!(
        express_v(&n.z(), c),
        -(s3 * c2) * c.x() + s2 * c.y() + c2 * c3 * c.z()
    );

    assert_eq!(express_v(&b.x(), n), c1 * n.x() + s1 * n.y());
    assert_eq!(
        express_v(&b.y(), n),
        -(s1 * c2) * n.x() + c1 * c2 * n.y() + s2 * n.z()
    );
    assert_eq!(
        express_v(&b.z(), n),
        s1 * s2 * n.x() - s2 * c1 * n.y() + c2 * n.z()
    );
    assert_eq!(express_v(&b.x(), a), a.x());
    assert_eq!(express_v(&b.y(), a), c2 * a.y() + s2 * a.z());
    assert_eq!(express_v(&b.z(), a), -s2 * a.y() + c2 * a.z());
    assert_eq!(express_v(&b.x(), b), b.x());
    assert_eq!(express_v(&b.y(), b), b.y());
    assert_eq!(express_v(&b.z(), b), b.z());
    assert_eq!(express_v(&b.x(), c), c3 * c.x() + s3 * c.z());
    assert_eq!(express_v(&b.y(), c), c.y());
    assert_eq!(express_v(&b.z(), c), -s3 * c.x() + c3 * c.z());

    assert_eq!(
        express_v(&c.x(), n),
        (c1 * c3 - s1 * s2 * s3) * n.x() + (s1 * c3 + s2 * s3 * c1) * n.y() - s3 * c2 * n.z()
    );
    assert_eq!(
        express_v(&c.y(), n),
        -(s1 * c2) * n.x() + c1 * c2 * n.y() + s2 * n.z()
    );
    assert_eq!(
        express_v(&c.z(), n),
        (s3 * c1 + s1 * s2 * c3) * n.x() + (s1 * s3 - s2 * c1 * c3) * n.y() + c2 * c3 * n.z()
    );
    assert_eq!(
        express_v(&c.x(), a),
        c3 * a.x() + s2 * s3 * a.y() - s3 * c2 * a.z()
    );
    assert_eq!(express_v(&c.y(), a), c2 * a.y() + s2 * a.z());
    assert_eq!(
        express_v(&c.z(), a),
        s3 * a.x() - s2 * c3 * a.y() + c2 * c3 * a.z()
    );
    assert_eq!(express_v(&c.x(), b), c3 * b.x() - s3 * b.z());
    assert_eq!(express_v(&c.y(), b), b.y());
    assert_eq!(express_v(&c.z(), b), s3 * b.x() + c3 * b.z());
    assert_eq!(express_v(&c.x(), c), c.x());
    assert_eq!(express_v(&c.y(), c), c.y());
    assert_eq!(express_v(&c.z(), c), c.z());
}

#[test]
fn test_express_back_to_unit_vectors() {
    let t = chain();
    let (n, a, b, c) = (&t.n, &t.a, &t.b, &t.c);
    let (s1, c1, s2, c2, s3, c3) = (&t.s1, &t.c1, &t.s2, &t.c2, &t.s3, &t.c3);

    assert_eq!(n.x(), express_v(&(c1 * a.x() - s1 * a.y()), n));
    assert_eq!(n.y(), express_v(&(s1 * a.x() + c1 * a.y()), n));
    assert_eq!(
        n.x(),
        express_v(&(c1 * b.x() - s1 * c2 * b.y() + s1 * s2 * b.z()), n)
    );
    assert_eq!(
        n.y(),
        express_v(&(s1 * b.x() + c1 * c2 * b.y() - s2 * c1 * b.z()), n)
    );
    assert_eq!(n.z(), express_v(&(s2 * b.y() + c2 * b.z()), n));
    // Three rotations deep still collapses to a single unit vector.
    assert_eq!(
        n.x(),
        express_v(
            &((c1 * c3 - s1 * s2 * s3) * c.x() - s1 * c2 * c.y()
                + (s3 * c1 + s1 * s2 * c3) * c.z()),
            n
        )
    );
    assert_eq!(
        n.z(),
        express_v(&(-(s3 * c2) * c.x() + s2 * c.y() + c2 * c3 * c.z()), n)
    );

    assert_eq!(a.x(), express_v(&(c1 * n.x() + s1 * n.y()), a));
    assert_eq!(a.y(), express_v(&(-s1 * n.x() + c1 * n.y()), a));
    assert_eq!(a.y(), express_v(&(c2 * b.y() - s2 * b.z()), a));
    assert_eq!(a.z(), express_v(&(s2 * b.y() + c2 * b.z()), a));
    assert_eq!(a.x(), express_v(&(c3 * c.x() + s3 * c.z()), a));
    assert_eq!(
        a.y(),
        express_v(&(s2 * s3 * c.x() + c2 * c.y() - s2 * c3 * c.z()), a)
    );
    assert_eq!(
        a.z(),
        express_v(&(-(s3 * c2) * c.x() + s2 * c.y() + c2 * c3 * c.z()), a)
    );
    assert_eq!(b.x(), express_v(&(c1 * n.x() + s1 * n.y()), b));
    assert_eq!(
        b.y(),
        express_v(&(-(s1 * c2) * n.x() + c1 * c2 * n.y() + s2 * n.z()), b)
    );
    assert_eq!(
        b.z(),
        express_v(&(s1 * s2 * n.x() - s2 * c1 * n.y() + c2 * n.z()), b)
    );
    assert_eq!(b.y(), express_v(&(c2 * a.y() + s2 * a.z()), b));
    assert_eq!(b.z(), express_v(&(-s2 * a.y() + c2 * a.z()), b));
    assert_eq!(b.x(), express_v(&(c3 * c.x() + s3 * c.z()), b));
    assert_eq!(b.z(), express_v(&(-s3 * c.x() + c3 * c.z()), b));

    assert_eq!(
        c.x(),
        express_v(&(c3 * a.x() + s2 * s3 * a.y() - s3 * c2 * a.z()), c)
    );
    assert_eq!(c.y(), express_v(&(c2 * a.y() + s2 * a.z()), c));
    assert_eq!(
        c.z(),
        express_v(&(s3 * a.x() - s2 * c3 * a.y() + c2 * c3 * a.z()), c)
    );
    assert_eq!(
        c.y(),
        express_v(&(-(s1 * c2) * n.x() + c1 * c2 * n.y() + s2 * n.z()), c)
    );
}

#[test]
fn test_express_dyadic() {
    let t = chain();
    let (n, a) = (&t.n, &t.a);
    let d = a.x() | a.x();
    let expressed = express(&d, n).unwrap().into_dyadic().unwrap();
    let ax = &t.c1 * n.x() + &t.s1 * n.y();
    assert_eq!(expressed, &ax | &ax);
    assert_eq!(express(Expr::one(), n).unwrap(), Operand::Scalar(Expr::one()));
}

#[test]
fn test_half_rotations_compose() {
    util::trace_init();
    let graph = FrameGraph::new();
    let q = Expr::dynamic("q");
    let half = &q / 2;
    let n = graph.frame("N").unwrap();
    let a = n
        .orient_new("A", Orientation::axis(half.clone(), n.z()))
        .unwrap();
    let b = a
        .orient_new("B", Orientation::axis(half.clone(), a.z()))
        .unwrap();
    let c = n
        .orient_new("C", Orientation::axis(q.clone(), n.z()))
        .unwrap();
    assert_eq!(b.x(), c.x());
    assert_eq!(b.y(), c.y());
    assert_eq!(express_v(&b.x(), &n), q.cos() * n.x() + q.sin() * n.y());
    assert_eq!(dot_s(&b.x(), &n.x()), q.cos());
    assert_eq!(dot_s(&b.x(), &c.y()), 0);
    assert_eq!(n.dcm(&b).unwrap(), n.dcm(&c).unwrap());
    assert_eq!(b.ang_vel_in(&n).unwrap(), c.ang_vel_in(&n).unwrap());
}
