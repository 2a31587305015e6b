//! Symbolic 3x3 matrices and direction cosine matrices.
use std::{
    array, fmt,
    ops::{Add, Mul, Sub},
};

use nox_sym::Expr;

use crate::{Axis, Result};

/// A 3x3 matrix with symbolic entries, stored row-major.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Matrix3(pub [[Expr; 3]; 3]);

/// Direction cosine matrix. `dcm(from, to)` maps column vectors of `from`
/// components to column vectors of `to` components.
pub type DCM = Matrix3;

impl Matrix3 {
    pub fn from_fn(mut f: impl FnMut(usize, usize) -> Expr) -> Self {
        Matrix3(array::from_fn(|i| array::from_fn(|j| f(i, j))))
    }

    pub fn zeros() -> Self {
        Matrix3::default()
    }

    pub fn identity() -> Self {
        Matrix3::from_fn(|i, j| if i == j { Expr::one() } else { Expr::zero() })
    }

    pub fn transpose(&self) -> Self {
        Matrix3::from_fn(|i, j| self.0[j][i].clone())
    }

    /// Multiplies a column vector.
    pub fn dot(&self, v: &[Expr; 3]) -> [Expr; 3] {
        array::from_fn(|i| (0..3).map(|k| &self.0[i][k] * &v[k]).sum())
    }

    pub fn scale(&self, k: &Expr) -> Self {
        Matrix3::from_fn(|i, j| &self.0[i][j] * k)
    }

    pub fn map(&self, mut f: impl FnMut(&Expr) -> Expr) -> Self {
        Matrix3::from_fn(|i, j| f(&self.0[i][j]))
    }

    pub fn try_map(&self, mut f: impl FnMut(&Expr) -> Result<Expr>) -> Result<Self> {
        let mut out = Matrix3::zeros();
        for (i, row) in self.0.iter().enumerate() {
            for (j, e) in row.iter().enumerate() {
                out.0[i][j] = f(e)?;
            }
        }
        Ok(out)
    }

    /// Element-wise partial derivative.
    pub fn diff(&self, var: &Expr) -> Result<Self> {
        self.try_map(|e| Ok(e.diff(var)?))
    }

    /// Element-wise time derivative.
    pub fn dt(&self) -> Result<Self> {
        self.try_map(|e| Ok(e.try_dt()?))
    }

    pub fn simplify(&self) -> Self {
        self.map(Expr::simplify)
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().flatten().all(Expr::is_zero)
    }

    pub fn determinant(&self) -> Expr {
        let m = &self.0;
        &m[0][0] * (&m[1][1] * &m[2][2] - &m[1][2] * &m[2][1])
            - &m[0][1] * (&m[1][0] * &m[2][2] - &m[1][2] * &m[2][0])
            + &m[0][2] * (&m[1][0] * &m[2][1] - &m[1][1] * &m[2][0])
    }

    /// Inverse through the adjugate. Fails when the determinant is zero.
    pub fn try_inverse(&self) -> Result<Self> {
        let m = &self.0;
        let det = self.determinant();
        let cofactor = |i: usize, j: usize| {
            let (r0, r1) = ((i + 1) % 3, (i + 2) % 3);
            let (c0, c1) = ((j + 1) % 3, (j + 2) % 3);
            &m[r0][c0] * &m[r1][c1] - &m[r0][c1] * &m[r1][c0]
        };
        let adjugate = Matrix3::from_fn(|i, j| cofactor(j, i));
        adjugate.try_map(|e| Ok(e.checked_div(&det)?))
    }

    /// True when `M * M^T` is exactly the identity.
    pub fn is_orthonormal(&self) -> bool {
        (self * &self.transpose()) == Matrix3::identity()
    }

    /// Elementary rotation by `angle` about `axis`, mapping rotated
    /// components to fixed components.
    pub fn rotation(axis: Axis, angle: &Expr) -> Self {
        let (c, s) = (angle.cos(), angle.sin());
        let (o, l) = (Expr::zero(), Expr::one());
        let rows = match axis {
            Axis::X => [
                [l, o.clone(), o.clone()],
                [o.clone(), c.clone(), -&s],
                [o, s, c],
            ],
            Axis::Y => [
                [c.clone(), o.clone(), s.clone()],
                [o.clone(), l, o.clone()],
                [-s, o, c],
            ],
            Axis::Z => [
                [c.clone(), -&s, o.clone()],
                [s, c, o.clone()],
                [o.clone(), o, l],
            ],
        };
        Matrix3(rows)
    }

    /// `a * b^T`.
    pub fn outer(a: &[Expr; 3], b: &[Expr; 3]) -> Self {
        Matrix3::from_fn(|i, j| &a[i] * &b[j])
    }

    /// The cross product matrix `[k]x`, so that `[k]x * v == k x v`.
    pub fn skew(k: &[Expr; 3]) -> Self {
        let o = Expr::zero;
        Matrix3([
            [o(), -&k[2], k[1].clone()],
            [k[2].clone(), o(), -&k[0]],
            [-&k[1], k[0].clone(), o()],
        ])
    }

    /// Inverse of [`Matrix3::skew`], read from the lower off-diagonal entries.
    pub fn vee(&self) -> [Expr; 3] {
        [
            self.0[2][1].clone(),
            self.0[0][2].clone(),
            self.0[1][0].clone(),
        ]
    }
}

impl<'a> Mul<&'a Matrix3> for &Matrix3 {
    type Output = Matrix3;

    fn mul(self, rhs: &'a Matrix3) -> Matrix3 {
        Matrix3::from_fn(|i, j| (0..3).map(|k| &self.0[i][k] * &rhs.0[k][j]).sum())
    }
}

impl Mul<Matrix3> for Matrix3 {
    type Output = Matrix3;

    fn mul(self, rhs: Matrix3) -> Matrix3 {
        &self * &rhs
    }
}

impl<'a> Add<&'a Matrix3> for &Matrix3 {
    type Output = Matrix3;

    fn add(self, rhs: &'a Matrix3) -> Matrix3 {
        Matrix3::from_fn(|i, j| &self.0[i][j] + &rhs.0[i][j])
    }
}

impl<'a> Sub<&'a Matrix3> for &Matrix3 {
    type Output = Matrix3;

    fn sub(self, rhs: &'a Matrix3) -> Matrix3 {
        Matrix3::from_fn(|i, j| &self.0[i][j] - &rhs.0[i][j])
    }
}

impl fmt::Display for Matrix3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, row) in self.0.iter().enumerate() {
            if i != 0 {
                f.write_str(", ")?;
            }
            write!(f, "[{}, {}, {}]", row[0], row[1], row[2])?;
        }
        f.write_str("]")
    }
}
