//! Operator overloads for [`Expr`].
use std::{
    iter::Sum,
    ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub, SubAssign},
};

use crate::{Expr, expr::Frac};

fn add(a: &Frac, b: &Frac) -> Frac {
    a.add(b)
}

fn sub(a: &Frac, b: &Frac) -> Frac {
    a.sub(b)
}

fn mul(a: &Frac, b: &Frac) -> Frac {
    a.mul(b)
}

fn div(a: &Frac, b: &Frac) -> Frac {
    match a.div(b) {
        Ok(q) => q,
        Err(_) => panic!("attempt to divide {a} by zero"),
    }
}

macro_rules! impl_op {
    ($op: tt, $op_fn:ident, $inner: ident) => {
        impl $op<Expr> for Expr {
            type Output = Expr;

            fn $op_fn(self, rhs: Expr) -> Self::Output {
                Expr::from_frac($inner(self.frac(), rhs.frac()))
            }
        }

        impl<'a> $op<&'a Expr> for Expr {
            type Output = Expr;

            fn $op_fn(self, rhs: &'a Expr) -> Self::Output {
                Expr::from_frac($inner(self.frac(), rhs.frac()))
            }
        }

        impl<'a> $op<Expr> for &'a Expr {
            type Output = Expr;

            fn $op_fn(self, rhs: Expr) -> Self::Output {
                Expr::from_frac($inner(self.frac(), rhs.frac()))
            }
        }

        impl<'a, 'b> $op<&'a Expr> for &'b Expr {
            type Output = Expr;

            fn $op_fn(self, rhs: &'a Expr) -> Self::Output {
                Expr::from_frac($inner(self.frac(), rhs.frac()))
            }
        }

        impl $op<i64> for Expr {
            type Output = Expr;

            fn $op_fn(self, rhs: i64) -> Self::Output {
                Expr::from_frac($inner(self.frac(), Expr::int(rhs).frac()))
            }
        }

        impl<'a> $op<i64> for &'a Expr {
            type Output = Expr;

            fn $op_fn(self, rhs: i64) -> Self::Output {
                Expr::from_frac($inner(self.frac(), Expr::int(rhs).frac()))
            }
        }

        impl $op<Expr> for i64 {
            type Output = Expr;

            fn $op_fn(self, rhs: Expr) -> Self::Output {
                Expr::from_frac($inner(Expr::int(self).frac(), rhs.frac()))
            }
        }

        impl<'a> $op<&'a Expr> for i64 {
            type Output = Expr;

            fn $op_fn(self, rhs: &'a Expr) -> Self::Output {
                Expr::from_frac($inner(Expr::int(self).frac(), rhs.frac()))
            }
        }
    };
}

impl_op!(Add, add, add);
impl_op!(Sub, sub, sub);
impl_op!(Mul, mul, mul);
// Division by an exact zero panics, like integer division. Use
// `Expr::checked_div` to get an error instead.
impl_op!(Div, div, div);

macro_rules! impl_assign_op {
    ($op: tt, $op_fn:ident, $inner: ident) => {
        impl $op<Expr> for Expr {
            fn $op_fn(&mut self, rhs: Expr) {
                *self = Expr::from_frac($inner(self.frac(), rhs.frac()));
            }
        }

        impl<'a> $op<&'a Expr> for Expr {
            fn $op_fn(&mut self, rhs: &'a Expr) {
                *self = Expr::from_frac($inner(self.frac(), rhs.frac()));
            }
        }
    };
}

impl_assign_op!(AddAssign, add_assign, add);
impl_assign_op!(SubAssign, sub_assign, sub);
impl_assign_op!(MulAssign, mul_assign, mul);

impl Neg for Expr {
    type Output = Expr;

    fn neg(self) -> Self::Output {
        Expr::from_frac(self.frac().neg())
    }
}

impl Neg for &Expr {
    type Output = Expr;

    fn neg(self) -> Self::Output {
        Expr::from_frac(self.frac().neg())
    }
}

impl Sum for Expr {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Expr::zero(), |acc, x| acc + x)
    }
}

impl<'a> Sum<&'a Expr> for Expr {
    fn sum<I: Iterator<Item = &'a Expr>>(iter: I) -> Self {
        iter.fold(Expr::zero(), |acc, x| acc + x)
    }
}
