// Operator overloads for building expressions: `&a + &b`, `&a * &b`,
// `2.0 * &a`, `-&a`, `&a * &x`. Every combinator validates its operands, so
// the output is a `Result`.

use super::LinearOperator;
use crate::core::array::Array;
use crate::core::scalar::Scalar;
use crate::error::Result;
use num_complex::Complex64;
use std::ops::{Add, Mul, Neg, Sub};

macro_rules! binary_operator {
    ($trait:ident, $method:ident, $call:ident) => {
        impl $trait<&LinearOperator> for &LinearOperator {
            type Output = Result<LinearOperator>;
            fn $method(self, rhs: &LinearOperator) -> Self::Output {
                self.$call(rhs)
            }
        }

        impl $trait<LinearOperator> for LinearOperator {
            type Output = Result<LinearOperator>;
            fn $method(self, rhs: LinearOperator) -> Self::Output {
                (&self).$call(&rhs)
            }
        }
    };
}

binary_operator!(Add, add, try_add);
binary_operator!(Sub, sub, try_sub);
binary_operator!(Mul, mul, compose);

macro_rules! scalar_operator {
    ($($t:ty),*) => {$(
        impl Mul<$t> for &LinearOperator {
            type Output = Result<LinearOperator>;
            fn mul(self, alpha: $t) -> Self::Output {
                self.scale(alpha)
            }
        }

        impl Mul<$t> for LinearOperator {
            type Output = Result<LinearOperator>;
            fn mul(self, alpha: $t) -> Self::Output {
                self.scale(alpha)
            }
        }

        impl Mul<&LinearOperator> for $t {
            type Output = Result<LinearOperator>;
            fn mul(self, op: &LinearOperator) -> Self::Output {
                op.scale(self)
            }
        }

        impl Mul<LinearOperator> for $t {
            type Output = Result<LinearOperator>;
            fn mul(self, op: LinearOperator) -> Self::Output {
                op.scale(self)
            }
        }
    )*};
}

scalar_operator!(f64, Complex64, Scalar);

impl Mul<&Array> for &LinearOperator {
    type Output = Result<Array>;
    fn mul(self, x: &Array) -> Self::Output {
        self.apply(x)
    }
}

impl Neg for &LinearOperator {
    type Output = Result<LinearOperator>;
    fn neg(self) -> Self::Output {
        self.negate()
    }
}

impl Neg for LinearOperator {
    type Output = Result<LinearOperator>;
    fn neg(self) -> Self::Output {
        self.negate()
    }
}

#[cfg(test)]
mod tests {
    use crate::core::array::Array;
    use crate::error::LinOpError;
    use crate::operator::{LinearOperator, OperatorKind};
    use faer::Mat;
    use num_complex::Complex64;

    fn op(f: impl Fn(usize, usize) -> f64) -> LinearOperator {
        LinearOperator::from_matrix(Mat::from_fn(2, 2, |i, j| f(i, j))).unwrap()
    }

    #[test]
    fn expression_builds_expected_tree() {
        let a = op(|i, j| (i + j) as f64);
        let b = op(|i, j| if i == j { 1.0 } else { 0.0 });
        let e = (&(&a + &b).unwrap() * &(2.0 * &a).unwrap()).unwrap();
        assert_eq!(e.kind(), OperatorKind::Product);
        let parts = e.operands();
        assert_eq!(parts[0].kind(), OperatorKind::Sum);
        assert_eq!(parts[1].kind(), OperatorKind::Scaled);
        assert_eq!((-&a).unwrap().kind(), OperatorKind::Scaled);
        assert_eq!((a.clone() - b.clone()).unwrap().kind(), OperatorKind::Sum);
    }

    #[test]
    fn apply_through_mul() {
        let a = op(|i, j| (2 * i + j) as f64);
        let x = Array::from_vec(vec![1.0, 1.0]);
        let y = (&a * &x).unwrap();
        assert_eq!(y.to_real_vec().unwrap(), vec![1.0, 5.0]);
        let z = (&(Complex64::new(0.0, 1.0) * &a).unwrap() * &x).unwrap();
        assert_eq!(z.to_complex_vec(), vec![Complex64::new(0.0, 1.0), Complex64::new(0.0, 5.0)]);
        let bad = Array::from_vec(vec![1.0]);
        assert!(matches!(&a * &bad, Err(LinOpError::InvalidOperand(_))));
    }
}
