//! Sum, product, scaled and power operators.
//!
//! Each combinator checks shapes, fixes the element type from its operands
//! and returns a new node; operands are never modified.

use super::{Kind, LinearOperator};
use crate::core::scalar::Scalar;
use crate::error::{LinOpError, Result};
use log::trace;

impl LinearOperator {
    /// `A + B`. Both operands must have the same shape.
    pub fn try_add(&self, other: &LinearOperator) -> Result<LinearOperator> {
        if self.shape() != other.shape() {
            return Err(LinOpError::ShapeMismatch(format!("cannot add {self} and {other}")));
        }
        let dtype = self.dtype()?.promote(other.dtype()?);
        trace!("sum of {self} and {other}");
        LinearOperator::from_parts(self.shape(), Some(dtype), Kind::Sum(self.clone(), other.clone()))
    }

    /// `A - B`, built as `A + (-1)·B`.
    pub fn try_sub(&self, other: &LinearOperator) -> Result<LinearOperator> {
        if self.shape() != other.shape() {
            return Err(LinOpError::ShapeMismatch(format!("cannot subtract {other} from {self}")));
        }
        self.try_add(&other.negate()?)
    }

    /// `A · B`. Requires `A.ncols() == B.nrows()`.
    pub fn compose(&self, other: &LinearOperator) -> Result<LinearOperator> {
        if self.ncols() != other.nrows() {
            return Err(LinOpError::ShapeMismatch(format!("cannot multiply {self} and {other}")));
        }
        let dtype = self.dtype()?.promote(other.dtype()?);
        trace!("product of {self} and {other}");
        LinearOperator::from_parts(
            (self.nrows(), other.ncols()),
            Some(dtype),
            Kind::Product(self.clone(), other.clone()),
        )
    }

    /// `α · A`.
    pub fn scale(&self, alpha: impl Into<Scalar>) -> Result<LinearOperator> {
        let alpha = alpha.into();
        let dtype = self.dtype()?.promote(alpha.element_type());
        trace!("{self} scaled by {alpha}");
        LinearOperator::from_parts(self.shape(), Some(dtype), Kind::Scaled(self.clone(), alpha))
    }

    /// `-A`.
    pub fn negate(&self) -> Result<LinearOperator> {
        self.scale(-1.0)
    }

    /// `Aᵖ` for a square `A`; `A⁰` acts as the identity.
    pub fn pow(&self, p: u32) -> Result<LinearOperator> {
        if self.nrows() != self.ncols() {
            return Err(LinOpError::ShapeMismatch(format!("square operator expected, got {self}")));
        }
        let dtype = self.dtype()?;
        trace!("{self} raised to {p}");
        LinearOperator::from_parts(self.shape(), Some(dtype), Kind::Power(self.clone(), p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::array::Array;
    use crate::core::scalar::ElementType;
    use crate::operator::{Capabilities, OperatorKind};
    use faer::Mat;
    use num_complex::Complex64;

    fn dense(n: usize, m: usize, f: impl Fn(usize, usize) -> f64) -> LinearOperator {
        LinearOperator::from_matrix(Mat::from_fn(n, m, |i, j| f(i, j))).unwrap()
    }

    #[test]
    fn shapes_are_checked() {
        let a = dense(3, 3, |i, j| (i + j) as f64);
        let b = dense(4, 4, |_, _| 1.0);
        let c = dense(3, 2, |_, _| 1.0);
        assert!(matches!(a.try_add(&b), Err(LinOpError::ShapeMismatch(_))));
        assert!(matches!(a.try_sub(&b), Err(LinOpError::ShapeMismatch(_))));
        assert!(matches!(c.compose(&a), Err(LinOpError::ShapeMismatch(_))));
        assert!(matches!(c.pow(2), Err(LinOpError::ShapeMismatch(_))));
        assert_eq!(a.compose(&c).unwrap().shape(), (3, 2));
    }

    #[test]
    fn element_type_follows_operands() {
        let a = dense(2, 2, |i, j| (i * 2 + j) as f64);
        let s = a.scale(Complex64::new(0.0, 1.0)).unwrap();
        assert_eq!(s.known_dtype(), Some(ElementType::Complex128));
        assert_eq!(a.try_add(&s).unwrap().known_dtype(), Some(ElementType::Complex128));
        // a previous complex combination does not leak into later ones
        assert_eq!(a.try_add(&a).unwrap().known_dtype(), Some(ElementType::Float64));
        assert_eq!(a.pow(3).unwrap().known_dtype(), Some(ElementType::Float64));
    }

    #[test]
    fn difference_and_negation() {
        let a = dense(2, 2, |i, j| if i == j { 2.0 } else { 1.0 });
        let d = a.try_sub(&a).unwrap();
        let y = d.matvec(&Array::from_vec(vec![1.0, 5.0])).unwrap();
        assert_eq!(y.to_real_vec().unwrap(), vec![0.0, 0.0]);
        let n = a.negate().unwrap();
        assert_eq!(n.kind(), OperatorKind::Scaled);
        assert_eq!(n.factor(), Some(Scalar::Real(-1.0)));
    }

    #[test]
    fn scale_by_zero_gives_zeros() {
        let a = dense(3, 2, |i, j| (i + 3 * j) as f64 + 1.0);
        let z = a.scale(0.0).unwrap();
        let y = z.matvec(&Array::from_vec(vec![4.0, -1.0])).unwrap();
        assert_eq!(y.dims(), vec![3]);
        assert_eq!(y.to_real_vec().unwrap(), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn power_applies_repeatedly() {
        let a = dense(2, 2, |i, j| if i == j { 2.0 } else { 0.0 });
        let x = Array::from_vec(vec![1.0, 3.0]);
        assert_eq!(a.pow(0).unwrap().matvec(&x).unwrap().to_real_vec().unwrap(), vec![1.0, 3.0]);
        assert_eq!(a.pow(3).unwrap().matvec(&x).unwrap().to_real_vec().unwrap(), vec![8.0, 24.0]);
        assert_eq!(a.pow(3).unwrap().exponent(), Some(3));
    }

    #[test]
    fn zeroth_power_is_adjointable_without_operand_adjoint() {
        let a = LinearOperator::custom((2, 2)).matvec(|x| x.scale(2.0.into())).build().unwrap();
        assert!(a.adjoint().is_err());
        let a0 = a.pow(0).unwrap();
        let x = Array::from_vec(vec![1.0, 2.0]);
        assert_eq!(a0.rmatvec(&x).unwrap().to_real_vec().unwrap(), vec![1.0, 2.0]);
        assert!(a0.capabilities().contains(Capabilities::RMATVEC));
        let h = a0.adjoint().unwrap();
        assert_eq!(h.kind(), OperatorKind::Identity);
        assert_eq!(h.shape(), (2, 2));
        assert_eq!(h.known_dtype(), Some(ElementType::Float64));
        assert!(a.pow(1).unwrap().adjoint().is_err());
    }
}
