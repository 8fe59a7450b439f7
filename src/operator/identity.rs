use super::{Kind, LinearOperator};
use crate::core::scalar::ElementType;
use crate::error::{LinOpError, Result};

impl LinearOperator {
    /// Identity of the given square shape. Without `dtype` the element type
    /// is inferred on first use and comes out as `float64`.
    pub fn identity(shape: (usize, usize), dtype: Option<ElementType>) -> Result<LinearOperator> {
        if shape.0 != shape.1 {
            return Err(LinOpError::ShapeMismatch(format!("identity must be square, got {shape:?}")));
        }
        LinearOperator::from_parts(shape, dtype, Kind::Identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::array::Array;
    use crate::operator::OperatorKind;

    #[test]
    fn identity_is_its_own_adjoint_and_transpose() {
        let id = LinearOperator::identity((3, 3), None).unwrap();
        assert!(id.adjoint().unwrap().ptr_eq(&id));
        assert!(id.transpose().unwrap().ptr_eq(&id));
        assert_eq!(id.kind(), OperatorKind::Identity);
    }

    #[test]
    fn identity_actions_return_input() {
        let id = LinearOperator::identity((2, 2), Some(ElementType::Complex128)).unwrap();
        let x = Array::from_vec(vec![1.5, -2.0]);
        assert_eq!(id.matvec(&x).unwrap().to_real_vec().unwrap(), vec![1.5, -2.0]);
        assert_eq!(id.rmatvec(&x).unwrap().to_real_vec().unwrap(), vec![1.5, -2.0]);
        let block = Array::from_column_major(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(id.matmat(&block).unwrap().to_real_vec().unwrap(), vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(id.dtype().unwrap(), ElementType::Complex128);
    }

    #[test]
    fn default_dtype_is_float64() {
        let id = LinearOperator::identity((4, 4), None).unwrap();
        assert_eq!(id.known_dtype(), None);
        assert_eq!(id.dtype().unwrap(), ElementType::Float64);
    }

    #[test]
    fn rectangular_identity_is_rejected() {
        assert!(matches!(LinearOperator::identity((2, 3), None), Err(LinOpError::ShapeMismatch(_))));
    }
}
