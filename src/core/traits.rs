//! Core traits for linop.

use crate::core::array::Array;
use crate::core::scalar::ElementType;

/// Anything with a shape and a matrix–vector action can be turned into a
/// [`LinearOperator`](crate::operator::LinearOperator).
///
/// `rmatvec` and `element_type` are optional capabilities: implementors
/// advertise an adjoint action through `has_rmatvec`.
pub trait OperatorLike: Send + Sync {
    /// `(rows, cols)` of the operator.
    fn shape(&self) -> (usize, usize);
    /// Compute y = A · x.
    fn matvec(&self, x: &Array) -> Array;
    /// Whether [`OperatorLike::rmatvec`] is implemented.
    fn has_rmatvec(&self) -> bool {
        false
    }
    /// Compute y = Aᴴ · x, `None` when there is no adjoint action.
    fn rmatvec(&self, _x: &Array) -> Option<Array> {
        None
    }
    /// Element type, if known up front.
    fn element_type(&self) -> Option<ElementType> {
        None
    }
}
