//! Turning matrices, arrays and operator-like objects into operators.

use super::LinearOperator;
use crate::core::array::{Array, ArrayData};
use crate::core::traits::OperatorLike;
use crate::error::{LinOpError, Result};
use crate::matrix::{CsrMatrix, Matrix};
use faer::Mat;
use num_complex::Complex64;
use std::any::{Any, type_name};
use std::sync::Arc;

/// Returns `value` as a [`LinearOperator`].
///
/// `value` may be any of:
/// - a `LinearOperator` (returned unchanged)
/// - a dense `faer::Mat<f64>` / `faer::Mat<Complex64>`
/// - a sparse `CsrMatrix<f64>` / `CsrMatrix<Complex64>`, or a [`Matrix`]
/// - an [`Array`] or a `Vec<f64>` / `Vec<Complex64>`; 1-D data becomes a
///   single-row matrix
/// - an `Arc<dyn OperatorLike>` or `Box<dyn OperatorLike>`
///
/// Anything else fails with [`LinOpError::UnsupportedType`].
pub fn as_operator<T: Any>(value: T) -> Result<LinearOperator> {
    let name = type_name::<T>();
    let value: Box<dyn Any> = Box::new(value);

    macro_rules! try_downcast {
        ($value:ident, $t:ty, $convert:expr) => {
            let $value = match $value.downcast::<$t>() {
                Ok(inner) => return $convert(*inner),
                Err(other) => other,
            };
        };
    }

    try_downcast!(value, LinearOperator, |op: LinearOperator| Ok(op));
    try_downcast!(value, Mat<f64>, LinearOperator::from_matrix);
    try_downcast!(value, Mat<Complex64>, LinearOperator::from_matrix);
    try_downcast!(value, CsrMatrix<f64>, LinearOperator::from_matrix);
    try_downcast!(value, CsrMatrix<Complex64>, LinearOperator::from_matrix);
    try_downcast!(value, Matrix, LinearOperator::from_matrix);
    try_downcast!(value, Arc<Matrix>, LinearOperator::from_shared_matrix);
    try_downcast!(value, Array, from_array);
    try_downcast!(value, Vec<f64>, |v: Vec<f64>| from_array(Array::from_vec(v)));
    try_downcast!(value, Vec<Complex64>, |v: Vec<Complex64>| from_array(Array::from_complex_vec(v)));
    try_downcast!(value, Arc<dyn OperatorLike>, LinearOperator::from_shared_operator_like);
    try_downcast!(value, Box<dyn OperatorLike>, |b: Box<dyn OperatorLike>| {
        LinearOperator::from_shared_operator_like(Arc::from(b))
    });

    drop(value);
    Err(LinOpError::UnsupportedType(name.to_string()))
}

/// 2-D arrays are wrapped as they are; 1-D arrays become a `1 × n` row.
fn from_array(x: Array) -> Result<LinearOperator> {
    let row = x.ndim() == 1;
    match x.data() {
        ArrayData::Real(m) if row => LinearOperator::from_matrix(Mat::from_fn(1, m.nrows(), |_, j| m[(j, 0)])),
        ArrayData::Complex(m) if row => LinearOperator::from_matrix(Mat::from_fn(1, m.nrows(), |_, j| m[(j, 0)])),
        ArrayData::Real(m) => LinearOperator::from_matrix(m.clone()),
        ArrayData::Complex(m) => LinearOperator::from_matrix(m.clone()),
    }
}

impl LinearOperator {
    /// Wraps an [`OperatorLike`] value, using its `rmatvec` and element type
    /// when it provides them.
    pub fn from_operator_like<O: OperatorLike + 'static>(obj: O) -> Result<LinearOperator> {
        Self::from_shared_operator_like(Arc::new(obj))
    }

    pub fn from_shared_operator_like(obj: Arc<dyn OperatorLike>) -> Result<LinearOperator> {
        let forward = Arc::clone(&obj);
        let mut builder = LinearOperator::custom(obj.shape()).matvec(move |x| forward.matvec(x));
        if obj.has_rmatvec() {
            let adjoint = Arc::clone(&obj);
            builder = builder.try_rmatvec(move |x| {
                adjoint.rmatvec(x).ok_or(LinOpError::NotImplemented("rmatvec is not defined"))
            });
        }
        if let Some(dtype) = obj.element_type() {
            builder = builder.dtype(dtype);
        }
        builder.build()
    }
}
