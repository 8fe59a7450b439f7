//! Matrix module: dense and sparse payloads for matrix-backed operators.

pub mod dense;
pub mod sparse;
pub use sparse::CsrMatrix;

use crate::core::array::{Array, ArrayData};
use crate::core::scalar::ElementType;
use dense::{complex_apply, dense_apply, real_apply};
use faer::Mat;
use num_complex::Complex64;
use std::fmt;

/// A concrete matrix wrapped by a matrix-backed operator.
pub enum Matrix {
    Dense(Mat<f64>),
    DenseComplex(Mat<Complex64>),
    Sparse(CsrMatrix<f64>),
    SparseComplex(CsrMatrix<Complex64>),
}

impl Matrix {
    pub fn shape(&self) -> (usize, usize) {
        match self {
            Matrix::Dense(a) => (a.nrows(), a.ncols()),
            Matrix::DenseComplex(a) => (a.nrows(), a.ncols()),
            Matrix::Sparse(a) => (a.nrows(), a.ncols()),
            Matrix::SparseComplex(a) => (a.nrows(), a.ncols()),
        }
    }

    pub fn element_type(&self) -> ElementType {
        match self {
            Matrix::Dense(_) | Matrix::Sparse(_) => ElementType::Float64,
            Matrix::DenseComplex(_) | Matrix::SparseComplex(_) => ElementType::Complex128,
        }
    }

    pub fn is_sparse(&self) -> bool {
        matches!(self, Matrix::Sparse(_) | Matrix::SparseComplex(_))
    }

    /// `A · X`, or `Aᴴ · X` when `adjoint` is set. The caller checks that
    /// `x` has as many rows as the (possibly adjoint) matrix has columns.
    pub(crate) fn apply(&self, x: &Array, adjoint: bool) -> Array {
        match (self, x.data()) {
            (Matrix::Dense(a), ArrayData::Real(x)) => Array::from_mat(real_apply(a, x, adjoint)),
            (Matrix::Dense(a), ArrayData::Complex(x)) => {
                Array::from_complex_mat(dense_apply::<f64, Complex64, Complex64>(a, x, adjoint))
            }
            (Matrix::DenseComplex(a), ArrayData::Real(x)) => {
                Array::from_complex_mat(dense_apply::<Complex64, f64, Complex64>(a, x, adjoint))
            }
            (Matrix::DenseComplex(a), ArrayData::Complex(x)) => Array::from_complex_mat(complex_apply(a, x, adjoint)),
            (Matrix::Sparse(a), ArrayData::Real(x)) => Array::from_mat(a.spmm::<f64, f64>(x, adjoint)),
            (Matrix::Sparse(a), ArrayData::Complex(x)) => {
                Array::from_complex_mat(a.spmm::<Complex64, Complex64>(x, adjoint))
            }
            (Matrix::SparseComplex(a), ArrayData::Real(x)) => {
                Array::from_complex_mat(a.spmm::<f64, Complex64>(x, adjoint))
            }
            (Matrix::SparseComplex(a), ArrayData::Complex(x)) => {
                Array::from_complex_mat(a.spmm::<Complex64, Complex64>(x, adjoint))
            }
        }
    }
}

impl fmt::Debug for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (m, n) = self.shape();
        let storage = if self.is_sparse() { "sparse" } else { "dense" };
        write!(f, "Matrix({m}x{n}, {storage}, {})", self.element_type())
    }
}

impl From<Mat<f64>> for Matrix {
    fn from(a: Mat<f64>) -> Self {
        Matrix::Dense(a)
    }
}

impl From<Mat<Complex64>> for Matrix {
    fn from(a: Mat<Complex64>) -> Self {
        Matrix::DenseComplex(a)
    }
}

impl From<CsrMatrix<f64>> for Matrix {
    fn from(a: CsrMatrix<f64>) -> Self {
        Matrix::Sparse(a)
    }
}

impl From<CsrMatrix<Complex64>> for Matrix {
    fn from(a: CsrMatrix<Complex64>) -> Self {
        Matrix::SparseComplex(a)
    }
}
