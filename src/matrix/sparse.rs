// Sparse CSR storage and products

use crate::core::array::Element;
use crate::error::{LinOpError, Result};
use faer::Mat;
use faer::sparse::{SparseRowMat, SymbolicSparseRowMat};

/// Compressed sparse row matrix backed by Faer.
pub struct CsrMatrix<T> {
    inner: SparseRowMat<usize, T>,
}

impl<T: Element> CsrMatrix<T> {
    /// Build a CSR from raw row-ptr, col-idx, and values.
    ///
    /// Column indices must be strictly increasing within each row.
    pub fn from_csr(
        nrows: usize,
        ncols: usize,
        row_ptr: Vec<usize>,
        col_idx: Vec<usize>,
        values: Vec<T>,
    ) -> Result<Self> {
        if row_ptr.len() != nrows + 1 || row_ptr[0] != 0 {
            return Err(LinOpError::InvalidShape(format!(
                "row_ptr of length {} for {} rows",
                row_ptr.len(),
                nrows
            )));
        }
        let nnz = row_ptr[nrows];
        if col_idx.len() != nnz || values.len() != nnz {
            return Err(LinOpError::DimensionMismatch(format!(
                "row_ptr announces {} entries, got {} column indices and {} values",
                nnz,
                col_idx.len(),
                values.len()
            )));
        }
        for i in 0..nrows {
            let (start, end) = (row_ptr[i], row_ptr[i + 1]);
            if start > end || end > nnz {
                return Err(LinOpError::InvalidShape(format!("row_ptr is not non-decreasing at row {i}")));
            }
            let row = &col_idx[start..end];
            if row.iter().any(|&j| j >= ncols) || row.windows(2).any(|w| w[0] >= w[1]) {
                return Err(LinOpError::InvalidShape(format!(
                    "row {i} has unsorted or out-of-range column indices"
                )));
            }
        }
        // Build symbolic structure; `None` means "no separate row_nnz".
        let symbolic = SymbolicSparseRowMat::new_checked(nrows, ncols, row_ptr, None, col_idx);
        let inner = SparseRowMat::new(symbolic, values);
        Ok(Self { inner })
    }

    pub fn nrows(&self) -> usize {
        self.inner.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.inner.ncols()
    }

    /// Number of stored entries.
    pub fn nnz(&self) -> usize {
        self.inner.val().len()
    }

    /// Computes `A · X`, or `Aᴴ · X` when `adjoint` is set, promoting entries to `Y`.
    pub(crate) fn spmm<X, Y>(&self, x: &Mat<X>, adjoint: bool) -> Mat<Y>
    where
        X: Element,
        Y: Element + From<T> + From<X>,
    {
        let symbolic = self.inner.symbolic();
        let row_ptr = symbolic.row_ptr();
        let col_idx = symbolic.col_idx();
        let val = self.inner.val();
        let rows = if adjoint { self.ncols() } else { self.nrows() };
        let mut y = Mat::from_fn(rows, x.ncols(), |_, _| Y::zero());
        for k in 0..x.ncols() {
            for i in 0..self.nrows() {
                for p in row_ptr[i]..row_ptr[i + 1] {
                    let j = col_idx[p];
                    if adjoint {
                        let v = <Y as From<T>>::from(val[p].conj());
                        y[(j, k)] = y[(j, k)] + v * <Y as From<X>>::from(x[(i, k)]);
                    } else {
                        let v = <Y as From<T>>::from(val[p]);
                        y[(i, k)] = y[(i, k)] + v * <Y as From<X>>::from(x[(j, k)]);
                    }
                }
            }
        }
        y
    }
}
