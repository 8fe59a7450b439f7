//! Vectors and column blocks that operators act on.
//!
//! An [`Array`] is either 1-D (a vector of length `n`) or 2-D (an `n × k`
//! block of columns). Storage is a column-major `faer::Mat`, real or complex.
//! The dimensionality is kept separately so that `matvec` can hand back a
//! result shaped like its input.

use crate::core::scalar::{ElementType, Scalar};
use crate::error::{LinOpError, Result};
use faer::Mat;
use num_complex::Complex64;
use num_traits::Zero;
use std::ops::{Add, Mul};

/// Entry types an [`Array`] or matrix payload can hold.
pub trait Element: Copy + Zero + Add<Output = Self> + Mul<Output = Self> + Send + Sync + 'static {
    const TYPE: ElementType;
    fn conj(self) -> Self;
}

impl Element for f64 {
    const TYPE: ElementType = ElementType::Float64;
    fn conj(self) -> Self {
        self
    }
}

impl Element for Complex64 {
    const TYPE: ElementType = ElementType::Complex128;
    fn conj(self) -> Self {
        Complex64::conj(&self)
    }
}

/// Typed storage behind an [`Array`].
#[derive(Debug, Clone)]
pub enum ArrayData {
    Real(Mat<f64>),
    Complex(Mat<Complex64>),
}

#[derive(Debug, Clone)]
pub struct Array {
    data: ArrayData,
    ndim: usize,
}

pub(crate) fn map2<A: Copy, B: Copy, Y>(a: &Mat<A>, b: &Mat<B>, f: impl Fn(A, B) -> Y) -> Mat<Y> {
    Mat::from_fn(a.nrows(), a.ncols(), |i, j| f(a[(i, j)], b[(i, j)]))
}

pub(crate) fn map1<A: Copy, Y>(a: &Mat<A>, f: impl Fn(A) -> Y) -> Mat<Y> {
    Mat::from_fn(a.nrows(), a.ncols(), |i, j| f(a[(i, j)]))
}

fn zeros_of<T: Element>(nrows: usize, ncols: usize) -> Mat<T> {
    Mat::from_fn(nrows, ncols, |_, _| T::zero())
}

impl Array {
    /// 1-D real vector.
    pub fn from_vec(v: Vec<f64>) -> Self {
        let n = v.len();
        Self { data: ArrayData::Real(Mat::from_fn(n, 1, |i, _| v[i])), ndim: 1 }
    }

    /// 1-D complex vector.
    pub fn from_complex_vec(v: Vec<Complex64>) -> Self {
        let n = v.len();
        Self { data: ArrayData::Complex(Mat::from_fn(n, 1, |i, _| v[i])), ndim: 1 }
    }

    /// 2-D real block.
    pub fn from_mat(m: Mat<f64>) -> Self {
        Self { data: ArrayData::Real(m), ndim: 2 }
    }

    /// 2-D complex block.
    pub fn from_complex_mat(m: Mat<Complex64>) -> Self {
        Self { data: ArrayData::Complex(m), ndim: 2 }
    }

    /// 2-D real block from raw column-major storage.
    pub fn from_column_major(nrows: usize, ncols: usize, data: Vec<f64>) -> Result<Self> {
        if data.len() != nrows * ncols {
            return Err(LinOpError::DimensionMismatch(format!(
                "{} values cannot fill a {}x{} block",
                data.len(),
                nrows,
                ncols
            )));
        }
        Ok(Self::from_mat(Mat::from_fn(nrows, ncols, |i, j| data[j * nrows + i])))
    }

    /// 1-D zero vector of the given element type.
    pub fn zeros(n: usize, ty: ElementType) -> Self {
        let mut z = Self::zeros_2d(n, 1, ty);
        z.ndim = 1;
        z
    }

    /// 2-D zero block of the given element type.
    pub fn zeros_2d(nrows: usize, ncols: usize, ty: ElementType) -> Self {
        let data = match ty {
            ElementType::Float64 => ArrayData::Real(zeros_of(nrows, ncols)),
            ElementType::Complex128 => ArrayData::Complex(zeros_of(nrows, ncols)),
        };
        Self { data, ndim: 2 }
    }

    pub fn ndim(&self) -> usize {
        self.ndim
    }

    pub fn nrows(&self) -> usize {
        match &self.data {
            ArrayData::Real(m) => m.nrows(),
            ArrayData::Complex(m) => m.nrows(),
        }
    }

    pub fn ncols(&self) -> usize {
        match &self.data {
            ArrayData::Real(m) => m.ncols(),
            ArrayData::Complex(m) => m.ncols(),
        }
    }

    /// Total number of entries.
    pub fn len(&self) -> usize {
        self.nrows() * self.ncols()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `(n,)` for vectors, `(n, k)` for blocks.
    pub fn dims(&self) -> Vec<usize> {
        if self.ndim == 1 { vec![self.nrows()] } else { vec![self.nrows(), self.ncols()] }
    }

    pub fn element_type(&self) -> ElementType {
        match &self.data {
            ArrayData::Real(_) => ElementType::Float64,
            ArrayData::Complex(_) => ElementType::Complex128,
        }
    }

    pub fn data(&self) -> &ArrayData {
        &self.data
    }

    pub fn as_real(&self) -> Option<&Mat<f64>> {
        match &self.data {
            ArrayData::Real(m) => Some(m),
            ArrayData::Complex(_) => None,
        }
    }

    pub fn as_complex(&self) -> Option<&Mat<Complex64>> {
        match &self.data {
            ArrayData::Complex(m) => Some(m),
            ArrayData::Real(_) => None,
        }
    }

    /// Entry `(i, j)` widened to complex.
    pub(crate) fn get(&self, i: usize, j: usize) -> Complex64 {
        match &self.data {
            ArrayData::Real(m) => Complex64::new(m[(i, j)], 0.0),
            ArrayData::Complex(m) => m[(i, j)],
        }
    }

    /// Real entries in column-major order, `None` for complex arrays.
    pub fn to_real_vec(&self) -> Option<Vec<f64>> {
        self.as_real()
            .map(|m| (0..m.ncols()).flat_map(|j| (0..m.nrows()).map(move |i| m[(i, j)])).collect())
    }

    /// Entries widened to complex, column-major order.
    pub fn to_complex_vec(&self) -> Vec<Complex64> {
        let (r, c) = (self.nrows(), self.ncols());
        (0..c).flat_map(|j| (0..r).map(move |i| (i, j))).map(|(i, j)| self.get(i, j)).collect()
    }

    /// Flattens to a 1-D vector of length `n`.
    pub fn into_vector(self, n: usize) -> Result<Self> {
        let mut out = self.flatten(n)?;
        out.ndim = 1;
        Ok(out)
    }

    /// Flattens to an `n × 1` column.
    pub fn into_column(self, n: usize) -> Result<Self> {
        let mut out = self.flatten(n)?;
        out.ndim = 2;
        Ok(out)
    }

    fn flatten(self, n: usize) -> Result<Self> {
        if self.len() != n {
            return Err(LinOpError::DimensionMismatch(format!(
                "cannot reshape array of shape {:?} into ({n},)",
                self.dims()
            )));
        }
        if self.ncols() == 1 {
            return Ok(self);
        }
        let rows = self.nrows();
        let data = match &self.data {
            ArrayData::Real(m) => ArrayData::Real(Mat::from_fn(n, 1, |k, _| m[(k % rows, k / rows)])),
            ArrayData::Complex(m) => ArrayData::Complex(Mat::from_fn(n, 1, |k, _| m[(k % rows, k / rows)])),
        };
        Ok(Self { data, ndim: self.ndim })
    }

    /// Column `j` as an `n × 1` block.
    pub(crate) fn column(&self, j: usize) -> Self {
        let data = match &self.data {
            ArrayData::Real(m) => ArrayData::Real(Mat::from_fn(m.nrows(), 1, |i, _| m[(i, j)])),
            ArrayData::Complex(m) => ArrayData::Complex(Mat::from_fn(m.nrows(), 1, |i, _| m[(i, j)])),
        };
        Self { data, ndim: 2 }
    }

    /// Stacks `columns` side by side into an `nrows × columns.len()` block.
    ///
    /// The result is complex if any column is; an empty list yields an
    /// `nrows × 0` block of type `empty_type`.
    pub fn hstack(columns: &[Array], nrows: usize, empty_type: ElementType) -> Result<Self> {
        if let Some(bad) = columns.iter().find(|c| c.nrows() != nrows) {
            return Err(LinOpError::DimensionMismatch(format!(
                "cannot stack column of shape {:?} into a block with {nrows} rows",
                bad.dims()
            )));
        }
        let offsets: Vec<usize> = columns
            .iter()
            .scan(0, |acc, c| {
                let start = *acc;
                *acc += c.ncols();
                Some(start)
            })
            .collect();
        let total: usize = columns.iter().map(Array::ncols).sum();
        // (block, column within block) for every output column
        let locate = |j: usize| {
            let b = offsets.partition_point(|&o| o <= j) - 1;
            (b, j - offsets[b])
        };
        let ty = ElementType::common(columns.iter().map(Array::element_type)).unwrap_or(empty_type);
        let data = match ty {
            ElementType::Float64 => ArrayData::Real(Mat::from_fn(nrows, total, |i, j| {
                let (b, c) = locate(j);
                columns[b].get(i, c).re
            })),
            ElementType::Complex128 => ArrayData::Complex(Mat::from_fn(nrows, total, |i, j| {
                let (b, c) = locate(j);
                columns[b].get(i, c)
            })),
        };
        Ok(Self { data, ndim: 2 })
    }

    /// Entry-wise sum with type promotion. Keeps the dimensionality of `self`.
    pub fn add(&self, other: &Array) -> Result<Array> {
        if self.nrows() != other.nrows() || self.ncols() != other.ncols() {
            return Err(LinOpError::DimensionMismatch(format!(
                "cannot add arrays of shape {:?} and {:?}",
                self.dims(),
                other.dims()
            )));
        }
        let data = match (&self.data, &other.data) {
            (ArrayData::Real(a), ArrayData::Real(b)) => ArrayData::Real(map2(a, b, |x, y| x + y)),
            (ArrayData::Real(a), ArrayData::Complex(b)) => ArrayData::Complex(map2(a, b, |x, y| x + y)),
            (ArrayData::Complex(a), ArrayData::Real(b)) => ArrayData::Complex(map2(a, b, |x, y| x + y)),
            (ArrayData::Complex(a), ArrayData::Complex(b)) => ArrayData::Complex(map2(a, b, |x, y| x + y)),
        };
        Ok(Self { data, ndim: self.ndim })
    }

    /// `alpha · self`, promoting to complex for a complex `alpha`.
    pub fn scale(&self, alpha: Scalar) -> Array {
        let data = match (&self.data, alpha) {
            (ArrayData::Real(a), Scalar::Real(s)) => ArrayData::Real(map1(a, |x| s * x)),
            (ArrayData::Real(a), Scalar::Complex(s)) => ArrayData::Complex(map1(a, |x| s * x)),
            (ArrayData::Complex(a), Scalar::Real(s)) => ArrayData::Complex(map1(a, |x| x * s)),
            (ArrayData::Complex(a), Scalar::Complex(s)) => ArrayData::Complex(map1(a, |x| s * x)),
        };
        Self { data, ndim: self.ndim }
    }

    /// Entry-wise complex conjugate.
    pub fn conj(&self) -> Array {
        match &self.data {
            ArrayData::Real(_) => self.clone(),
            ArrayData::Complex(a) => Self { data: ArrayData::Complex(map1(a, |z| z.conj())), ndim: self.ndim },
        }
    }
}

impl From<Vec<f64>> for Array {
    fn from(v: Vec<f64>) -> Self {
        Array::from_vec(v)
    }
}

impl From<Vec<Complex64>> for Array {
    fn from(v: Vec<Complex64>) -> Self {
        Array::from_complex_vec(v)
    }
}

impl From<Mat<f64>> for Array {
    fn from(m: Mat<f64>) -> Self {
        Array::from_mat(m)
    }
}

impl From<Mat<Complex64>> for Array {
    fn from(m: Mat<Complex64>) -> Self {
        Array::from_complex_mat(m)
    }
}
