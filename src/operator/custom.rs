//! Operators defined directly by user-supplied actions.

use super::{Kind, LinearOperator, VecFn};
use crate::config::MatmatOptions;
use crate::core::array::Array;
use crate::core::scalar::ElementType;
use crate::error::{LinOpError, Result};
use bitflags::bitflags;
use std::sync::Arc;

bitflags! {
    /// Actions an operator can perform.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct Capabilities: u8 {
        const MATVEC  = 0b001;
        const RMATVEC = 0b010;
        const MATMAT  = 0b100;
    }
}

pub(crate) struct CustomOperator {
    matvec: Option<VecFn>,
    rmatvec: Option<VecFn>,
    matmat: Option<VecFn>,
    options: MatmatOptions,
}

impl CustomOperator {
    pub(crate) fn capabilities(&self) -> Capabilities {
        // matvec and matmat can always stand in for each other
        let mut caps = Capabilities::MATVEC | Capabilities::MATMAT;
        if self.rmatvec.is_some() {
            caps |= Capabilities::RMATVEC;
        }
        caps
    }

    pub(crate) fn matvec(&self, x: &Array) -> Result<Array> {
        match (&self.matvec, &self.matmat) {
            (Some(f), _) => f(x),
            (None, Some(g)) => g(&x.clone().into_column(x.len())?),
            (None, None) => Err(LinOpError::NotImplemented("matvec is not defined")),
        }
    }

    pub(crate) fn rmatvec(&self, x: &Array) -> Result<Array> {
        match &self.rmatvec {
            Some(f) => f(x),
            None => Err(LinOpError::NotImplemented("rmatvec is not defined")),
        }
    }

    /// Uses the batched action if one was given, otherwise applies `matvec`
    /// to every column of `x` and stacks the results.
    pub(crate) fn matmat(&self, op: &LinearOperator, x: &Array) -> Result<Array> {
        if let Some(g) = &self.matmat {
            return g(x);
        }
        let k = x.ncols();
        let columns = if self.options.use_parallel(k) {
            matvec_columns_parallel(op, x)?
        } else {
            (0..k).map(|j| op.matvec(&x.column(j))).collect::<Result<Vec<_>>>()?
        };
        let empty_type = if columns.is_empty() { op.dtype()? } else { ElementType::Float64 };
        Array::hstack(&columns, op.nrows(), empty_type)
    }

    /// Swaps the roles of the forward and adjoint actions.
    pub(crate) fn adjoint(&self, op: &LinearOperator) -> Result<LinearOperator> {
        let Some(rmatvec) = self.rmatvec.clone() else {
            return Err(LinOpError::NotImplemented("adjoint requires an rmatvec action"));
        };
        let (m, n) = op.shape();
        let forward = op.clone();
        CustomBuilder::new((n, m))
            .with_matvec(rmatvec)
            .try_rmatvec(move |x| forward.matvec(x))
            .dtype(op.dtype()?)
            .options(self.options)
            .build()
    }
}

#[cfg(feature = "rayon")]
fn matvec_columns_parallel(op: &LinearOperator, x: &Array) -> Result<Vec<Array>> {
    use rayon::prelude::*;
    (0..x.ncols()).into_par_iter().map(|j| op.matvec(&x.column(j))).collect()
}

#[cfg(not(feature = "rayon"))]
fn matvec_columns_parallel(op: &LinearOperator, x: &Array) -> Result<Vec<Array>> {
    (0..x.ncols()).map(|j| op.matvec(&x.column(j))).collect()
}

/// Builder for operators defined by closures.
///
/// At least one of `matvec` / `matmat` must be supplied. Without `rmatvec`
/// the operator has no adjoint. Without `matmat`, batched application falls
/// back to one `matvec` per column. Without `dtype`, the element type is
/// inferred on first use.
pub struct CustomBuilder {
    shape: (usize, usize),
    matvec: Option<VecFn>,
    rmatvec: Option<VecFn>,
    matmat: Option<VecFn>,
    dtype: Option<ElementType>,
    options: MatmatOptions,
}

impl CustomBuilder {
    pub fn new(shape: (usize, usize)) -> Self {
        Self { shape, matvec: None, rmatvec: None, matmat: None, dtype: None, options: MatmatOptions::default() }
    }

    pub fn matvec<F>(self, f: F) -> Self
    where
        F: Fn(&Array) -> Array + Send + Sync + 'static,
    {
        self.with_matvec(Arc::new(move |x: &Array| -> Result<Array> { Ok(f(x)) }))
    }

    pub fn rmatvec<F>(self, f: F) -> Self
    where
        F: Fn(&Array) -> Array + Send + Sync + 'static,
    {
        self.with_rmatvec(Arc::new(move |x: &Array| -> Result<Array> { Ok(f(x)) }))
    }

    pub fn matmat<F>(self, f: F) -> Self
    where
        F: Fn(&Array) -> Array + Send + Sync + 'static,
    {
        self.with_matmat(Arc::new(move |x: &Array| -> Result<Array> { Ok(f(x)) }))
    }

    pub fn try_matvec<F>(self, f: F) -> Self
    where
        F: Fn(&Array) -> Result<Array> + Send + Sync + 'static,
    {
        self.with_matvec(Arc::new(f))
    }

    pub fn try_rmatvec<F>(self, f: F) -> Self
    where
        F: Fn(&Array) -> Result<Array> + Send + Sync + 'static,
    {
        self.with_rmatvec(Arc::new(f))
    }

    pub fn try_matmat<F>(self, f: F) -> Self
    where
        F: Fn(&Array) -> Result<Array> + Send + Sync + 'static,
    {
        self.with_matmat(Arc::new(f))
    }

    pub fn with_matvec(mut self, f: VecFn) -> Self {
        self.matvec = Some(f);
        self
    }

    pub fn with_rmatvec(mut self, f: VecFn) -> Self {
        self.rmatvec = Some(f);
        self
    }

    pub fn with_matmat(mut self, f: VecFn) -> Self {
        self.matmat = Some(f);
        self
    }

    pub fn dtype(mut self, dtype: ElementType) -> Self {
        self.dtype = Some(dtype);
        self
    }

    pub fn options(mut self, options: MatmatOptions) -> Self {
        self.options = options;
        self
    }

    pub fn build(self) -> Result<LinearOperator> {
        if self.matvec.is_none() && self.matmat.is_none() {
            return Err(LinOpError::InvalidOperand(
                "custom operator needs at least one of matvec and matmat".to_string(),
            ));
        }
        let custom = CustomOperator {
            matvec: self.matvec,
            rmatvec: self.rmatvec,
            matmat: self.matmat,
            options: self.options,
        };
        LinearOperator::from_parts(self.shape, self.dtype, Kind::Custom(custom))
    }
}

impl LinearOperator {
    /// Starts building an operator of the given shape from closures.
    pub fn custom(shape: (usize, usize)) -> CustomBuilder {
        CustomBuilder::new(shape)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex64;

    fn reverse(x: &Array) -> Array {
        let mut v = x.to_real_vec().unwrap();
        v.reverse();
        Array::from_vec(v)
    }

    #[test]
    fn build_requires_an_action() {
        let err = LinearOperator::custom((2, 2)).build().unwrap_err();
        assert!(matches!(err, LinOpError::InvalidOperand(_)));
    }

    #[test]
    fn missing_rmatvec_is_not_implemented() {
        let a = LinearOperator::custom((3, 3)).matvec(reverse).build().unwrap();
        assert!(!a.capabilities().contains(Capabilities::RMATVEC));
        let x = Array::from_vec(vec![1.0, 2.0, 3.0]);
        assert!(matches!(a.rmatvec(&x), Err(LinOpError::NotImplemented(_))));
        assert!(matches!(a.adjoint(), Err(LinOpError::NotImplemented(_))));
    }

    #[test]
    fn adjoint_swaps_actions() {
        // A = [1 2 3] (1x3), Aᴴ = [1 2 3]ᵀ
        let a = LinearOperator::custom((1, 3))
            .matvec(|x| {
                let v = x.to_real_vec().unwrap();
                Array::from_vec(vec![v[0] + 2.0 * v[1] + 3.0 * v[2]])
            })
            .rmatvec(|x| {
                let s = x.to_real_vec().unwrap()[0];
                Array::from_vec(vec![s, 2.0 * s, 3.0 * s])
            })
            .build()
            .unwrap();
        let h = a.adjoint().unwrap();
        assert_eq!(h.shape(), (3, 1));
        let y = h.matvec(&Array::from_vec(vec![2.0])).unwrap();
        assert_eq!(y.to_real_vec().unwrap(), vec![2.0, 4.0, 6.0]);
        let z = h.rmatvec(&Array::from_vec(vec![1.0, 1.0, 1.0])).unwrap();
        assert_eq!(z.to_real_vec().unwrap(), vec![6.0]);
    }

    #[test]
    fn matmat_only_operator_serves_matvec() {
        let a = LinearOperator::custom((2, 2))
            .matmat(|x| x.scale(3.0.into()))
            .build()
            .unwrap();
        let y = a.matvec(&Array::from_vec(vec![1.0, 2.0])).unwrap();
        assert_eq!(y.dims(), vec![2]);
        assert_eq!(y.to_real_vec().unwrap(), vec![3.0, 6.0]);
    }

    #[test]
    fn column_fallback_matches_matvec() {
        let a = LinearOperator::custom((3, 3)).matvec(reverse).options(MatmatOptions::sequential()).build().unwrap();
        let x = Array::from_column_major(3, 2, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        let y = a.matmat(&x).unwrap();
        assert_eq!(y.to_real_vec().unwrap(), vec![3.0, 2.0, 1.0, 6.0, 5.0, 4.0]);
    }

    #[test]
    fn wrong_sized_result_is_reported() {
        let a = LinearOperator::custom((2, 2))
            .matvec(|_| Array::from_vec(vec![1.0]))
            .dtype(ElementType::Float64)
            .build()
            .unwrap();
        let err = a.matvec(&Array::from_vec(vec![1.0, 1.0])).unwrap_err();
        assert!(matches!(err, LinOpError::DimensionMismatch(ref msg) if msg.contains("invalid shape")));
    }

    #[test]
    fn dtype_is_inferred_from_zero_vector() {
        let a = LinearOperator::custom((2, 2))
            .matvec(|x| x.scale(Complex64::new(0.0, 1.0).into()))
            .build()
            .unwrap();
        assert_eq!(a.known_dtype(), None);
        assert_eq!(a.dtype().unwrap(), ElementType::Complex128);
        assert_eq!(a.known_dtype(), Some(ElementType::Complex128));
    }
}
