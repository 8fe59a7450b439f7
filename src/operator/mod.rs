//! Lazy, composable linear operators.
//!
//! A [`LinearOperator`] is a cheap, reference-counted handle to an immutable
//! node. Leaves wrap user actions, matrices or the identity; composites
//! (sum, product, scaled, power) reference their operands and are only
//! evaluated when `matvec`, `rmatvec` or `matmat` is called on concrete data.
//!
//! ```rust,ignore
//! use linop::{Array, LinearOperator};
//! let a = LinearOperator::from_matrix(faer::Mat::<f64>::identity(3, 3))?;
//! let b = (&a * 2.0)?;
//! let c = (&(&a + &b)? * &a)?;
//! let y = c.matvec(&Array::from_vec(vec![1.0, 2.0, 3.0]))?;
//! let h = c.adjoint()?; // Aᴴ (A + 2A)ᴴ
//! ```

pub mod coerce;
pub mod composite;
pub mod custom;
pub mod identity;
pub mod matrix;
pub mod ops;

pub use coerce::as_operator;
pub use custom::{Capabilities, CustomBuilder};

use crate::core::array::Array;
use crate::core::scalar::{ElementType, Scalar};
use crate::error::{LinOpError, Result};
use crate::matrix::Matrix;
use custom::CustomOperator;
use log::debug;
use num_complex::Complex64;
use std::fmt;
use std::sync::{Arc, OnceLock, Weak};

/// Shared, fallible vector action.
pub type VecFn = Arc<dyn Fn(&Array) -> Result<Array> + Send + Sync>;

pub(crate) struct Node {
    shape: (usize, usize),
    dtype: OnceLock<ElementType>,
    kind: Kind,
}

pub(crate) enum Kind {
    Custom(CustomOperator),
    Sum(LinearOperator, LinearOperator),
    Product(LinearOperator, LinearOperator),
    Scaled(LinearOperator, Scalar),
    Power(LinearOperator, u32),
    Matrix { payload: Arc<Matrix>, adjoint: OnceLock<LinearOperator> },
    MatrixAdjoint { payload: Arc<Matrix>, original: Weak<Node> },
    Identity,
}

/// Variant tag of an operator node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorKind {
    Custom,
    Sum,
    Product,
    Scaled,
    Power,
    Matrix,
    MatrixAdjoint,
    Identity,
}

impl OperatorKind {
    pub fn name(self) -> &'static str {
        match self {
            OperatorKind::Custom => "CustomLinearOperator",
            OperatorKind::Sum => "SumLinearOperator",
            OperatorKind::Product => "ProductLinearOperator",
            OperatorKind::Scaled => "ScaledLinearOperator",
            OperatorKind::Power => "PowerLinearOperator",
            OperatorKind::Matrix => "MatrixLinearOperator",
            OperatorKind::MatrixAdjoint => "AdjointMatrixOperator",
            OperatorKind::Identity => "IdentityOperator",
        }
    }
}

/// Right-hand side accepted by [`LinearOperator::dot`].
#[derive(Debug, Clone)]
pub enum Operand {
    Operator(LinearOperator),
    Scalar(Scalar),
    Array(Array),
}

/// Result of [`LinearOperator::dot`]: a new lazy operator, or applied data.
#[derive(Debug, Clone)]
pub enum DotOutput {
    Operator(LinearOperator),
    Array(Array),
}

impl DotOutput {
    pub fn into_operator(self) -> Option<LinearOperator> {
        match self {
            DotOutput::Operator(op) => Some(op),
            DotOutput::Array(_) => None,
        }
    }

    pub fn into_array(self) -> Option<Array> {
        match self {
            DotOutput::Array(x) => Some(x),
            DotOutput::Operator(_) => None,
        }
    }
}

/// Handle to an immutable, lazily evaluated linear operator of shape `(M, N)`.
#[derive(Clone)]
pub struct LinearOperator(Arc<Node>);

impl LinearOperator {
    pub(crate) fn from_parts(shape: (usize, usize), dtype: Option<ElementType>, kind: Kind) -> Result<Self> {
        if shape.0 == 0 || shape.1 == 0 {
            return Err(LinOpError::InvalidShape(format!("{shape:?}")));
        }
        let cell = OnceLock::new();
        if let Some(ty) = dtype {
            let _ = cell.set(ty);
        }
        Ok(Self(Arc::new(Node { shape, dtype: cell, kind })))
    }

    pub(crate) fn kind_ref(&self) -> &Kind {
        &self.0.kind
    }

    /// `(M, N)`: maps length-N inputs to length-M outputs.
    pub fn shape(&self) -> (usize, usize) {
        self.0.shape
    }

    pub fn nrows(&self) -> usize {
        self.0.shape.0
    }

    pub fn ncols(&self) -> usize {
        self.0.shape.1
    }

    pub fn kind(&self) -> OperatorKind {
        match &self.0.kind {
            Kind::Custom(_) => OperatorKind::Custom,
            Kind::Sum(..) => OperatorKind::Sum,
            Kind::Product(..) => OperatorKind::Product,
            Kind::Scaled(..) => OperatorKind::Scaled,
            Kind::Power(..) => OperatorKind::Power,
            Kind::Matrix { .. } => OperatorKind::Matrix,
            Kind::MatrixAdjoint { .. } => OperatorKind::MatrixAdjoint,
            Kind::Identity => OperatorKind::Identity,
        }
    }

    /// Operators referenced by this node, in construction order.
    ///
    /// An adjoint matrix view reports its original while that is alive.
    pub fn operands(&self) -> Vec<LinearOperator> {
        match &self.0.kind {
            Kind::Sum(a, b) | Kind::Product(a, b) => vec![a.clone(), b.clone()],
            Kind::Scaled(a, _) | Kind::Power(a, _) => vec![a.clone()],
            Kind::MatrixAdjoint { original, .. } => original.upgrade().map(LinearOperator).into_iter().collect(),
            Kind::Custom(_) | Kind::Matrix { .. } | Kind::Identity => Vec::new(),
        }
    }

    /// Factor of a scaled operator.
    pub fn factor(&self) -> Option<Scalar> {
        match &self.0.kind {
            Kind::Scaled(_, alpha) => Some(*alpha),
            _ => None,
        }
    }

    /// Exponent of a power operator.
    pub fn exponent(&self) -> Option<u32> {
        match &self.0.kind {
            Kind::Power(_, p) => Some(*p),
            _ => None,
        }
    }

    /// Whether both handles point at the same node.
    pub fn ptr_eq(&self, other: &LinearOperator) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Element type if it is already known, without probing.
    pub fn known_dtype(&self) -> Option<ElementType> {
        self.0.dtype.get().copied()
    }

    /// Element type, inferred on first use by applying the operator to a
    /// zero vector. The inferred value is cached for the operator's lifetime.
    pub fn dtype(&self) -> Result<ElementType> {
        if let Some(ty) = self.0.dtype.get() {
            return Ok(*ty);
        }
        let probe = Array::zeros(self.ncols(), ElementType::Float64);
        let ty = self.matvec(&probe)?.element_type();
        debug!("inferred element type {ty} for {self}");
        Ok(*self.0.dtype.get_or_init(|| ty))
    }

    /// Matrix–vector product y = A x for `x` of shape `(N,)` or `(N, 1)`.
    ///
    /// The result has shape `(M,)` or `(M, 1)` to match `x`.
    pub fn matvec(&self, x: &Array) -> Result<Array> {
        let (m, n) = self.shape();
        if !accepts_vector(x, n) {
            return Err(LinOpError::DimensionMismatch(format!(
                "{self} cannot be applied to input of shape {:?}",
                x.dims()
            )));
        }
        let y = self.forward(x)?;
        self.reshape_like(x, y, m, "matvec")
    }

    /// Adjoint product y = Aᴴ x for `x` of shape `(M,)` or `(M, 1)`.
    pub fn rmatvec(&self, x: &Array) -> Result<Array> {
        let (m, n) = self.shape();
        if !accepts_vector(x, m) {
            return Err(LinOpError::DimensionMismatch(format!(
                "adjoint of {self} cannot be applied to input of shape {:?}",
                x.dims()
            )));
        }
        let y = self.backward(x)?;
        self.reshape_like(x, y, n, "rmatvec")
    }

    /// Matrix–matrix product Y = A X for a 2-D `X` of shape `(N, K)`.
    pub fn matmat(&self, x: &Array) -> Result<Array> {
        let (m, n) = self.shape();
        if x.ndim() != 2 {
            return Err(LinOpError::DimensionMismatch(format!("expected 2-d array, not {}-d", x.ndim())));
        }
        if x.nrows() != n {
            return Err(LinOpError::DimensionMismatch(format!(
                "{self} cannot be applied to block of shape {:?}",
                x.dims()
            )));
        }
        let y = self.batched(x)?;
        if y.nrows() != m || y.ncols() != x.ncols() {
            return Err(LinOpError::DimensionMismatch(format!(
                "invalid shape {:?} returned by matmat() of {self}, expected [{m}, {}]",
                y.dims(),
                x.ncols()
            )));
        }
        if y.ndim() == 1 { y.into_column(m) } else { Ok(y) }
    }

    /// Hermitian adjoint Aᴴ.
    ///
    /// Composites build their adjoint structurally: `(A + B)ᴴ = Aᴴ + Bᴴ`,
    /// `(A B)ᴴ = Bᴴ Aᴴ`, `(αA)ᴴ = conj(α) Aᴴ`, `(Aᵖ)ᴴ = (Aᴴ)ᵖ` and
    /// `(A⁰)ᴴ = I`. A matrix operator returns its cached adjoint view, and
    /// the view returns the original.
    pub fn adjoint(&self) -> Result<LinearOperator> {
        match &self.0.kind {
            Kind::Custom(c) => c.adjoint(self),
            Kind::Sum(a, b) => a.adjoint()?.try_add(&b.adjoint()?),
            Kind::Product(a, b) => b.adjoint()?.compose(&a.adjoint()?),
            Kind::Scaled(a, alpha) => a.adjoint()?.scale(alpha.conj()),
            Kind::Power(_, 0) => LinearOperator::identity(self.shape(), self.known_dtype()),
            Kind::Power(a, p) => a.adjoint()?.pow(*p),
            Kind::Matrix { payload, adjoint } => self.matrix_adjoint_view(payload, adjoint),
            Kind::MatrixAdjoint { payload, original } => matrix::adjoint_original(payload, original),
            Kind::Identity => Ok(self.clone()),
        }
    }

    /// Transpose Aᵀ, evaluated as `Aᵀ x = conj(Aᴴ conj(x))`.
    pub fn transpose(&self) -> Result<LinearOperator> {
        if let Kind::Identity = self.0.kind {
            return Ok(self.clone());
        }
        let (m, n) = self.shape();
        let h = self.adjoint()?;
        let a = self.clone();
        LinearOperator::custom((n, m))
            .try_matvec(move |x| Ok(h.matvec(&x.conj())?.conj()))
            .try_rmatvec(move |x| Ok(a.matvec(&x.conj())?.conj()))
            .dtype(self.dtype()?)
            .build()
    }

    /// Operator times operator, scalar or array.
    ///
    /// Operators compose lazily, scalars scale lazily, and arrays are applied
    /// right away (`matvec` for `(N,)`/`(N, 1)`, `matmat` for `(N, K)`).
    pub fn dot(&self, rhs: impl Into<Operand>) -> Result<DotOutput> {
        match rhs.into() {
            Operand::Operator(b) => self.compose(&b).map(DotOutput::Operator),
            Operand::Scalar(alpha) => self.scale(alpha).map(DotOutput::Operator),
            Operand::Array(x) => self.apply(&x).map(DotOutput::Array),
        }
    }

    /// Same as [`LinearOperator::dot`].
    pub fn call(&self, rhs: impl Into<Operand>) -> Result<DotOutput> {
        self.dot(rhs)
    }

    pub(crate) fn apply(&self, x: &Array) -> Result<Array> {
        let n = self.ncols();
        if x.nrows() != n {
            return Err(LinOpError::InvalidOperand(format!(
                "expected array with leading dimension {n} for {self}, got shape {:?}",
                x.dims()
            )));
        }
        if x.ndim() == 1 || x.ncols() == 1 { self.matvec(x) } else { self.matmat(x) }
    }

    /// Which actions are available along this operator's chain.
    pub fn capabilities(&self) -> Capabilities {
        let all = Capabilities::all();
        match &self.0.kind {
            Kind::Custom(c) => c.capabilities(),
            Kind::Sum(a, b) | Kind::Product(a, b) => {
                let adjoint = a.capabilities() & b.capabilities() & Capabilities::RMATVEC;
                Capabilities::MATVEC | Capabilities::MATMAT | adjoint
            }
            // A⁰ never touches its operand.
            Kind::Power(_, 0) => all,
            Kind::Scaled(a, _) | Kind::Power(a, _) => {
                Capabilities::MATVEC | Capabilities::MATMAT | (a.capabilities() & Capabilities::RMATVEC)
            }
            Kind::Matrix { .. } | Kind::MatrixAdjoint { .. } | Kind::Identity => all,
        }
    }

    fn reshape_like(&self, x: &Array, y: Array, len: usize, action: &str) -> Result<Array> {
        let dims = y.dims();
        let shaped = if x.ndim() == 1 { y.into_vector(len) } else { y.into_column(len) };
        shaped.map_err(|_| {
            LinOpError::DimensionMismatch(format!(
                "invalid shape {dims:?} returned by {action}() of {self}, expected {len} entries"
            ))
        })
    }

    fn forward(&self, x: &Array) -> Result<Array> {
        match &self.0.kind {
            Kind::Custom(c) => c.matvec(x),
            Kind::Sum(a, b) => a.matvec(x)?.add(&b.matvec(x)?),
            Kind::Product(a, b) => a.matvec(&b.matvec(x)?),
            Kind::Scaled(a, alpha) => Ok(a.matvec(x)?.scale(*alpha)),
            Kind::Power(a, p) => (0..*p).try_fold(x.clone(), |acc, _| a.matvec(&acc)),
            Kind::Matrix { payload, .. } => Ok(payload.apply(x, false)),
            Kind::MatrixAdjoint { payload, .. } => Ok(payload.apply(x, true)),
            Kind::Identity => Ok(x.clone()),
        }
    }

    fn backward(&self, x: &Array) -> Result<Array> {
        match &self.0.kind {
            Kind::Custom(c) => c.rmatvec(x),
            Kind::Sum(a, b) => a.rmatvec(x)?.add(&b.rmatvec(x)?),
            Kind::Product(a, b) => b.rmatvec(&a.rmatvec(x)?),
            Kind::Scaled(a, alpha) => Ok(a.rmatvec(x)?.scale(alpha.conj())),
            Kind::Power(a, p) => (0..*p).try_fold(x.clone(), |acc, _| a.rmatvec(&acc)),
            Kind::Matrix { payload, .. } => Ok(payload.apply(x, true)),
            Kind::MatrixAdjoint { payload, .. } => Ok(payload.apply(x, false)),
            Kind::Identity => Ok(x.clone()),
        }
    }

    fn batched(&self, x: &Array) -> Result<Array> {
        match &self.0.kind {
            Kind::Custom(c) => c.matmat(self, x),
            Kind::Sum(a, b) => a.matmat(x)?.add(&b.matmat(x)?),
            Kind::Product(a, b) => a.matmat(&b.matmat(x)?),
            Kind::Scaled(a, alpha) => Ok(a.matmat(x)?.scale(*alpha)),
            Kind::Power(a, p) => (0..*p).try_fold(x.clone(), |acc, _| a.matmat(&acc)),
            Kind::Matrix { payload, .. } => Ok(payload.apply(x, false)),
            Kind::MatrixAdjoint { payload, .. } => Ok(payload.apply(x, true)),
            Kind::Identity => Ok(x.clone()),
        }
    }
}

fn accepts_vector(x: &Array, n: usize) -> bool {
    x.nrows() == n && (x.ndim() == 1 || x.ncols() == 1)
}

impl fmt::Display for LinearOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (m, n) = self.shape();
        let name = self.kind().name();
        match self.known_dtype() {
            Some(ty) => write!(f, "<{m}x{n} {name} with dtype={ty}>"),
            None => write!(f, "<{m}x{n} {name} with unspecified dtype>"),
        }
    }
}

impl fmt::Debug for LinearOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl From<LinearOperator> for Operand {
    fn from(op: LinearOperator) -> Self {
        Operand::Operator(op)
    }
}

impl From<&LinearOperator> for Operand {
    fn from(op: &LinearOperator) -> Self {
        Operand::Operator(op.clone())
    }
}

impl From<Scalar> for Operand {
    fn from(alpha: Scalar) -> Self {
        Operand::Scalar(alpha)
    }
}

impl From<f64> for Operand {
    fn from(alpha: f64) -> Self {
        Operand::Scalar(Scalar::Real(alpha))
    }
}

impl From<Complex64> for Operand {
    fn from(alpha: Complex64) -> Self {
        Operand::Scalar(Scalar::Complex(alpha))
    }
}

impl From<Array> for Operand {
    fn from(x: Array) -> Self {
        Operand::Array(x)
    }
}

impl From<&Array> for Operand {
    fn from(x: &Array) -> Self {
        Operand::Array(x.clone())
    }
}
