//! Matrix-backed operators and their adjoint views.
//!
//! The adjoint of a matrix operator is a view over the same payload that
//! reads it conjugate-transposed. The original caches its view; the view
//! points back at the original through a `Weak`, so the pair never keeps
//! itself alive.

use super::{Kind, LinearOperator, Node};
use crate::error::Result;
use crate::matrix::Matrix;
use log::debug;
use std::sync::{Arc, OnceLock, Weak};

impl LinearOperator {
    /// Wraps a dense or sparse matrix. The matrix is moved, not copied.
    pub fn from_matrix(matrix: impl Into<Matrix>) -> Result<LinearOperator> {
        Self::from_shared_matrix(Arc::new(matrix.into()))
    }

    /// Wraps a matrix that may also be referenced elsewhere.
    ///
    /// Applications read the payload live on every call.
    pub fn from_shared_matrix(payload: Arc<Matrix>) -> Result<LinearOperator> {
        let shape = payload.shape();
        let dtype = payload.element_type();
        LinearOperator::from_parts(shape, Some(dtype), Kind::Matrix { payload, adjoint: OnceLock::new() })
    }

    /// The wrapped matrix of a matrix-backed operator (not of its adjoint view).
    pub fn matrix(&self) -> Option<&Matrix> {
        match self.kind_ref() {
            Kind::Matrix { payload, .. } => Some(payload),
            _ => None,
        }
    }

    pub(crate) fn matrix_adjoint_view(
        &self,
        payload: &Arc<Matrix>,
        cache: &OnceLock<LinearOperator>,
    ) -> Result<LinearOperator> {
        if let Some(view) = cache.get() {
            return Ok(view.clone());
        }
        let (m, n) = self.shape();
        let view = LinearOperator::from_parts(
            (n, m),
            self.known_dtype(),
            Kind::MatrixAdjoint { payload: Arc::clone(payload), original: Arc::downgrade(&self.0) },
        )?;
        debug!("caching adjoint view of {self}");
        Ok(cache.get_or_init(|| view).clone())
    }
}

/// Adjoint of an adjoint view: the original operator, or a fresh matrix
/// operator over the same payload if the original is gone.
pub(crate) fn adjoint_original(payload: &Arc<Matrix>, original: &Weak<Node>) -> Result<LinearOperator> {
    match original.upgrade() {
        Some(node) => Ok(LinearOperator(node)),
        None => {
            debug!("original of adjoint view dropped, rewrapping payload");
            LinearOperator::from_shared_matrix(Arc::clone(payload))
        }
    }
}
