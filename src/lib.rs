//! linop: lazy matrix-free linear operators over Faer
//!
//! This crate provides an algebra of linear operators: leaves wrapping dense
//! or sparse matrices, user-supplied actions or the identity, combined with
//! `+`, `-`, `*`, scalar multiplication and integer powers into composites
//! that are only evaluated when applied to a vector or a block of columns.
//! Adjoints and transposes are derived structurally.

pub mod config;
pub mod core;
pub mod error;
pub mod matrix;
pub mod operator;

// Re-exports for convenience
pub use crate::config::*;
pub use crate::core::*;
pub use crate::error::*;
pub use crate::matrix::*;
pub use crate::operator::*;
