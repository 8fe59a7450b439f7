use thiserror::Error;

// Unified error type for linop

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LinOpError {
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),
    #[error("invalid operand: {0}")]
    InvalidOperand(String),
    #[error("type not understood: {0}")]
    UnsupportedType(String),
    #[error("not implemented: {0}")]
    NotImplemented(&'static str),
    #[error("invalid shape {0} (must be 2-d with positive dimensions)")]
    InvalidShape(String),
}

pub type Result<T> = std::result::Result<T, LinOpError>;
