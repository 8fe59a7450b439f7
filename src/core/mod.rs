//! Scalars, arrays and the duck-typed operator trait.

pub mod array;
pub mod scalar;
pub mod traits;

pub use array::{Array, ArrayData, Element};
pub use scalar::{ElementType, Scalar};
pub use traits::OperatorLike;
