//! Matrix Playground Core - Fundamental types
//!
//! This crate provides the core types used throughout the playground:
//! - `Scalar`: Exact rational numbers on arbitrary precision integers
//! - `parse_scalar`: The text to Scalar boundary for all user input
//! - `PlayError`: Structured errors for user-facing callers

mod scalar;
mod parse;
mod error;

pub use scalar::{Scalar, ScalarError};
pub use parse::parse_scalar;
pub use error::{PlayError, ErrorContext, codes};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{Scalar, ScalarError, PlayError, parse_scalar};
    pub use crate::error::codes;
}
