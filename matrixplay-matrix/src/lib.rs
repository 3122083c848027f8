//! Matrix Playground Matrix - Exact rational linear algebra
//!
//! Provides the matrix value type and its algorithms:
//! - Construction and access (new, from_rows, identity, zeros, get, set)
//! - Transformations (transpose, multiply, scale, resize, raise_to_power)
//! - Properties (determinant, cofactor, trace, rank)
//! - Inverse and reduced row echelon form
//! - Text export (LaTeX bmatrix, plain)
//!
//! All arithmetic is exact: every cell is a `Scalar` rational, so a
//! singular matrix always has a determinant of exactly zero.

mod types;
mod ops;
mod props;
mod solve;
mod export;

pub use types::{Matrix, MatrixError};
pub use ops::MAX_POWER;
pub use export::ExportStyle;
