//! Matrix Playground Operations
//!
//! The catalog of elementary row/column operations:
//! - `OperationMeta`: static description (interaction, steps, prompts, shortcut)
//! - `OperationKind` and `OperationRegistry`: lookup by name or key
//! - `execute`: pure executor returning the new matrix and the cells it touched

mod traits;
mod registry;
mod execute;

pub use traits::{Interaction, OperationMeta};
pub use registry::{OperationKind, OperationRegistry};
pub use execute::{execute, validate_index, Executed};

/// Re-export core types for callers driving operations
pub mod prelude {
    pub use crate::{
        execute, Executed, Interaction, OperationKind, OperationMeta, OperationRegistry,
    };
    pub use matrixplay_core::prelude::*;
    pub use matrixplay_matrix::{Matrix, MatrixError};
}
