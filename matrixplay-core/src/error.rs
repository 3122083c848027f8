//! Structured errors for the playground's callers
//!
//! Every failure is local: it aborts the action that raised it and
//! leaves matrices and history untouched. Errors carry a stable code
//! for programmatic handling and a message fit for display.

use crate::ScalarError;
use serde::{Deserialize, Serialize};

/// Standard error codes (machine-readable)
pub mod codes {
    pub const INVALID_SCALAR: &str = "INVALID_SCALAR";
    pub const INVALID_NUMBER_FORMAT: &str = "INVALID_NUMBER_FORMAT";
    pub const INVALID_FRACTION_FORMAT: &str = "INVALID_FRACTION_FORMAT";
    pub const DIV_ZERO: &str = "DIV_ZERO";
    pub const DIMENSION_MISMATCH: &str = "DIMENSION_MISMATCH";
    pub const NOT_SQUARE: &str = "NOT_SQUARE";
    pub const SINGULAR_MATRIX: &str = "SINGULAR_MATRIX";
    pub const NON_INTEGER_POWER: &str = "NON_INTEGER_POWER";
    pub const INDEX_OUT_OF_BOUNDS: &str = "INDEX_OUT_OF_BOUNDS";
    // Selection protocol
    pub const OPERATION_IN_PROGRESS: &str = "OPERATION_IN_PROGRESS";
    pub const NO_OPERATION: &str = "NO_OPERATION";
    pub const INVALID_SELECTION: &str = "INVALID_SELECTION";
    pub const UNKNOWN_OPERATION: &str = "UNKNOWN_OPERATION";
    // Command input
    pub const PARSE_ERROR: &str = "PARSE_ERROR";
}

/// Context about where an error occurred
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorContext {
    /// Operation that was running
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,

    /// Cell being edited (row, column)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cell: Option<(usize, usize)>,

    /// Propagation notes
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub notes: Vec<String>,
}

/// Structured error surfaced to the user-facing caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayError {
    /// Machine-readable error code
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Suggestion for fixing the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,

    /// Where the error occurred
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<ErrorContext>,
}

impl PlayError {
    /// Create a new error
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            suggestion: None,
            context: None,
        }
    }

    /// Builder: add suggestion
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Builder: set operation context
    pub fn in_operation(mut self, operation: impl Into<String>) -> Self {
        let ctx = self.context.get_or_insert_with(ErrorContext::default);
        ctx.operation = Some(operation.into());
        self
    }

    /// Builder: set cell context
    pub fn at_cell(mut self, row: usize, column: usize) -> Self {
        let ctx = self.context.get_or_insert_with(ErrorContext::default);
        ctx.cell = Some((row, column));
        self
    }

    /// Builder: add propagation note
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        let ctx = self.context.get_or_insert_with(ErrorContext::default);
        ctx.notes.push(note.into());
        self
    }

    pub fn is(&self, code: &str) -> bool {
        self.code == code
    }

    // ========== Common Error Constructors ==========

    pub fn invalid_scalar(details: impl Into<String>) -> Self {
        Self::new(codes::INVALID_SCALAR, details.into())
            .with_suggestion("Denominators must be nonzero integers")
    }

    pub fn invalid_number_format(text: &str) -> Self {
        Self::new(codes::INVALID_NUMBER_FORMAT, format!("Invalid number format: '{}'", text))
            .with_suggestion("Enter an integer (3), a decimal (1.25) or a fraction (3/4)")
    }

    pub fn invalid_fraction_format(text: &str) -> Self {
        Self::new(codes::INVALID_FRACTION_FORMAT, format!("Invalid fraction format: '{}'", text))
            .with_suggestion("Fractions take the form numerator/denominator")
    }

    pub fn div_zero() -> Self {
        Self::new(codes::DIV_ZERO, "Division by zero")
            .with_suggestion("Ensure divisor is not zero")
    }

    pub fn dimension_mismatch(details: impl Into<String>) -> Self {
        Self::new(codes::DIMENSION_MISMATCH, format!("Incompatible dimensions: {}", details.into()))
    }

    pub fn not_square(rows: usize, columns: usize) -> Self {
        Self::new(codes::NOT_SQUARE, format!("The matrix must be square, got {}×{}", rows, columns))
    }

    pub fn singular_matrix() -> Self {
        Self::new(codes::SINGULAR_MATRIX, "The matrix is singular")
            .with_suggestion("Only matrices with a nonzero determinant have an inverse")
    }

    pub fn non_integer_power(power: impl Into<String>) -> Self {
        Self::new(codes::NON_INTEGER_POWER, format!("The power must be an integer, got {}", power.into()))
    }

    pub fn index_out_of_bounds(details: impl Into<String>) -> Self {
        Self::new(codes::INDEX_OUT_OF_BOUNDS, format!("Index out of bounds: {}", details.into()))
    }

    pub fn operation_in_progress(name: &str) -> Self {
        Self::new(codes::OPERATION_IN_PROGRESS, format!("Operation '{}' is still in progress", name))
            .with_suggestion("Finish the current operation or cancel it first")
    }

    pub fn no_operation() -> Self {
        Self::new(codes::NO_OPERATION, "No operation in progress")
            .with_suggestion("Start an operation first")
    }

    pub fn invalid_selection(details: impl Into<String>) -> Self {
        Self::new(codes::INVALID_SELECTION, format!("Invalid selection: {}", details.into()))
    }

    pub fn unknown_operation(name: &str) -> Self {
        Self::new(codes::UNKNOWN_OPERATION, format!("Unknown operation: {}", name))
            .with_suggestion("Use 'ops' to list available operations")
    }

    pub fn parse_error(details: impl Into<String>) -> Self {
        Self::new(codes::PARSE_ERROR, format!("Parse error: {}", details.into()))
    }
}

impl std::fmt::Display for PlayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, " (suggestion: {})", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for PlayError {}

impl From<ScalarError> for PlayError {
    fn from(err: ScalarError) -> Self {
        match err {
            ScalarError::InvalidScalar(s) => Self::invalid_scalar(s),
            ScalarError::InvalidNumberFormat(s) => Self::invalid_number_format(&s),
            ScalarError::InvalidFractionFormat(s) => Self::invalid_fraction_format(&s),
            ScalarError::DivisionByZero => Self::div_zero(),
        }
    }
}
