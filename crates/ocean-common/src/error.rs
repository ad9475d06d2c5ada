//! Error types for gridded-field construction and manipulation.

use thiserror::Error;

/// Result type alias using FieldError.
pub type FieldResult<T> = Result<T, FieldError>;

/// Errors raised when a field would violate its structural invariants.
#[derive(Debug, Error)]
pub enum FieldError {
    #[error("data shape {data:?} does not match axis lengths {axes:?}")]
    InvalidShape { data: Vec<usize>, axes: Vec<usize> },

    #[error("coordinates of axis '{0}' are not strictly monotonic")]
    NonMonotonic(String),

    #[error("axis not found: {0}")]
    MissingAxis(String),

    #[error("duplicate axis name: {0}")]
    DuplicateAxis(String),

    #[error("axis '{axis}' does not carry {expected} coordinates")]
    WrongAxisType { axis: String, expected: &'static str },

    #[error("axis '{axis}' has length {expected}, replacement has {actual}")]
    LengthMismatch {
        axis: String,
        expected: usize,
        actual: usize,
    },

    #[error("index {index} is out of range for axis '{axis}' of length {len}")]
    IndexOutOfRange {
        axis: String,
        index: usize,
        len: usize,
    },
}
