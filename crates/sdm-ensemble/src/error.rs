//! Error types for SDM ensemble building.

use ocean_common::FieldError;
use thiserror::Error;

/// Errors that can occur while loading predictions or building an ensemble.
#[derive(Error, Debug)]
pub enum SdmError {
    /// Reading or parsing a prediction CSV failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Rows do not fill the (model, y, x) grid exactly once.
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    /// Month number outside 1-12.
    #[error("invalid month number {0}")]
    InvalidMonth(u32),

    /// A model name that cannot be used, e.g. the reserved ensemble label.
    #[error("invalid model name '{0}'")]
    InvalidModel(String),

    #[error(transparent)]
    Field(#[from] FieldError),
}

impl SdmError {
    /// Create a ShapeMismatch error.
    pub fn shape_mismatch(msg: impl Into<String>) -> Self {
        Self::ShapeMismatch(msg.into())
    }
}

/// Result type for SDM operations.
pub type Result<T> = std::result::Result<T, SdmError>;
