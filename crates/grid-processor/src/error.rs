//! Error types for grid processing.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors that can occur during grid processing.
#[derive(Error, Debug)]
pub enum ProcessorError {
    /// A catalog fetch failed; propagated verbatim.
    #[error(transparent)]
    Catalog(#[from] catalog::CatalogError),

    /// A field operation violated an axis or shape invariant.
    #[error(transparent)]
    Field(#[from] ocean_common::FieldError),

    /// Writing a distance file failed.
    #[error(transparent)]
    NetCdf(#[from] netcdf_io::NetCdfError),

    /// Two grids that must align do not.
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    /// The reference field has no valid value in any column.
    #[error("no edge found in reference field at {time}")]
    NoEdgeFound { time: DateTime<Utc> },

    /// The distance engine accepts exactly one time step per call.
    #[error("expected a single time step, got {0}")]
    MultipleTimeSteps(usize),

    /// Configuration error.
    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ProcessorError {
    /// Create a ShapeMismatch error.
    pub fn shape_mismatch(msg: impl Into<String>) -> Self {
        Self::ShapeMismatch(msg.into())
    }

    /// Create a ConfigError.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}

/// Result type for grid processor operations.
pub type Result<T> = std::result::Result<T, ProcessorError>;
