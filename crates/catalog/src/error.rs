//! Error types for catalog queries.

use ocean_common::FieldError;
use thiserror::Error;

/// Errors that can occur while fetching from a catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The catalog holds nothing for the requested name/frequency/window.
    #[error("no data for {experiment}/{variable} at frequency '{frequency}'")]
    NoData {
        experiment: String,
        variable: String,
        frequency: String,
    },

    /// The request itself is malformed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Reading the underlying storage failed.
    #[error("failed to read catalog data: {0}")]
    Read(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Field(#[from] FieldError),
}

impl CatalogError {
    pub(crate) fn no_data(request: &crate::VariableRequest) -> Self {
        Self::NoData {
            experiment: request.experiment.clone(),
            variable: request.variable.clone(),
            frequency: request.frequency.clone().unwrap_or_else(|| "any".to_string()),
        }
    }
}

impl From<netcdf_io::NetCdfError> for CatalogError {
    fn from(err: netcdf_io::NetCdfError) -> Self {
        Self::Read(err.to_string())
    }
}

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;
