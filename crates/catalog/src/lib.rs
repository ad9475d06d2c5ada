//! Access to gridded model output by experiment, variable, frequency and time.
//!
//! The pipeline only talks to a [`GridSource`]. Two backends are provided:
//! [`MemoryCatalog`] for data already in memory and [`NetcdfCatalog`] for a
//! directory tree of NetCDF files.

pub mod error;
pub mod memory;
pub mod netcdf;
pub mod request;
pub mod source;

pub use error::{CatalogError, Result};
pub use memory::{CatalogEntry, MemoryCatalog};
pub use netcdf::NetcdfCatalog;
pub use request::VariableRequest;
pub use source::{apply_request, concat_time, GridSource};
