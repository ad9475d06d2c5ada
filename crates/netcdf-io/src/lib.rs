//! NetCDF persistence for labelled gridded fields.
//!
//! Reading decodes a variable, its coordinate variables and CF time units into
//! an [`ocean_common::GriddedField`]; writing emits the reverse with NaN mapped
//! to the netCDF default fill value.
//!
//! System requirements: libhdf5-dev and libnetcdf-dev.

pub mod error;
pub mod native;
pub mod reader;
pub mod units;
pub mod writer;

pub use error::{NetCdfError, NetCdfResult};
pub use native::silence_hdf5_errors;
pub use reader::{inspect, read_field, role_for_dimension, FileSummary};
pub use units::{TimeUnits, TIME_UNITS};
pub use writer::{write_field, write_field_with, FILL_VALUE_F32};
