//! Common types shared by the Southern Ocean data-preparation crates.
//!
//! The central type is [`GriddedField`]: an N-dimensional `f32` array whose
//! axes carry names, roles and coordinate vectors, tagged with the horizontal
//! grid it lives on ([`GridKind`]) and the registration of its timestamps
//! ([`TimeConvention`]).

pub mod axis;
pub mod dataset;
pub mod error;
pub mod field;
pub mod grid;
pub mod time;

pub use axis::{Axis, AxisRole, AxisValues};
pub use dataset::Dataset;
pub use error::{FieldError, FieldResult};
pub use field::{AuxCoord, GriddedField};
pub use grid::{names, GridKind, LongitudeRange};
pub use time::{parse_iso8601, TimeConvention, TimeParseError, TimeWindow};
