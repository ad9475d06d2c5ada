//! Core processing for Southern Ocean model output.
//!
//! - **Coordinate Reconciler**: load ocean and sea-ice variables onto one grid
//!   with one time registration, subset to a latitude band
//! - **Longitude normalization** to [-180, 180)
//! - **Vertical Reducer**: bottom layer of a depth-resolved field
//! - **Geodesic Distance Engine**: great-circle distance from every grid cell
//!   to the edge curve of a reference field
//!
//! # Architecture
//!
//! ```text
//! GridSource (catalog)
//!      │
//!      ▼
//! Reconciler::load
//!      │   ice: shift -12h, take ocean y/x, drop extra coords
//!      │   all: subset latitude band
//!      ▼
//! normalize_longitude
//!      │
//!      ├─► extract_bottom_layer ──► (time, y, x)
//!      │
//!      └─► DistanceEngine::compute
//!               │   extract_edge_curve ──► HaversineIndex
//!               ▼
//!          dist_km (time=1, y, x) ──► {stem}_{YYYY}-{MM}.nc
//! ```
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use grid_processor::{DistanceEngine, LoadRequest, Persistence, Reconciler, TargetGrid};
//!
//! let reconciler = Reconciler::new(Arc::new(catalog), config.reconciler.clone());
//! let aice = reconciler.load(&LoadRequest::ice("aice", start, end, "1 daily"))?;
//! let aice = grid_processor::normalize_longitude(&aice)?;
//! let targets = TargetGrid::from_field(&aice)?;
//!
//! let engine = DistanceEngine::new(config.distance.clone());
//! let dist = engine.compute(&aice.time_slice(0)?, &targets, &config.distance.persistence())?;
//! ```

pub mod bottom;
pub mod config;
pub mod distance;
pub mod edge;
pub mod error;
pub mod index;
pub mod longitude;
pub mod reconcile;

// Re-export commonly used types at crate root
pub use bottom::extract_bottom_layer;
pub use config::{
    DistanceConfig, PipelineConfig, ReconcilerConfig, DEFAULT_EXPERIMENT, EARTH_RADIUS_KM,
};
pub use distance::{
    persist, DistanceEngine, Persistence, TargetGrid, DISTANCE_LONG_NAME, DISTANCE_VARIABLE,
};
pub use edge::{extract_edge_curve, EdgeCurve, EdgePoint};
pub use error::{ProcessorError, Result};
pub use index::{haversine_angle, haversine_km, HaversineIndex, Nearest};
pub use longitude::{normalize_longitude, wrap_longitude};
pub use reconcile::{reconcile_ice, DataOrigin, LoadRequest, Reconciler};
