//! Species distribution model (SDM) post-processing.
//!
//! Per-model prediction CSVs are aligned onto a sample ocean grid and merged
//! into one `(model, y, x)` field per month, with a synthesized `Ensemble`
//! model holding the per-cell mean.
//!
//! # Example
//!
//! ```ignore
//! use sdm_ensemble::{build_ensemble, load_predictions, GridSample};
//!
//! let grid = GridSample::from_field(&area_t)?;
//! let months = [1, 2, 3];
//! let tables = vec![
//!     load_predictions("glm.csv", "GLM", &grid, &months)?,
//!     load_predictions("rf.csv", "RF", &grid, &months)?,
//! ];
//! let dataset = build_ensemble(&tables, &grid)?;
//! let january = dataset.get("January");
//! ```

pub mod ensemble;
pub mod error;
pub mod grid;
pub mod table;

pub use ensemble::{build_ensemble, month_name, ENSEMBLE_MODEL};
pub use error::{Result, SdmError};
pub use grid::GridSample;
pub use table::{load_predictions, PredictionRecord, PredictionRow, PredictionTable};
