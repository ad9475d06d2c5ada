//! Variable request types for catalog queries.
//!
//! A fluent builder covering both calls the pipeline makes: a windowed fetch of
//! a variable at some output frequency, and a single-snapshot fetch used only to
//! obtain grid coordinates.
//!
//! # Examples
//!
//! ```rust
//! use catalog::VariableRequest;
//! use chrono::{TimeZone, Utc};
//!
//! // Daily sea-ice concentration for January 2010, raw coordinates
//! let request = VariableRequest::new("01deg_jra55v140_iaf_cycle4", "aice")
//!     .with_frequency("1 daily")
//!     .between(
//!         Utc.with_ymd_and_hms(2010, 1, 1, 0, 0, 0).unwrap(),
//!         Utc.with_ymd_and_hms(2010, 1, 31, 0, 0, 0).unwrap(),
//!     )
//!     .without_coord_decoding();
//! assert!(!request.decode_coords);
//!
//! // First snapshot of the ocean cell area, for its coordinates
//! let reference = VariableRequest::new("01deg_jra55v140_iaf_cycle4", "area_t").snapshot(1);
//! assert_eq!(reference.limit, Some(1));
//! ```

use chrono::{DateTime, Utc};
use ocean_common::TimeWindow;
use serde::{Deserialize, Serialize};

/// Query parameters for one catalog fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableRequest {
    /// Experiment identifier (e.g., "01deg_jra55v140_iaf_cycle4")
    pub experiment: String,

    /// Variable short name (e.g., "aice", "temp", "area_t")
    pub variable: String,

    /// Output frequency (e.g., "1 daily", "1 monthly"). None matches any.
    pub frequency: Option<String>,

    /// Inclusive time window. None means the whole record.
    pub window: Option<TimeWindow>,

    /// Keep at most this many time steps.
    pub limit: Option<usize>,

    /// Decode auxiliary coordinates attached to the variable.
    pub decode_coords: bool,
}

impl VariableRequest {
    pub fn new(experiment: impl Into<String>, variable: impl Into<String>) -> Self {
        Self {
            experiment: experiment.into(),
            variable: variable.into(),
            frequency: None,
            window: None,
            limit: None,
            decode_coords: true,
        }
    }

    pub fn with_frequency(mut self, frequency: impl Into<String>) -> Self {
        self.frequency = Some(frequency.into());
        self
    }

    pub fn between(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.window = Some(TimeWindow::new(start, end));
        self
    }

    /// Keep only the first `n` time steps.
    pub fn snapshot(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    pub fn without_coord_decoding(mut self) -> Self {
        self.decode_coords = false;
        self
    }

    /// Whether a stored frequency satisfies this request.
    pub fn matches_frequency(&self, frequency: Option<&str>) -> bool {
        match (&self.frequency, frequency) {
            (None, _) => true,
            (Some(wanted), Some(have)) => wanted == have,
            (Some(_), None) => false,
        }
    }
}

impl std::fmt::Display for VariableRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.experiment, self.variable)?;
        if let Some(frequency) = &self.frequency {
            write!(f, " @ {}", frequency)?;
        }
        if let Some(window) = &self.window {
            write!(f, " [{} .. {}]", window.start, window.end)?;
        }
        Ok(())
    }
}
