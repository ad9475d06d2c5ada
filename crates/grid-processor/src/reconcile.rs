//! The Coordinate Reconciler: loads ocean and sea-ice variables onto one grid.
//!
//! Sea-ice output is stamped at the end of its averaging day and lives on the
//! model's native index axes (`nj`, `ni`). Ocean output is stamped mid-day on
//! geographic axes (`yt_ocean`, `xt_ocean`). Reconciling an ice field shifts
//! its timestamps onto the ocean registration and replaces its index axes with
//! the ocean cell-centre coordinates taken from a reference variable.

use std::sync::Arc;

use catalog::{GridSource, VariableRequest};
use chrono::{DateTime, Utc};
use ocean_common::{
    names, Axis, AxisRole, FieldError, GridKind, GriddedField, TimeConvention,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::ReconcilerConfig;
use crate::error::{ProcessorError, Result};

/// Which model produced a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DataOrigin {
    #[default]
    Ocean,
    Ice,
}

/// A windowed load of one variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadRequest {
    pub variable: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Output frequency, e.g. "1 daily".
    pub frequency: String,
    pub source: DataOrigin,
    /// Inclusive latitude band; the configured default when `None`.
    pub lat_band: Option<(f64, f64)>,
}

impl LoadRequest {
    /// Load an ocean-model variable.
    pub fn ocean(
        variable: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        frequency: impl Into<String>,
    ) -> Self {
        Self {
            variable: variable.into(),
            start,
            end,
            frequency: frequency.into(),
            source: DataOrigin::Ocean,
            lat_band: None,
        }
    }

    /// Load a sea-ice-model variable.
    pub fn ice(
        variable: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        frequency: impl Into<String>,
    ) -> Self {
        Self {
            source: DataOrigin::Ice,
            ..Self::ocean(variable, start, end, frequency)
        }
    }

    pub fn with_lat_band(mut self, min_lat: f64, max_lat: f64) -> Self {
        self.lat_band = Some((min_lat, max_lat));
        self
    }
}

/// Loads variables from a [`GridSource`] with consistent time and coordinates.
pub struct Reconciler {
    source: Arc<dyn GridSource>,
    config: ReconcilerConfig,
}

impl Reconciler {
    pub fn new(source: Arc<dyn GridSource>, config: ReconcilerConfig) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &ReconcilerConfig {
        &self.config
    }

    /// Fetch a variable, reconcile it if it comes from the ice model, and
    /// subset it to the latitude band.
    ///
    /// Catalog failures propagate unchanged. Reconciling is not idempotent:
    /// the ice time shift is applied on every call, to the freshly fetched field.
    pub fn load(&self, request: &LoadRequest) -> Result<GriddedField> {
        let fetch = VariableRequest::new(&self.config.experiment, &request.variable)
            .with_frequency(&request.frequency)
            .between(request.start, request.end);

        let field = match request.source {
            DataOrigin::Ocean => self.source.fetch(&fetch)?,
            DataOrigin::Ice => {
                let raw = self.source.fetch(&fetch.without_coord_decoding())?;
                let reference = self.fetch_reference()?;
                reconcile_ice(&raw, &reference)?
            }
        };

        let (min_lat, max_lat) = self.band(request);
        let subset = field.select_range(field.kind.y_axis(), min_lat, max_lat)?;

        info!(
            variable = %request.variable,
            origin = ?request.source,
            kind = %subset.kind,
            shape = ?subset.shape(),
            min_lat = min_lat,
            max_lat = max_lat,
            "Loaded variable"
        );

        Ok(subset)
    }

    /// The reference ocean variable, subset to a latitude band.
    ///
    /// Its horizontal axes are the grid every reconciled field ends up on.
    pub fn reference_grid(&self, lat_band: Option<(f64, f64)>) -> Result<GriddedField> {
        let reference = self.fetch_reference()?;
        let (min_lat, max_lat) = lat_band.unwrap_or((self.config.min_lat, self.config.max_lat));
        Ok(reference.select_range(reference.kind.y_axis(), min_lat, max_lat)?)
    }

    fn fetch_reference(&self) -> Result<GriddedField> {
        let request =
            VariableRequest::new(&self.config.experiment, &self.config.reference_variable).snapshot(1);
        Ok(self.source.fetch(&request)?)
    }

    fn band(&self, request: &LoadRequest) -> (f64, f64) {
        request
            .lat_band
            .unwrap_or((self.config.min_lat, self.config.max_lat))
    }
}

/// Put a raw ice field onto the ocean cell-centre grid of `reference`.
///
/// Timestamps move 12 hours earlier, the ice index axes take the reference
/// coordinate values and names, auxiliary coordinates are dropped and any other
/// non-time axis is left index-only.
pub fn reconcile_ice(raw: &GriddedField, reference: &GriddedField) -> Result<GriddedField> {
    let (_, ref_y) = reference
        .axis_by_role(AxisRole::Y)
        .ok_or_else(|| FieldError::MissingAxis(names::YT_OCEAN.to_string()))?;
    let (_, ref_x) = reference
        .axis_by_role(AxisRole::X)
        .ok_or_else(|| FieldError::MissingAxis(names::XT_OCEAN.to_string()))?;
    let (_, ice_y) = raw
        .axis_by_role(AxisRole::Y)
        .ok_or_else(|| FieldError::MissingAxis(names::NJ.to_string()))?;
    let (_, ice_x) = raw
        .axis_by_role(AxisRole::X)
        .ok_or_else(|| FieldError::MissingAxis(names::NI.to_string()))?;

    if ice_y.len() != ref_y.len() || ice_x.len() != ref_x.len() {
        return Err(ProcessorError::shape_mismatch(format!(
            "{} grid is {}x{} but {} grid is {}x{}",
            raw.name,
            ice_y.len(),
            ice_x.len(),
            reference.name,
            ref_y.len(),
            ref_x.len()
        )));
    }

    let offset = TimeConvention::Ice.offset_to(TimeConvention::Ocean);
    let y_name = ice_y.name.clone();
    let x_name = ice_x.name.clone();

    let mut field = raw
        .shift_times(offset)?
        .replace_axis(
            &y_name,
            Axis::degrees(names::YT_OCEAN, AxisRole::Y, ref_y.numeric()?.to_vec()),
        )?
        .replace_axis(
            &x_name,
            Axis::degrees(names::XT_OCEAN, AxisRole::X, ref_x.numeric()?.to_vec()),
        )?;

    let dropped = field.drop_aux_coords();
    let extra: Vec<String> = field
        .axes()
        .iter()
        .filter(|a| !matches!(a.role, AxisRole::Time | AxisRole::Y | AxisRole::X))
        .map(|a| a.name.clone())
        .collect();
    for name in &extra {
        field.clear_coordinate(name)?;
    }

    field.kind = GridKind::CellCenter;
    field.convention = TimeConvention::Ocean;

    debug!(
        variable = %field.name,
        shift_hours = offset.num_hours(),
        dropped_coords = dropped,
        index_only = ?extra,
        "Reconciled ice field onto ocean grid"
    );

    Ok(field)
}
