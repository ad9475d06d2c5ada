//! Edge-curve extraction from a reference scalar field.

use chrono::{DateTime, Utc};
use ndarray::Ix3;
use ocean_common::{AxisRole, FieldError, GriddedField};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ProcessorError, Result};

/// One point of an edge curve, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgePoint {
    pub lat: f64,
    pub lon: f64,
}

/// The locus of a field's column-wise maximum at one time step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeCurve {
    pub time: DateTime<Utc>,
    /// One point per x column with at least one valid value, in x order.
    pub points: Vec<EdgePoint>,
}

impl EdgeCurve {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Trace the edge of a single-time-step `(time, y, x)` field.
///
/// For each x column the latitude of the maximum is taken, ties going to the
/// first occurrence along increasing y. Missing values never win; a column
/// that is entirely missing adds no point.
///
/// # Errors
///
/// `MultipleTimeSteps` unless the field has exactly one time step, and
/// `NoEdgeFound` when every column is missing.
pub fn extract_edge_curve(field: &GriddedField) -> Result<EdgeCurve> {
    let (_, time_axis) = field
        .axis_by_role(AxisRole::Time)
        .ok_or_else(|| FieldError::MissingAxis(ocean_common::names::TIME.to_string()))?;
    let times = time_axis.times()?;
    let time = match times {
        [time] => *time,
        _ => return Err(ProcessorError::MultipleTimeSteps(times.len())),
    };

    let (_, y_axis) = field
        .axis_by_role(AxisRole::Y)
        .ok_or_else(|| FieldError::MissingAxis(field.kind.y_axis().to_string()))?;
    let (_, x_axis) = field
        .axis_by_role(AxisRole::X)
        .ok_or_else(|| FieldError::MissingAxis(field.kind.x_axis().to_string()))?;
    let lats = y_axis.numeric()?;
    let lons = x_axis.numeric()?;

    let ordered = field.transpose_to(&[
        time_axis.name.as_str(),
        y_axis.name.as_str(),
        x_axis.name.as_str(),
    ])?;
    let data = ordered
        .data()
        .view()
        .into_dimensionality::<Ix3>()
        .map_err(|e| ProcessorError::shape_mismatch(format!("{}: {}", field.name, e)))?;

    let mut points = Vec::with_capacity(lons.len());
    for (i, &lon) in lons.iter().enumerate() {
        let mut best: Option<(usize, f32)> = None;
        for (j, &value) in data.slice(ndarray::s![0, .., i]).iter().enumerate() {
            if value.is_nan() {
                continue;
            }
            // Strict comparison keeps the first occurrence on ties.
            if best.map_or(true, |(_, max)| value > max) {
                best = Some((j, value));
            }
        }
        if let Some((j, _)) = best {
            points.push(EdgePoint { lat: lats[j], lon });
        }
    }

    if points.is_empty() {
        return Err(ProcessorError::NoEdgeFound { time });
    }

    debug!(
        variable = %field.name,
        time = %time,
        points = points.len(),
        columns = lons.len(),
        "Extracted edge curve"
    );

    Ok(EdgeCurve { time, points })
}
