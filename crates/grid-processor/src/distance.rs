//! The Geodesic Distance Engine: distance from every grid cell to the edge curve.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Datelike, Utc};
use ndarray::Array3;
use ocean_common::{Axis, AxisRole, FieldError, GriddedField};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::DistanceConfig;
use crate::edge::extract_edge_curve;
use crate::error::{ProcessorError, Result};
use crate::index::HaversineIndex;

/// Name of the produced variable.
pub const DISTANCE_VARIABLE: &str = "dist_km";

/// Descriptive name attached to every distance field.
pub const DISTANCE_LONG_NAME: &str = "distance to nearest neighbour";

/// Where, if anywhere, a computed distance field is written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Persistence {
    /// Keep the field in memory only.
    #[default]
    None,
    /// A directory without a file stem: the directory is created, a warning is
    /// logged and nothing is written.
    Directory(PathBuf),
    /// Write `{directory}/{stem}_{YYYY}-{MM}.nc`.
    Dated { directory: PathBuf, stem: String },
}

impl Persistence {
    /// File name for a field stamped at `time`, if this persistence writes one.
    pub fn file_path(&self, time: &DateTime<Utc>) -> Option<PathBuf> {
        match self {
            Self::Dated { directory, stem } => Some(directory.join(format!(
                "{}_{}-{:02}.nc",
                stem,
                time.year(),
                time.month()
            ))),
            _ => None,
        }
    }

    fn directory(&self) -> Option<&Path> {
        match self {
            Self::None => None,
            Self::Directory(directory) | Self::Dated { directory, .. } => Some(directory),
        }
    }
}

/// Grid cells to measure from, as row-major `(lat, lon)` pairs in degrees.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetGrid {
    shape: (usize, usize),
    points: Vec<(f64, f64)>,
}

impl TargetGrid {
    /// Wrap `ny * nx` row-major points.
    pub fn new(shape: (usize, usize), points: Vec<(f64, f64)>) -> Result<Self> {
        if points.len() != shape.0 * shape.1 {
            return Err(ProcessorError::shape_mismatch(format!(
                "{} target points for a {}x{} grid",
                points.len(),
                shape.0,
                shape.1
            )));
        }
        Ok(Self { shape, points })
    }

    /// Every (y, x) cell of a field's horizontal grid.
    pub fn from_field(field: &GriddedField) -> Result<Self> {
        let (_, y) = field
            .axis_by_role(AxisRole::Y)
            .ok_or_else(|| FieldError::MissingAxis(field.kind.y_axis().to_string()))?;
        let (_, x) = field
            .axis_by_role(AxisRole::X)
            .ok_or_else(|| FieldError::MissingAxis(field.kind.x_axis().to_string()))?;
        let (lats, lons) = (y.numeric()?, x.numeric()?);

        let points = lats
            .iter()
            .flat_map(|&lat| lons.iter().map(move |&lon| (lat, lon)))
            .collect();
        Self::new((lats.len(), lons.len()), points)
    }

    pub fn shape(&self) -> (usize, usize) {
        self.shape
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Computes distance-to-edge fields.
#[derive(Debug, Clone, Default)]
pub struct DistanceEngine {
    config: DistanceConfig,
}

impl DistanceEngine {
    pub fn new(config: DistanceConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DistanceConfig {
        &self.config
    }

    /// Distance in km from each target cell to the nearest edge point of a
    /// single-time-step reference field.
    ///
    /// The output is `(time=1, y, x)` on the reference field's coordinates,
    /// named `dist_km` with `units="km"`.
    pub fn compute(
        &self,
        reference: &GriddedField,
        targets: &TargetGrid,
        persistence: &Persistence,
    ) -> Result<GriddedField> {
        let curve = extract_edge_curve(reference)?;

        let (_, time_axis) = reference
            .axis_by_role(AxisRole::Time)
            .ok_or_else(|| FieldError::MissingAxis(ocean_common::names::TIME.to_string()))?;
        let (_, y_axis) = reference
            .axis_by_role(AxisRole::Y)
            .ok_or_else(|| FieldError::MissingAxis(reference.kind.y_axis().to_string()))?;
        let (_, x_axis) = reference
            .axis_by_role(AxisRole::X)
            .ok_or_else(|| FieldError::MissingAxis(reference.kind.x_axis().to_string()))?;

        let (ny, nx) = (y_axis.len(), x_axis.len());
        if targets.shape() != (ny, nx) {
            return Err(ProcessorError::shape_mismatch(format!(
                "target grid {:?} does not match reference grid ({}, {})",
                targets.shape(),
                ny,
                nx
            )));
        }

        let index = HaversineIndex::new(&curve.points);
        let radius = self.config.earth_radius_km;

        let mut distances = Array3::<f32>::from_elem((1, ny, nx), f32::NAN);
        for (cell, &(lat, lon)) in targets.points().iter().enumerate() {
            if let Some(hit) = index.nearest(lat, lon) {
                distances[[0, cell / nx, cell % nx]] = (hit.angle * radius) as f32;
            }
        }

        let axes: Vec<Axis> = vec![time_axis.clone(), y_axis.clone(), x_axis.clone()];
        let field = GriddedField::new(DISTANCE_VARIABLE, reference.kind, axes, distances.into_dyn())?
            .with_convention(reference.convention)
            .with_attr("units", "km")
            .with_attr("long_name", DISTANCE_LONG_NAME);

        debug!(
            reference = %reference.name,
            time = %curve.time,
            edge_points = index.len(),
            cells = targets.len(),
            "Computed distance to edge"
        );

        persist(&field, &curve.time, persistence)?;
        Ok(field)
    }
}

/// Apply a persistence choice to a computed field. Returns the written path.
pub fn persist(
    field: &GriddedField,
    time: &DateTime<Utc>,
    persistence: &Persistence,
) -> Result<Option<PathBuf>> {
    if let Some(directory) = persistence.directory() {
        std::fs::create_dir_all(directory)?;
    }

    match persistence {
        Persistence::None => Ok(None),
        Persistence::Directory(directory) => {
            warn!(
                directory = %directory.display(),
                variable = %field.name,
                "No file stem given; distance field not written"
            );
            Ok(None)
        }
        Persistence::Dated { .. } => {
            let Some(path) = persistence.file_path(time) else {
                return Ok(None);
            };
            netcdf_io::write_field(&path, field)?;
            info!(path = %path.display(), variable = %field.name, "Wrote distance field");
            Ok(Some(path))
        }
    }
}
