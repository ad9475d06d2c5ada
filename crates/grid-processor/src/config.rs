//! Configuration for the preparation pipeline.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::distance::Persistence;
use crate::error::{ProcessorError, Result};

/// Default model experiment.
pub const DEFAULT_EXPERIMENT: &str = "01deg_jra55v140_iaf_cycle4";

/// Mean Earth radius used for great-circle distances.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Top-level pipeline configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Root directory of a NetCDF catalog, if reading from disk.
    pub catalog_root: Option<PathBuf>,

    pub reconciler: ReconcilerConfig,

    pub distance: DistanceConfig,
}

/// Settings for the Coordinate Reconciler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcilerConfig {
    /// Experiment every fetch is made against.
    pub experiment: String,

    /// Static ocean variable whose coordinates ice fields are mapped onto.
    pub reference_variable: String,

    /// Southern edge of the default latitude band (inclusive).
    pub min_lat: f64,

    /// Northern edge of the default latitude band (inclusive).
    pub max_lat: f64,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            experiment: DEFAULT_EXPERIMENT.to_string(),
            reference_variable: "area_t".to_string(),
            min_lat: -90.0,
            max_lat: -45.0,
        }
    }
}

/// Settings for the Geodesic Distance Engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistanceConfig {
    pub earth_radius_km: f64,

    /// Directory for dated distance files.
    pub output_dir: Option<PathBuf>,

    /// File name stem; without it nothing is written.
    pub file_stem: Option<String>,
}

impl Default for DistanceConfig {
    fn default() -> Self {
        Self {
            earth_radius_km: EARTH_RADIUS_KM,
            output_dir: None,
            file_stem: None,
        }
    }
}

impl DistanceConfig {
    /// Persistence implied by the configured directory and stem.
    pub fn persistence(&self) -> Persistence {
        match (&self.output_dir, &self.file_stem) {
            (None, _) => Persistence::None,
            (Some(directory), None) => Persistence::Directory(directory.clone()),
            (Some(directory), Some(stem)) => Persistence::Dated {
                directory: directory.clone(),
                stem: stem.clone(),
            },
        }
    }
}

impl PipelineConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Load configuration from a YAML file. Missing keys take their defaults.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&content)
            .map_err(|e| ProcessorError::config(format!("{}: {}", path.display(), e)))
    }

    /// Override fields from `SO_*` environment variables.
    pub fn apply_env(&mut self) {
        if let Ok(val) = std::env::var("SO_CATALOG_ROOT") {
            self.catalog_root = Some(PathBuf::from(val));
        }

        if let Ok(val) = std::env::var("SO_EXPERIMENT") {
            self.reconciler.experiment = val;
        }

        if let Ok(val) = std::env::var("SO_REFERENCE_VARIABLE") {
            self.reconciler.reference_variable = val;
        }

        if let Ok(val) = std::env::var("SO_MIN_LAT") {
            if let Ok(lat) = val.parse() {
                self.reconciler.min_lat = lat;
            }
        }

        if let Ok(val) = std::env::var("SO_MAX_LAT") {
            if let Ok(lat) = val.parse() {
                self.reconciler.max_lat = lat;
            }
        }

        if let Ok(val) = std::env::var("SO_EARTH_RADIUS_KM") {
            if let Ok(radius) = val.parse() {
                self.distance.earth_radius_km = radius;
            }
        }

        if let Ok(val) = std::env::var("SO_OUTPUT_DIR") {
            self.distance.output_dir = Some(PathBuf::from(val));
        }

        if let Ok(val) = std::env::var("SO_FILE_STEM") {
            self.distance.file_stem = Some(val);
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> std::result::Result<(), String> {
        self.reconciler.validate()?;
        self.distance.validate()
    }
}

impl ReconcilerConfig {
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.experiment.is_empty() {
            return Err("experiment must not be empty".to_string());
        }

        if self.reference_variable.is_empty() {
            return Err("reference_variable must not be empty".to_string());
        }

        if !(-90.0..=90.0).contains(&self.min_lat) || !(-90.0..=90.0).contains(&self.max_lat) {
            return Err("latitude band must lie within [-90, 90]".to_string());
        }

        if self.min_lat > self.max_lat {
            return Err("min_lat must be <= max_lat".to_string());
        }

        Ok(())
    }
}

impl DistanceConfig {
    pub fn validate(&self) -> std::result::Result<(), String> {
        if !(self.earth_radius_km > 0.0) {
            return Err("earth_radius_km must be > 0".to_string());
        }

        if matches!(&self.file_stem, Some(stem) if stem.is_empty()) {
            return Err("file_stem must not be empty".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.reconciler.experiment, DEFAULT_EXPERIMENT);
        assert_eq!(config.reconciler.reference_variable, "area_t");
        assert_eq!(config.reconciler.min_lat, -90.0);
        assert_eq!(config.reconciler.max_lat, -45.0);
        assert_eq!(config.distance.earth_radius_km, 6371.0);
        assert_eq!(config.distance.persistence(), Persistence::None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = PipelineConfig::default();
        config.reconciler.min_lat = -40.0;
        assert!(config.validate().is_err());

        config = PipelineConfig::default();
        config.reconciler.max_lat = 95.0;
        assert!(config.validate().is_err());

        config = PipelineConfig::default();
        config.distance.earth_radius_km = 0.0;
        assert!(config.validate().is_err());

        config = PipelineConfig::default();
        config.distance.file_stem = Some(String::new());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_persistence_from_config() {
        let mut distance = DistanceConfig {
            output_dir: Some(PathBuf::from("/tmp/out")),
            ..Default::default()
        };
        assert_eq!(
            distance.persistence(),
            Persistence::Directory(PathBuf::from("/tmp/out"))
        );

        distance.file_stem = Some("ice_edge".to_string());
        assert_eq!(
            distance.persistence(),
            Persistence::Dated {
                directory: PathBuf::from("/tmp/out"),
                stem: "ice_edge".to_string(),
            }
        );
    }

    #[test]
    fn test_yaml_partial_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pipeline.yaml");
        std::fs::write(
            &path,
            "reconciler:\n  max_lat: -50.0\ndistance:\n  file_stem: dist_ice\n",
        )
        .unwrap();

        let config = PipelineConfig::from_yaml_file(&path).unwrap();
        assert_eq!(config.reconciler.max_lat, -50.0);
        assert_eq!(config.reconciler.min_lat, -90.0);
        assert_eq!(config.distance.file_stem.as_deref(), Some("dist_ice"));
    }

    #[test]
    fn test_yaml_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.yaml");
        std::fs::write(&path, "reconciler: [1, 2").unwrap();
        assert!(matches!(
            PipelineConfig::from_yaml_file(&path),
            Err(ProcessorError::ConfigError(_))
        ));
    }
}
