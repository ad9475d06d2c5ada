//! Catalog over a directory tree of NetCDF model output.
//!
//! Layout: `{root}/{experiment}/**/*.nc`. Each file's variables and global
//! `frequency` attribute are indexed once at open; a fetch reads every file
//! holding the variable at the requested frequency and joins them along time.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use ocean_common::{AxisRole, GriddedField};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::{CatalogError, Result};
use crate::request::VariableRequest;
use crate::source::{apply_request, concat_time, GridSource};

#[derive(Debug, Clone)]
struct IndexedFile {
    path: PathBuf,
    variables: Vec<String>,
    frequency: Option<String>,
}

/// A [`GridSource`] reading NetCDF files under a root directory.
#[derive(Debug, Clone)]
pub struct NetcdfCatalog {
    root: PathBuf,
    experiments: BTreeMap<String, Vec<IndexedFile>>,
}

impl NetcdfCatalog {
    /// Index every `.nc` file below `root`, grouped by top-level directory.
    ///
    /// Files that cannot be opened are skipped with a warning.
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        if !root.is_dir() {
            return Err(CatalogError::InvalidRequest(format!(
                "catalog root {} is not a directory",
                root.display()
            )));
        }

        let mut experiments: BTreeMap<String, Vec<IndexedFile>> = BTreeMap::new();
        for entry in WalkDir::new(&root).min_depth(2).sort_by_file_name() {
            let entry = entry.map_err(|e| CatalogError::Read(e.to_string()))?;
            let path = entry.path();
            if !entry.file_type().is_file()
                || path.extension().and_then(|e| e.to_str()) != Some("nc")
            {
                continue;
            }

            let Some(experiment) = path
                .strip_prefix(&root)
                .ok()
                .and_then(|rel| rel.components().next())
                .and_then(|c| c.as_os_str().to_str())
            else {
                continue;
            };

            match netcdf_io::inspect(path) {
                Ok(summary) => {
                    experiments
                        .entry(experiment.to_string())
                        .or_default()
                        .push(IndexedFile {
                            path: path.to_path_buf(),
                            variables: summary.variables,
                            frequency: summary.frequency,
                        });
                }
                Err(e) => warn!(path = %path.display(), error = %e, "Skipping unreadable file"),
            }
        }

        info!(
            root = %root.display(),
            experiments = experiments.len(),
            files = experiments.values().map(Vec::len).sum::<usize>(),
            "Indexed NetCDF catalog"
        );

        Ok(Self { root, experiments })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Names of the indexed experiments.
    pub fn experiments(&self) -> impl Iterator<Item = &str> {
        self.experiments.keys().map(String::as_str)
    }

    fn files_for<'a>(&'a self, request: &'a VariableRequest) -> impl Iterator<Item = &'a Path> {
        self.experiments
            .get(&request.experiment)
            .into_iter()
            .flatten()
            .filter(move |f| {
                f.variables.iter().any(|v| *v == request.variable)
                    && request.matches_frequency(f.frequency.as_deref())
            })
            .map(|f| f.path.as_path())
    }
}

impl GridSource for NetcdfCatalog {
    fn fetch(&self, request: &VariableRequest) -> Result<GriddedField> {
        let paths: Vec<&Path> = self.files_for(request).collect();
        if paths.is_empty() {
            return Err(CatalogError::no_data(request));
        }

        let mut parts = Vec::with_capacity(paths.len());
        for path in &paths {
            let part = netcdf_io::read_field(path, &request.variable, request.decode_coords)?;
            // A variable without a time axis is the same in every file.
            if part.axis_by_role(AxisRole::Time).is_none() {
                parts = vec![part];
                break;
            }
            parts.push(part);
        }

        debug!(request = %request, files = parts.len(), "Read variable from catalog");
        apply_request(concat_time(parts)?, request)
    }
}
