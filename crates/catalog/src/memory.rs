//! In-memory catalog, used by tests and by callers that already hold their data.

use std::collections::HashMap;

use ocean_common::GriddedField;
use tracing::debug;

use crate::error::{CatalogError, Result};
use crate::request::VariableRequest;
use crate::source::{apply_request, GridSource};

/// One stored variable.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub frequency: Option<String>,
    pub field: GriddedField,
}

/// A [`GridSource`] backed by fields held in memory.
///
/// Entries are keyed by `(experiment, variable)`; several frequencies of the
/// same variable may be registered side by side.
#[derive(Debug, Default, Clone)]
pub struct MemoryCatalog {
    entries: HashMap<(String, String), Vec<CatalogEntry>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a field under an experiment, keyed by its own name.
    pub fn register(
        &mut self,
        experiment: impl Into<String>,
        frequency: Option<&str>,
        field: GriddedField,
    ) {
        let key = (experiment.into(), field.name.clone());
        self.entries.entry(key).or_default().push(CatalogEntry {
            frequency: frequency.map(str::to_string),
            field,
        });
    }

    /// Builder form of [`MemoryCatalog::register`].
    pub fn with_field(
        mut self,
        experiment: impl Into<String>,
        frequency: Option<&str>,
        field: GriddedField,
    ) -> Self {
        self.register(experiment, frequency, field);
        self
    }

    /// Number of registered entries across all variables.
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl GridSource for MemoryCatalog {
    fn fetch(&self, request: &VariableRequest) -> Result<GriddedField> {
        let key = (request.experiment.clone(), request.variable.clone());
        let entry = self
            .entries
            .get(&key)
            .and_then(|entries| {
                entries
                    .iter()
                    .find(|e| request.matches_frequency(e.frequency.as_deref()))
            })
            .ok_or_else(|| CatalogError::no_data(request))?;

        debug!(request = %request, shape = ?entry.field.shape(), "Serving field from memory");
        apply_request(entry.field.clone(), request)
    }
}
