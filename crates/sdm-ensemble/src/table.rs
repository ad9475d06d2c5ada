//! Per-model prediction tables read from CSV.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Result, SdmError};
use crate::grid::{cell_key, CellKey, GridSample};

/// One CSV row. Columns other than these four are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub yt_ocean: f64,
    pub xt_ocean: f64,
    /// Predicted value; an empty field reads as missing.
    pub pred: Option<f64>,
    pub month: u32,
}

/// A prediction placed on the target grid.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionRow {
    pub lat: f64,
    pub lon: f64,
    pub month: u32,
    pub model: String,
    /// `None` where the model gave no prediction for the cell.
    pub pred: Option<f64>,
}

/// Rows of one or more models.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PredictionTable {
    pub rows: Vec<PredictionRow>,
}

impl PredictionTable {
    /// Align raw records of one model onto every `(month, cell)` of `grid`.
    ///
    /// Records off the grid or outside `months` are dropped; cells without a
    /// record keep a missing prediction. A cell predicted twice for the same
    /// month is an error.
    pub fn from_records(
        model: &str,
        records: impl IntoIterator<Item = PredictionRecord>,
        grid: &GridSample,
        months: &[u32],
    ) -> Result<Self> {
        let mut by_cell: HashMap<(u32, CellKey), Option<f64>> = HashMap::new();
        for record in records {
            let key = (record.month, cell_key(record.yt_ocean, record.xt_ocean));
            if by_cell.insert(key, record.pred).is_some() {
                return Err(SdmError::shape_mismatch(format!(
                    "{} predicts ({}, {}) twice in month {}",
                    model, record.yt_ocean, record.xt_ocean, record.month
                )));
            }
        }

        let mut rows = Vec::with_capacity(months.len() * grid.len());
        for &month in months {
            for (lat, lon) in grid.cells() {
                rows.push(PredictionRow {
                    lat,
                    lon,
                    month,
                    model: model.to_string(),
                    pred: by_cell.get(&(month, cell_key(lat, lon))).copied().flatten(),
                });
            }
        }

        Ok(Self { rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Append the rows of another table.
    pub fn extend(&mut self, other: PredictionTable) {
        self.rows.extend(other.rows);
    }
}

/// Read a model's prediction CSV and align it onto `grid` for `months`.
pub fn load_predictions<P: AsRef<Path>>(
    path: P,
    model: &str,
    grid: &GridSample,
    months: &[u32],
) -> Result<PredictionTable> {
    let path = path.as_ref();
    let mut reader = csv::Reader::from_path(path)?;
    let records = reader
        .deserialize()
        .collect::<std::result::Result<Vec<PredictionRecord>, csv::Error>>()?;
    debug!(path = %path.display(), model = model, records = records.len(), "Read prediction CSV");

    let table = PredictionTable::from_records(model, records, grid, months)?;
    let predicted = table.rows.iter().filter(|r| r.pred.is_some()).count();
    info!(
        model = model,
        rows = table.len(),
        predicted = predicted,
        "Loaded SDM predictions"
    );
    Ok(table)
}
