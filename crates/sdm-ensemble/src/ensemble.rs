//! Multi-model ensemble synthesis.

use chrono::Month;
use ocean_common::{names, Axis, AxisRole, Dataset, GridKind, GriddedField};
use tracing::{debug, info};

use crate::error::{Result, SdmError};
use crate::grid::GridSample;
use crate::table::{PredictionRow, PredictionTable};

/// Model label of the synthesized per-cell mean.
pub const ENSEMBLE_MODEL: &str = "Ensemble";

/// English name of a month number (1 = January).
pub fn month_name(month: u32) -> Result<&'static str> {
    let number = u8::try_from(month).map_err(|_| SdmError::InvalidMonth(month))?;
    Month::try_from(number)
        .map(|m| m.name())
        .map_err(|_| SdmError::InvalidMonth(month))
}

/// Merge per-model tables into one `(model, y, x)` field per month.
///
/// Months and models keep their first-seen order; the model axis ends with
/// `Ensemble`, the mean of the models at each cell ignoring missing values.
/// Each month must hold exactly one row per model and grid cell.
///
/// The dataset is keyed by month name (`"January"`, ...).
pub fn build_ensemble(tables: &[PredictionTable], grid: &GridSample) -> Result<Dataset> {
    let rows: Vec<&PredictionRow> = tables.iter().flat_map(|t| t.rows.iter()).collect();

    let mut months: Vec<u32> = Vec::new();
    for row in &rows {
        if !months.contains(&row.month) {
            months.push(row.month);
        }
    }

    let mut dataset = Dataset::new();
    for month in months {
        let name = month_name(month)?;
        let month_rows: Vec<&PredictionRow> =
            rows.iter().copied().filter(|r| r.month == month).collect();
        let field = month_field(name, &month_rows, grid)?;
        dataset.insert(name, field);
    }

    info!(
        tables = tables.len(),
        months = dataset.len(),
        cells = grid.len(),
        "Built SDM ensemble"
    );

    Ok(dataset)
}

fn month_field(name: &str, rows: &[&PredictionRow], grid: &GridSample) -> Result<GriddedField> {
    let mut models: Vec<&str> = Vec::new();
    for row in rows {
        if row.model == ENSEMBLE_MODEL {
            return Err(SdmError::InvalidModel(row.model.clone()));
        }
        if !models.contains(&row.model.as_str()) {
            models.push(&row.model);
        }
    }

    let cells = grid.len();
    if rows.len() != models.len() * cells {
        return Err(SdmError::shape_mismatch(format!(
            "{}: {} rows for {} models x {} cells",
            name,
            rows.len(),
            models.len(),
            cells
        )));
    }

    // Slots start unfilled so a duplicated row shows up as a double fill.
    let mut slots: Vec<Option<f32>> = vec![None; models.len() * cells];
    let mut filled = vec![false; models.len() * cells];
    for row in rows {
        let m = models
            .iter()
            .position(|model| *model == row.model)
            .ok_or_else(|| SdmError::InvalidModel(row.model.clone()))?;
        let cell = grid.position(row.lat, row.lon).ok_or_else(|| {
            SdmError::shape_mismatch(format!("{}: ({}, {}) is not on the grid", name, row.lat, row.lon))
        })?;
        let slot = m * cells + cell;
        if filled[slot] {
            return Err(SdmError::shape_mismatch(format!(
                "{}: {} has two rows at ({}, {})",
                name, row.model, row.lat, row.lon
            )));
        }
        filled[slot] = true;
        slots[slot] = row.pred.map(|p| p as f32);
    }

    let mut data: Vec<f32> = slots.iter().map(|v| v.unwrap_or(f32::NAN)).collect();
    for cell in 0..cells {
        let values: Vec<f32> = (0..models.len())
            .filter_map(|m| slots[m * cells + cell])
            .collect();
        data.push(if values.is_empty() {
            f32::NAN
        } else {
            values.iter().sum::<f32>() / values.len() as f32
        });
    }

    let mut labels: Vec<String> = models.iter().map(|m| m.to_string()).collect();
    labels.push(ENSEMBLE_MODEL.to_string());

    debug!(month = name, models = ?labels, "Assembled month");

    let field = GriddedField::from_vec(
        name,
        GridKind::CellCenter,
        vec![
            Axis::labels(names::MODEL, AxisRole::Model, labels),
            Axis::degrees(names::YT_OCEAN, AxisRole::Y, grid.lats().to_vec()),
            Axis::degrees(names::XT_OCEAN, AxisRole::X, grid.lons().to_vec()),
        ],
        data,
    )?;
    Ok(field)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_names() {
        assert_eq!(month_name(1).unwrap(), "January");
        assert_eq!(month_name(12).unwrap(), "December");
        assert!(matches!(month_name(0), Err(SdmError::InvalidMonth(0))));
        assert!(matches!(month_name(13), Err(SdmError::InvalidMonth(13))));
        assert!(matches!(month_name(300), Err(SdmError::InvalidMonth(300))));
    }

    fn row(model: &str, lat: f64, lon: f64, month: u32, pred: Option<f64>) -> PredictionRow {
        PredictionRow {
            lat,
            lon,
            month,
            model: model.to_string(),
            pred,
        }
    }

    #[test]
    fn test_mean_skips_missing() {
        let grid = GridSample::new(vec![-70.0], vec![0.0]).unwrap();
        let table = PredictionTable {
            rows: vec![
                row("GLM", -70.0, 0.0, 3, Some(0.2)),
                row("RF", -70.0, 0.0, 3, None),
                row("BRT", -70.0, 0.0, 3, Some(0.6)),
            ],
        };
        let dataset = build_ensemble(&[table], &grid).unwrap();
        let march = dataset.get("March").unwrap();
        assert_eq!(march.shape(), &[4, 1, 1]);
        assert!((march.get(&[3, 0, 0]).unwrap() - 0.4).abs() < 1e-6);
        assert!(march.get(&[1, 0, 0]).unwrap().is_nan());
    }

    #[test]
    fn test_reserved_model_name() {
        let grid = GridSample::new(vec![-70.0], vec![0.0]).unwrap();
        let table = PredictionTable {
            rows: vec![row(ENSEMBLE_MODEL, -70.0, 0.0, 1, Some(1.0))],
        };
        assert!(matches!(
            build_ensemble(&[table], &grid),
            Err(SdmError::InvalidModel(_))
        ));
    }

    #[test]
    fn test_duplicate_cell_rejected() {
        let grid = GridSample::new(vec![-70.0], vec![0.0, 1.0]).unwrap();
        let table = PredictionTable {
            rows: vec![
                row("GLM", -70.0, 0.0, 1, Some(1.0)),
                row("GLM", -70.0, 0.0, 1, Some(2.0)),
            ],
        };
        assert!(matches!(
            build_ensemble(&[table], &grid),
            Err(SdmError::ShapeMismatch(_))
        ));
    }
}
