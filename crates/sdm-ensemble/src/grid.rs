//! The target grid predictions are aligned to.

use std::collections::HashMap;

use ocean_common::{AxisRole, FieldError, GriddedField};

use crate::error::{Result, SdmError};

/// Exact-match key for a coordinate pair.
pub(crate) type CellKey = (u64, u64);

pub(crate) fn cell_key(lat: f64, lon: f64) -> CellKey {
    // -0.0 and 0.0 compare equal, so they must share a key.
    ((lat + 0.0).to_bits(), (lon + 0.0).to_bits())
}

/// The horizontal coordinates of a sample ocean field.
#[derive(Debug, Clone, PartialEq)]
pub struct GridSample {
    lats: Vec<f64>,
    lons: Vec<f64>,
    index: HashMap<CellKey, usize>,
}

impl GridSample {
    pub fn new(lats: Vec<f64>, lons: Vec<f64>) -> Result<Self> {
        let mut index = HashMap::with_capacity(lats.len() * lons.len());
        for (j, &lat) in lats.iter().enumerate() {
            for (i, &lon) in lons.iter().enumerate() {
                if index.insert(cell_key(lat, lon), j * lons.len() + i).is_some() {
                    return Err(SdmError::shape_mismatch(format!(
                        "grid repeats cell ({}, {})",
                        lat, lon
                    )));
                }
            }
        }
        Ok(Self { lats, lons, index })
    }

    /// Take the y/x coordinates of a two-dimensional field (extra axes ignored).
    pub fn from_field(field: &GriddedField) -> Result<Self> {
        let (_, y) = field
            .axis_by_role(AxisRole::Y)
            .ok_or_else(|| FieldError::MissingAxis(field.kind.y_axis().to_string()))?;
        let (_, x) = field
            .axis_by_role(AxisRole::X)
            .ok_or_else(|| FieldError::MissingAxis(field.kind.x_axis().to_string()))?;
        Self::new(y.numeric()?.to_vec(), x.numeric()?.to_vec())
    }

    pub fn lats(&self) -> &[f64] {
        &self.lats
    }

    pub fn lons(&self) -> &[f64] {
        &self.lons
    }

    /// `(ny, nx)`
    pub fn shape(&self) -> (usize, usize) {
        (self.lats.len(), self.lons.len())
    }

    pub fn len(&self) -> usize {
        self.lats.len() * self.lons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.lats
            .iter()
            .flat_map(move |&lat| self.lons.iter().map(move |&lon| (lat, lon)))
    }

    /// Row-major position of a cell, if it is on the grid.
    pub fn position(&self, lat: f64, lon: f64) -> Option<usize> {
        self.index.get(&cell_key(lat, lon)).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positions_are_row_major() {
        let grid = GridSample::new(vec![-70.0, -69.0], vec![10.0, 11.0, 12.0]).unwrap();
        assert_eq!(grid.shape(), (2, 3));
        assert_eq!(grid.position(-69.0, 10.0), Some(3));
        assert_eq!(grid.position(-69.0, 13.0), None);
        assert_eq!(grid.cells().nth(4), Some((-69.0, 11.0)));
    }

    #[test]
    fn test_signed_zero_matches() {
        let grid = GridSample::new(vec![-70.0], vec![0.0]).unwrap();
        assert_eq!(grid.position(-70.0, -0.0), Some(0));
    }
}
