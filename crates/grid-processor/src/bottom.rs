//! Vertical reduction of depth-resolved fields to their bottom layer.

use ndarray::{Array2, Array3, Axis as NdAxis, Ix4};
use ocean_common::{AxisRole, GriddedField};
use tracing::debug;

use crate::error::{ProcessorError, Result};

/// Collapse a `(time, depth, y, x)` field to the value of its deepest valid level.
///
/// The valid-cell template comes from the first time step: the running count
/// of valid levels down each column peaks first at the deepest valid level,
/// and that level is read at every time step. A column with no valid level
/// in the template, or whose selected level is missing at a later step, gives
/// NaN rather than zero.
///
/// The input axes may be in any order; the output is `(time, y, x)` with the
/// name and attributes of the input. A field with no time steps gives an
/// empty `(0, y, x)` field.
pub fn extract_bottom_layer(field: &GriddedField) -> Result<GriddedField> {
    let time = role_axis(field, AxisRole::Time)?;
    let depth = role_axis(field, AxisRole::Depth)?;
    let y = role_axis(field, AxisRole::Y)?;
    let x = role_axis(field, AxisRole::X)?;

    let ordered = field.transpose_to(&[time.as_str(), depth.as_str(), y.as_str(), x.as_str()])?;
    let data = ordered
        .data()
        .view()
        .into_dimensionality::<Ix4>()
        .map_err(|e| ProcessorError::shape_mismatch(format!("{}: {}", field.name, e)))?;
    let (nt, nz, ny, nx) = data.dim();

    // No first step to take the template from: every column is empty.
    let bottom = if nt == 0 {
        Array2::from_elem((ny, nx), None)
    } else {
        bottom_levels(&data.index_axis(NdAxis(0), 0))
    };

    let mut out = Array3::<f32>::from_elem((nt, ny, nx), f32::NAN);
    for t in 0..nt {
        for j in 0..ny {
            for i in 0..nx {
                if let Some(k) = bottom[[j, i]] {
                    out[[t, j, i]] = data[[t, k, j, i]];
                }
            }
        }
    }

    let empty = bottom.iter().filter(|k| k.is_none()).count();
    debug!(
        variable = %field.name,
        levels = nz,
        cells = ny * nx,
        empty_columns = empty,
        "Extracted bottom layer"
    );

    let axes = [time.as_str(), y.as_str(), x.as_str()]
        .into_iter()
        .filter_map(|name| ordered.axis(name).cloned())
        .collect();
    let mut reduced = GriddedField::new(field.name.clone(), field.kind, axes, out.into_dyn())?
        .with_convention(field.convention);
    for (key, value) in field.attrs() {
        reduced.set_attr(key.clone(), value.clone());
    }
    for (name, coord) in field.aux_coords() {
        if !coord.dims.contains(&depth) {
            reduced = reduced.with_aux_coord(name.clone(), coord.clone())?;
        }
    }
    Ok(reduced)
}

/// Deepest valid level of each column of a `(depth, y, x)` slice.
///
/// A running count of valid levels is kept down each column; the bottom is
/// the first level where the count reaches its column maximum, restricted to
/// valid levels.
fn bottom_levels(slice: &ndarray::ArrayView3<f32>) -> Array2<Option<usize>> {
    let (nz, ny, nx) = slice.dim();
    let mut counts = vec![0usize; nz];

    Array2::from_shape_fn((ny, nx), |(j, i)| {
        let mut running = 0;
        for (k, count) in counts.iter_mut().enumerate() {
            if !slice[[k, j, i]].is_nan() {
                running += 1;
            }
            *count = running;
        }
        let max = counts.last().copied().unwrap_or(0);
        if max == 0 {
            return None;
        }
        (0..nz).find(|&k| counts[k] == max && !slice[[k, j, i]].is_nan())
    })
}

fn role_axis(field: &GriddedField, role: AxisRole) -> Result<String> {
    field
        .axis_by_role(role)
        .map(|(_, axis)| axis.name.clone())
        .ok_or_else(|| {
            ProcessorError::shape_mismatch(format!(
                "{} has no {:?} axis; expected (time, depth, y, x)",
                field.name, role
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use ocean_common::{names, Axis, GridKind};

    fn profile(values: Vec<f32>, nt: usize, nz: usize) -> GriddedField {
        let t0 = Utc.with_ymd_and_hms(2010, 1, 1, 12, 0, 0).unwrap();
        GriddedField::from_vec(
            "temp",
            GridKind::CellCenter,
            vec![
                Axis::time((0..nt as i64).map(|d| t0 + Duration::days(d)).collect()),
                Axis::levels(names::ST_OCEAN, (0..nz).map(|k| 10.0 * (k + 1) as f64).collect()),
                Axis::degrees(names::YT_OCEAN, AxisRole::Y, vec![-70.0]),
                Axis::degrees(names::XT_OCEAN, AxisRole::X, vec![0.0, 1.0]),
            ],
            values,
        )
        .unwrap()
        .with_attr("units", "degrees C")
    }

    #[test]
    fn test_deepest_valid_value_selected() {
        // Column 0 valid at levels 0..=2, column 1 valid at 0..=1.
        let nan = f32::NAN;
        let field = profile(vec![1.0, 5.0, 2.0, 6.0, 3.0, nan, nan, nan], 1, 4);
        let bottom = extract_bottom_layer(&field).unwrap();

        assert_eq!(bottom.shape(), &[1, 1, 2]);
        assert_eq!(bottom.get(&[0, 0, 0]), Some(3.0));
        assert_eq!(bottom.get(&[0, 0, 1]), Some(6.0));
        assert_eq!(bottom.attr("units"), Some("degrees C"));
        assert!(bottom.axis(names::ST_OCEAN).is_none());
    }

    #[test]
    fn test_all_missing_column_is_nan() {
        let nan = f32::NAN;
        let field = profile(vec![1.0, nan, 2.0, nan], 1, 2);
        let bottom = extract_bottom_layer(&field).unwrap();
        assert_eq!(bottom.get(&[0, 0, 0]), Some(2.0));
        assert!(bottom.get(&[0, 0, 1]).unwrap().is_nan());
    }

    #[test]
    fn test_template_from_first_step() {
        let nan = f32::NAN;
        // t0: column 0 bottom at level 1; t1 has the same mask.
        let field = profile(vec![1.0, 1.0, 2.0, nan, 10.0, 10.0, 20.0, nan], 2, 2);
        let bottom = extract_bottom_layer(&field).unwrap();
        assert_eq!(bottom.get(&[0, 0, 0]), Some(2.0));
        assert_eq!(bottom.get(&[1, 0, 0]), Some(20.0));
        assert_eq!(bottom.get(&[1, 0, 1]), Some(10.0));
    }

    #[test]
    fn test_gap_above_bottom() {
        let nan = f32::NAN;
        // Column 0: valid, missing, valid -> bottom is level 2.
        let field = profile(vec![1.0, 0.0, nan, 0.0, 3.0, nan], 1, 3);
        let bottom = extract_bottom_layer(&field).unwrap();
        assert_eq!(bottom.get(&[0, 0, 0]), Some(3.0));
        assert_eq!(bottom.get(&[0, 0, 1]), Some(0.0));
    }

    #[test]
    fn test_axis_order_restored() {
        let field = profile(vec![1.0, 2.0, 3.0, 4.0], 1, 2)
            .transpose_to(&[names::ST_OCEAN, names::XT_OCEAN, names::TIME, names::YT_OCEAN])
            .unwrap();
        let bottom = extract_bottom_layer(&field).unwrap();
        let order: Vec<&str> = bottom.axis_names().collect();
        assert_eq!(order, vec![names::TIME, names::YT_OCEAN, names::XT_OCEAN]);
        assert_eq!(bottom.get(&[0, 0, 1]), Some(4.0));
    }

    #[test]
    fn test_no_time_steps_gives_empty_layer() {
        let field = profile(vec![], 0, 2);
        let bottom = extract_bottom_layer(&field).unwrap();
        assert_eq!(bottom.shape(), &[0, 1, 2]);
        assert_eq!(bottom.times().unwrap().len(), 0);
    }

    #[test]
    fn test_requires_depth_axis() {
        let field = GriddedField::from_vec(
            "sst",
            GridKind::CellCenter,
            vec![Axis::degrees(names::XT_OCEAN, AxisRole::X, vec![0.0])],
            vec![1.0],
        )
        .unwrap();
        assert!(matches!(
            extract_bottom_layer(&field),
            Err(ProcessorError::ShapeMismatch(_))
        ));
    }
}
