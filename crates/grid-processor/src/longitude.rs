//! Longitude normalization to [-180, 180).

use ocean_common::{GriddedField, LongitudeRange};
use tracing::debug;

use crate::error::Result;

/// Map one longitude into [-180, 180).
pub fn wrap_longitude(lon: f64) -> f64 {
    (lon + 180.0).rem_euclid(360.0) - 180.0
}

/// Wrap the x axis of the field's grid into [-180, 180) and sort the field
/// ascending along it.
///
/// The sort is stable, so a field that is already normalized comes back
/// unchanged.
///
/// # Errors
///
/// Fails with [`FieldError::NonMonotonic`] when two longitudes wrap onto the
/// same value, e.g. an axis holding both -180 and 180. Also fails with
/// [`FieldError::MissingAxis`] when the field lacks the x axis of its grid kind.
///
/// [`FieldError::NonMonotonic`]: ocean_common::FieldError::NonMonotonic
/// [`FieldError::MissingAxis`]: ocean_common::FieldError::MissingAxis
pub fn normalize_longitude(field: &GriddedField) -> Result<GriddedField> {
    let x_axis = field.kind.x_axis();
    let before = field
        .axis(x_axis)
        .and_then(|a| a.values.as_numeric())
        .and_then(LongitudeRange::detect);
    let normalized = field.remap_axis(x_axis, wrap_longitude)?;
    debug!(variable = %field.name, axis = x_axis, from = ?before, "Normalized longitude");
    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProcessorError;
    use ocean_common::{names, Axis, AxisRole, FieldError, GridKind};

    fn field(kind: GridKind, lons: Vec<f64>) -> GriddedField {
        let n = lons.len();
        GriddedField::from_vec(
            "sst",
            kind,
            vec![
                Axis::degrees(kind.y_axis(), AxisRole::Y, vec![-60.0]),
                Axis::degrees(kind.x_axis(), AxisRole::X, lons),
            ],
            (0..n).map(|i| i as f32).collect(),
        )
        .unwrap()
    }

    fn lons(field: &GriddedField) -> Vec<f64> {
        field
            .axis(field.kind.x_axis())
            .unwrap()
            .numeric()
            .unwrap()
            .to_vec()
    }

    #[test]
    fn test_wrap_longitude() {
        assert_eq!(wrap_longitude(0.0), 0.0);
        assert_eq!(wrap_longitude(180.0), -180.0);
        assert_eq!(wrap_longitude(270.0), -90.0);
        assert_eq!(wrap_longitude(-280.0), 80.0);
        assert_eq!(wrap_longitude(359.5), -0.5);
    }

    #[test]
    fn test_normalize_reorders_values() {
        let normalized =
            normalize_longitude(&field(GridKind::CellCenter, vec![10.0, 190.0, 350.0])).unwrap();
        assert_eq!(lons(&normalized), vec![-170.0, -10.0, 10.0]);
        // Values follow their longitudes.
        assert_eq!(normalized.get(&[0, 0]), Some(1.0));
        assert_eq!(normalized.get(&[0, 1]), Some(2.0));
        assert_eq!(normalized.get(&[0, 2]), Some(0.0));
        assert_eq!(
            LongitudeRange::detect(&lons(&normalized)),
            Some(LongitudeRange::Signed180)
        );
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let once =
            normalize_longitude(&field(GridKind::CellCenter, vec![0.0, 90.0, 200.0, 300.0]))
                .unwrap();
        let twice = normalize_longitude(&once).unwrap();
        assert_eq!(lons(&once), lons(&twice));
        assert_eq!(once.data(), twice.data());
    }

    #[test]
    fn test_coinciding_longitudes_rejected() {
        let result = normalize_longitude(&field(GridKind::CellCenter, vec![-180.0, 0.0, 180.0]));
        assert!(matches!(
            result,
            Err(ProcessorError::Field(FieldError::NonMonotonic(ref axis))) if axis == names::XT_OCEAN
        ));
    }

    #[test]
    fn test_normalize_uses_u_grid_axis() {
        let normalized = normalize_longitude(&field(GridKind::UPoint, vec![100.0, 250.0])).unwrap();
        assert!(normalized.axis(names::XU_OCEAN).is_some());
        assert_eq!(lons(&normalized), vec![-110.0, 100.0]);
    }
}
