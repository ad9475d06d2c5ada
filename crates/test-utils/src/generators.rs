//! Synthetic ocean and sea-ice fields with predictable values.
//!
//! Every generator takes a closure computing the value at an index, so a test
//! can assert on exact cells without building arrays by hand.

use chrono::{DateTime, Duration, TimeZone, Utc};
use ocean_common::{names, Axis, AxisRole, GridKind, GriddedField, TimeConvention};

/// `n` daily timestamps at 00:00 starting on the given date.
///
/// # Example
///
/// ```
/// use test_utils::daily_times;
///
/// let times = daily_times(2010, 1, 1, 2);
/// assert_eq!(times.len(), 2);
/// assert_eq!(times[1].to_rfc3339(), "2010-01-02T00:00:00+00:00");
/// ```
pub fn daily_times(year: i32, month: u32, day: u32, n: usize) -> Vec<DateTime<Utc>> {
    let start = Utc
        .with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .unwrap_or_else(|| panic!("invalid date {}-{}-{}", year, month, day));
    (0..n as i64).map(|i| start + Duration::days(i)).collect()
}

/// Evenly spaced values from `start` with step `step`.
pub fn linspace(start: f64, step: f64, n: usize) -> Vec<f64> {
    (0..n).map(|i| start + step * i as f64).collect()
}

/// Closed-form haversine distance in km on a 6371 km sphere, for checking results.
pub fn haversine_reference(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let (p1, p2) = (lat1.to_radians(), lat2.to_radians());
    let dp = p2 - p1;
    let dl = (lon2 - lon1).to_radians();
    let h = (dp / 2.0).sin().powi(2) + p1.cos() * p2.cos() * (dl / 2.0).sin().powi(2);
    2.0 * 6371.0 * h.sqrt().asin()
}

/// Static ocean cell-centre field on `(yt_ocean, xt_ocean)`.
pub fn ocean_static(
    name: &str,
    lats: &[f64],
    lons: &[f64],
    value: impl Fn(usize, usize) -> f32,
) -> GriddedField {
    let mut data = Vec::with_capacity(lats.len() * lons.len());
    for j in 0..lats.len() {
        for i in 0..lons.len() {
            data.push(value(j, i));
        }
    }
    GriddedField::from_vec(
        name,
        GridKind::CellCenter,
        vec![
            Axis::degrees(names::YT_OCEAN, AxisRole::Y, lats.to_vec()),
            Axis::degrees(names::XT_OCEAN, AxisRole::X, lons.to_vec()),
        ],
        data,
    )
    .expect("valid static ocean field")
}

/// Ocean surface field on `(time, y, x)` of the given grid kind.
pub fn ocean_surface(
    name: &str,
    kind: GridKind,
    times: Vec<DateTime<Utc>>,
    lats: &[f64],
    lons: &[f64],
    value: impl Fn(usize, usize, usize) -> f32,
) -> GriddedField {
    let mut data = Vec::with_capacity(times.len() * lats.len() * lons.len());
    for t in 0..times.len() {
        for j in 0..lats.len() {
            for i in 0..lons.len() {
                data.push(value(t, j, i));
            }
        }
    }
    GriddedField::from_vec(
        name,
        kind,
        vec![
            Axis::time(times),
            Axis::degrees(kind.y_axis(), AxisRole::Y, lats.to_vec()),
            Axis::degrees(kind.x_axis(), AxisRole::X, lons.to_vec()),
        ],
        data,
    )
    .expect("valid ocean surface field")
}

/// Full-depth ocean field on `(time, st_ocean, yt_ocean, xt_ocean)`.
///
/// The closure receives `(t, k, j, i)`; return NaN for cells below the sea floor.
pub fn ocean_profile(
    name: &str,
    times: Vec<DateTime<Utc>>,
    depths: &[f64],
    lats: &[f64],
    lons: &[f64],
    value: impl Fn(usize, usize, usize, usize) -> f32,
) -> GriddedField {
    let mut data = Vec::with_capacity(times.len() * depths.len() * lats.len() * lons.len());
    for t in 0..times.len() {
        for k in 0..depths.len() {
            for j in 0..lats.len() {
                for i in 0..lons.len() {
                    data.push(value(t, k, j, i));
                }
            }
        }
    }
    GriddedField::from_vec(
        name,
        GridKind::CellCenter,
        vec![
            Axis::time(times),
            Axis::levels(names::ST_OCEAN, depths.to_vec()),
            Axis::degrees(names::YT_OCEAN, AxisRole::Y, lats.to_vec()),
            Axis::degrees(names::XT_OCEAN, AxisRole::X, lons.to_vec()),
        ],
        data,
    )
    .expect("valid ocean profile field")
}

/// Sea-ice field on its native `(time, nj, ni)` index grid, ice-registered times.
pub fn ice_native(
    name: &str,
    times: Vec<DateTime<Utc>>,
    nj: usize,
    ni: usize,
    value: impl Fn(usize, usize, usize) -> f32,
) -> GriddedField {
    let mut data = Vec::with_capacity(times.len() * nj * ni);
    for t in 0..times.len() {
        for j in 0..nj {
            for i in 0..ni {
                data.push(value(t, j, i));
            }
        }
    }
    GriddedField::from_vec(
        name,
        GridKind::IceNative,
        vec![
            Axis::time(times),
            Axis::index(names::NJ, AxisRole::Y, nj),
            Axis::index(names::NI, AxisRole::X, ni),
        ],
        data,
    )
    .expect("valid sea-ice field")
    .with_convention(TimeConvention::Ice)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ocean_profile_layout() {
        let field = ocean_profile(
            "temp",
            daily_times(2010, 1, 1, 1),
            &[5.0, 15.0],
            &[-80.0],
            &[0.0, 1.0],
            |_, k, _, i| (k * 10 + i) as f32,
        );
        assert_eq!(field.shape(), &[1, 2, 1, 2]);
        assert_eq!(field.get(&[0, 1, 0, 1]), Some(11.0));
    }

    #[test]
    fn test_ice_native_convention() {
        let field = ice_native("aice", daily_times(2010, 1, 1, 2), 2, 3, |_, _, _| 1.0);
        assert_eq!(field.convention, TimeConvention::Ice);
        assert_eq!(field.kind, GridKind::IceNative);
        assert_eq!(field.shape(), &[2, 2, 3]);
    }

    #[test]
    fn test_haversine_reference_one_degree_of_latitude() {
        let d = haversine_reference(-80.0, 0.0, -79.0, 0.0);
        assert!((d - 111.194_93).abs() < 1e-3);
    }

    #[test]
    fn test_linspace() {
        assert_eq!(linspace(-80.0, 0.5, 3), vec![-80.0, -79.5, -79.0]);
    }
}
