//! Common test fixtures: a small Southern Ocean grid and catalogs serving it.

use std::path::{Path, PathBuf};

use catalog::MemoryCatalog;
use ocean_common::{GridKind, GriddedField};
use tempfile::TempDir;

use crate::generators::{daily_times, ice_native, ocean_profile, ocean_static, ocean_surface};

/// Experiment name used by every fixture.
pub const EXPERIMENT: &str = "01deg_jra55v140_iaf_cycle4";

/// Daily output frequency label.
pub const DAILY: &str = "1 daily";

/// Latitudes of the fixture grid (both inside the default band).
pub const LATS: [f64; 2] = [-80.0, -79.0];

/// Longitudes of the fixture grid.
pub const LONS: [f64; 2] = [0.0, 1.0];

/// Depth levels of the fixture profile.
pub const DEPTHS: [f64; 3] = [5.0, 50.0, 500.0];

/// Cell area on the fixture grid.
pub fn area_t() -> GriddedField {
    ocean_static("area_t", &LATS, &LONS, |_, _| 1.0e8)
}

/// Sea-ice concentration for 2010-01-01 and 2010-01-02 (ice-registered).
///
/// Concentration is 1.0 in the southern row and 0.0 in the northern row.
pub fn aice() -> GriddedField {
    ice_native("aice", daily_times(2010, 1, 1, 2), 2, 2, |_, j, _| {
        if j == 0 {
            1.0
        } else {
            0.0
        }
    })
}

/// Potential temperature with a shallower sea floor in the eastern column.
///
/// The western column has all three levels; the eastern column only the top two.
/// Values encode `100 * t + 10 * k + i`.
pub fn temp() -> GriddedField {
    ocean_profile(
        "temp",
        daily_times(2010, 1, 1, 2)
            .into_iter()
            .map(|t| t + chrono::Duration::hours(12))
            .collect(),
        &DEPTHS,
        &LATS,
        &LONS,
        |t, k, _, i| {
            if i == 1 && k == 2 {
                f32::NAN
            } else {
                (100 * t + 10 * k + i) as f32
            }
        },
    )
}

/// Surface zonal velocity on the u-grid.
pub fn u() -> GriddedField {
    ocean_surface(
        "u",
        GridKind::UPoint,
        daily_times(2010, 1, 1, 1),
        &LATS,
        &LONS,
        |_, j, i| (j + i) as f32,
    )
}

/// A catalog serving every fixture field under [`EXPERIMENT`].
pub fn fixture_catalog() -> MemoryCatalog {
    MemoryCatalog::new()
        .with_field(EXPERIMENT, None, area_t())
        .with_field(EXPERIMENT, Some(DAILY), aice())
        .with_field(EXPERIMENT, Some(DAILY), temp())
        .with_field(EXPERIMENT, Some(DAILY), u())
}

/// Write a field into `{root}/{experiment}/{file_name}` as NetCDF.
pub fn write_catalog_file(
    root: &Path,
    experiment: &str,
    file_name: &str,
    frequency: Option<&str>,
    field: &GriddedField,
) -> PathBuf {
    let dir = root.join(experiment);
    std::fs::create_dir_all(&dir).expect("create experiment directory");
    let path = dir.join(file_name);
    let globals: Vec<(&str, &str)> = frequency.map(|f| ("frequency", f)).into_iter().collect();
    netcdf_io::write_field_with(&path, field, &globals).expect("write fixture file");
    path
}

/// A temporary directory laid out like [`fixture_catalog`], one file per
/// variable, with `aice` split into one file per day.
pub fn fixture_tree() -> TempDir {
    let dir = tempfile::tempdir().expect("create temp dir");
    let root = dir.path();

    write_catalog_file(root, EXPERIMENT, "ocean_grid.nc", None, &area_t());
    write_catalog_file(root, EXPERIMENT, "ocean_daily.nc", Some(DAILY), &temp());

    let ice = aice();
    for day in 0..2 {
        let part = ice.select_indices(0, &[day]).expect("split ice by day");
        let name = format!("iceh.2010-01-0{}.nc", day + 1);
        write_catalog_file(root, EXPERIMENT, &name, Some(DAILY), &part);
    }

    dir
}
