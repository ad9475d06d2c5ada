//! Catalog backends serving the shared fixture grid.

use catalog::{CatalogError, GridSource, NetcdfCatalog, VariableRequest};
use chrono::{TimeZone, Utc};
use ocean_common::{names, GridKind, TimeConvention};
use test_utils::{fixture_catalog, fixture_tree, DAILY, EXPERIMENT};

#[test]
fn test_memory_snapshot_of_static_field() {
    let catalog = fixture_catalog();
    let area = catalog
        .fetch(&VariableRequest::new(EXPERIMENT, "area_t").snapshot(1))
        .unwrap();
    assert_eq!(area.shape(), &[2, 2]);
}

#[test]
fn test_memory_without_coord_decoding_drops_aux() {
    let catalog = fixture_catalog();
    let field = catalog
        .fetch(
            &VariableRequest::new(EXPERIMENT, "aice")
                .with_frequency(DAILY)
                .without_coord_decoding(),
        )
        .unwrap();
    assert!(field.aux_coords().is_empty());
    assert_eq!(field.convention, TimeConvention::Ice);
}

#[test]
fn test_netcdf_catalog_indexes_experiments() {
    let tree = fixture_tree();
    let catalog = NetcdfCatalog::open(tree.path()).unwrap();
    assert_eq!(catalog.experiments().collect::<Vec<_>>(), vec![EXPERIMENT]);
}

#[test]
fn test_netcdf_catalog_joins_daily_files() {
    let tree = fixture_tree();
    let catalog = NetcdfCatalog::open(tree.path()).unwrap();

    let aice = catalog
        .fetch(&VariableRequest::new(EXPERIMENT, "aice").with_frequency(DAILY))
        .unwrap();
    assert_eq!(aice.kind, GridKind::IceNative);
    assert_eq!(aice.shape(), &[2, 2, 2]);
    assert_eq!(
        aice.times().unwrap(),
        &[
            Utc.with_ymd_and_hms(2010, 1, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2010, 1, 2, 0, 0, 0).unwrap(),
        ]
    );
}

#[test]
fn test_netcdf_catalog_window() {
    let tree = fixture_tree();
    let catalog = NetcdfCatalog::open(tree.path()).unwrap();

    let request = VariableRequest::new(EXPERIMENT, "temp")
        .with_frequency(DAILY)
        .between(
            Utc.with_ymd_and_hms(2010, 1, 2, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2010, 1, 2, 23, 0, 0).unwrap(),
        );
    let temp = catalog.fetch(&request).unwrap();
    assert_eq!(temp.shape(), &[1, 3, 2, 2]);
    assert!(temp.axis(names::ST_OCEAN).is_some());
}

#[test]
fn test_netcdf_catalog_frequency_mismatch() {
    let tree = fixture_tree();
    let catalog = NetcdfCatalog::open(tree.path()).unwrap();

    let err = catalog
        .fetch(&VariableRequest::new(EXPERIMENT, "temp").with_frequency("1 monthly"))
        .unwrap_err();
    assert!(matches!(err, CatalogError::NoData { .. }));
}

#[test]
fn test_open_missing_root() {
    let dir = tempfile::tempdir().unwrap();
    assert!(NetcdfCatalog::open(dir.path().join("absent")).is_err());
}
