//! End-to-end runs of the reconciler, reducer and distance engine against the
//! shared fixture catalog.

use std::sync::Arc;

use catalog::{CatalogError, MemoryCatalog};
use chrono::{TimeZone, Utc};
use grid_processor::{
    extract_bottom_layer, normalize_longitude, DistanceConfig, DistanceEngine, LoadRequest,
    Persistence, ProcessorError, Reconciler, ReconcilerConfig, TargetGrid,
};
use ocean_common::{names, GridKind, TimeConvention};
use test_utils::{assert_approx_eq, assert_rel_eq, fixture_catalog, haversine_reference, DAILY};

fn reconciler() -> Reconciler {
    Reconciler::new(Arc::new(fixture_catalog()), ReconcilerConfig::default())
}

fn window() -> (chrono::DateTime<Utc>, chrono::DateTime<Utc>) {
    (
        Utc.with_ymd_and_hms(2010, 1, 1, 0, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2010, 1, 2, 0, 0, 0).unwrap(),
    )
}

#[test]
fn test_ice_field_reconciled_onto_ocean_grid() {
    let (start, end) = window();
    let aice = reconciler()
        .load(&LoadRequest::ice("aice", start, end, DAILY))
        .unwrap();

    assert_eq!(aice.kind, GridKind::CellCenter);
    assert_eq!(aice.convention, TimeConvention::Ocean);
    assert_eq!(
        aice.times().unwrap(),
        &[
            Utc.with_ymd_and_hms(2009, 12, 31, 12, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2010, 1, 1, 12, 0, 0).unwrap(),
        ]
    );
    assert_eq!(
        aice.axis(names::YT_OCEAN).unwrap().numeric().unwrap(),
        &[-80.0, -79.0]
    );
    assert_eq!(
        aice.axis(names::XT_OCEAN).unwrap().numeric().unwrap(),
        &[0.0, 1.0]
    );
    assert!(aice.axis(names::NJ).is_none());
}

#[test]
fn test_latitude_band_subsets_inclusively() {
    let (start, end) = window();
    let aice = reconciler()
        .load(&LoadRequest::ice("aice", start, end, DAILY).with_lat_band(-79.0, -45.0))
        .unwrap();
    assert_eq!(
        aice.axis(names::YT_OCEAN).unwrap().numeric().unwrap(),
        &[-79.0]
    );
}

#[test]
fn test_u_grid_subsets_on_u_axis() {
    let (start, end) = window();
    let u = reconciler()
        .load(&LoadRequest::ocean("u", start, end, DAILY).with_lat_band(-80.0, -80.0))
        .unwrap();
    assert_eq!(u.kind, GridKind::UPoint);
    assert_eq!(u.axis(names::YU_OCEAN).unwrap().len(), 1);
}

#[test]
fn test_missing_variable_propagates_catalog_error() {
    let (start, end) = window();
    let err = reconciler()
        .load(&LoadRequest::ocean("salt", start, end, DAILY))
        .unwrap_err();
    assert!(matches!(
        err,
        ProcessorError::Catalog(CatalogError::NoData { .. })
    ));
}

#[test]
fn test_ice_without_reference_fails() {
    let (start, end) = window();
    let catalog =
        MemoryCatalog::new().with_field(test_utils::EXPERIMENT, Some(DAILY), test_utils::aice());
    let reconciler = Reconciler::new(Arc::new(catalog), ReconcilerConfig::default());
    assert!(reconciler
        .load(&LoadRequest::ice("aice", start, end, DAILY))
        .is_err());
}

#[test]
fn test_bottom_layer_of_loaded_profile() {
    let (start, _) = window();
    let end = Utc.with_ymd_and_hms(2010, 1, 2, 12, 0, 0).unwrap();
    let temp = reconciler()
        .load(&LoadRequest::ocean("temp", start, end, DAILY))
        .unwrap();
    let bottom = extract_bottom_layer(&temp).unwrap();

    assert_eq!(bottom.shape(), &[2, 2, 2]);
    // Western column reaches level 2, eastern column level 1.
    assert_eq!(bottom.get(&[0, 0, 0]), Some(20.0));
    assert_eq!(bottom.get(&[0, 1, 1]), Some(11.0));
    assert_eq!(bottom.get(&[1, 0, 0]), Some(120.0));
}

#[test]
fn test_distance_to_ice_edge() {
    let (start, end) = window();
    let aice = normalize_longitude(
        &reconciler()
            .load(&LoadRequest::ice("aice", start, end, DAILY))
            .unwrap(),
    )
    .unwrap();
    let targets = TargetGrid::from_field(&aice).unwrap();

    let engine = DistanceEngine::new(DistanceConfig::default());
    let dist = engine
        .compute(&aice.time_slice(0).unwrap(), &targets, &Persistence::None)
        .unwrap();

    assert_eq!(dist.name, "dist_km");
    assert_eq!(dist.shape(), &[1, 2, 2]);
    assert_eq!(dist.attr("units"), Some("km"));
    assert_eq!(dist.attr("long_name"), Some("distance to nearest neighbour"));
    assert_eq!(
        dist.times().unwrap(),
        &[Utc.with_ymd_and_hms(2009, 12, 31, 12, 0, 0).unwrap()]
    );

    // The edge sits on the -80 row.
    assert_approx_eq!(dist.get(&[0, 0, 0]).unwrap(), 0.0, 1e-3);
    assert_approx_eq!(dist.get(&[0, 0, 1]).unwrap(), 0.0, 1e-3);
    assert_rel_eq!(
        dist.get(&[0, 1, 0]).unwrap(),
        haversine_reference(-79.0, 0.0, -80.0, 0.0),
        0.001
    );
    assert_rel_eq!(
        dist.get(&[0, 1, 1]).unwrap(),
        haversine_reference(-79.0, 1.0, -80.0, 1.0),
        0.001
    );
}

#[test]
fn test_distance_rejects_multiple_steps() {
    let (start, end) = window();
    let aice = reconciler()
        .load(&LoadRequest::ice("aice", start, end, DAILY))
        .unwrap();
    let targets = TargetGrid::from_field(&aice).unwrap();
    let err = DistanceEngine::default()
        .compute(&aice, &targets, &Persistence::None)
        .unwrap_err();
    assert!(matches!(err, ProcessorError::MultipleTimeSteps(2)));
}

#[test]
fn test_distance_rejects_wrong_target_shape() {
    let (start, end) = window();
    let aice = reconciler()
        .load(&LoadRequest::ice("aice", start, end, DAILY))
        .unwrap();
    let targets = TargetGrid::new((1, 1), vec![(-80.0, 0.0)]).unwrap();
    let err = DistanceEngine::default()
        .compute(&aice.time_slice(0).unwrap(), &targets, &Persistence::None)
        .unwrap_err();
    assert!(matches!(err, ProcessorError::ShapeMismatch(_)));
}

#[test]
fn test_dated_persistence_writes_file() {
    let (start, end) = window();
    let aice = reconciler()
        .load(&LoadRequest::ice("aice", start, end, DAILY))
        .unwrap();
    let targets = TargetGrid::from_field(&aice).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("nested").join("out");
    let persistence = Persistence::Dated {
        directory: out.clone(),
        stem: "dist_ice".to_string(),
    };
    DistanceEngine::default()
        .compute(&aice.time_slice(1).unwrap(), &targets, &persistence)
        .unwrap();

    let path = out.join("dist_ice_2010-01.nc");
    assert!(path.exists());
    let written = netcdf_io::read_field(&path, "dist_km", true).unwrap();
    assert_eq!(written.shape(), &[1, 2, 2]);
    assert_eq!(written.attr("units"), Some("km"));
}

#[test]
fn test_directory_only_persistence_writes_nothing() {
    let (start, end) = window();
    let aice = reconciler()
        .load(&LoadRequest::ice("aice", start, end, DAILY))
        .unwrap();
    let targets = TargetGrid::from_field(&aice).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");
    let dist = DistanceEngine::default()
        .compute(
            &aice.time_slice(0).unwrap(),
            &targets,
            &Persistence::Directory(out.clone()),
        )
        .unwrap();

    assert_eq!(dist.shape(), &[1, 2, 2]);
    assert!(out.is_dir());
    assert_eq!(std::fs::read_dir(&out).unwrap().count(), 0);
}
