//! End-to-end scenarios: viewport arithmetic, point updates, GeoJSON loading
//! and rendering through the map service.
//!
//! Run: cargo test --test render_scenarios_test

#![allow(clippy::unwrap_used, missing_docs)]

use std::io::Write;

use trueno_map::cull::SimplifyOptions;
use trueno_map::geometry::Bounds;
use trueno_map::overlay::{MapDataUpdate, MapPoint};
use trueno_map::projection::PlateCarree;
use trueno_map::raster::RenderOptions;
use trueno_map::source::IndexKind;
use trueno_map::{Config, Error, MapService, Viewport};

#[test]
fn get_bounds_of_default_viewport() {
    let vp = Viewport::new(0.0, 0.0, 1_000_000.0).unwrap();
    assert_eq!(
        vp.get_bounds(200.0, 100.0),
        Bounds::new(-100_000_000.0, -50_000_000.0, 100_000_000.0, 50_000_000.0)
    );
}

#[test]
fn zoom_in_then_out_returns_to_start() {
    let mut vp = Viewport::new(0.0, 0.0, 1000.0).unwrap();
    vp.zoom(0.5).unwrap();
    assert_eq!(vp.scale(), 500.0);
    vp.zoom(2.0).unwrap();
    assert_eq!(vp.scale(), 1000.0);
}

#[test]
fn reset_sets_center_and_scale() {
    let mut vp = Viewport::default();
    vp.pan(123.0, -456.0);
    vp.reset(50.0, 75.0, 2000.0).unwrap();
    assert_eq!((vp.center_x, vp.center_y, vp.scale()), (50.0, 75.0, 2000.0));
}

#[test]
fn out_of_range_points_are_rejected() {
    assert!(matches!(MapPoint::new(200.0, 0.0), Err(Error::InvalidCoordinate { .. })));
    assert!(matches!(MapPoint::new(0.0, -95.0), Err(Error::InvalidCoordinate { .. })));

    let mut service = MapService::default();
    let update = MapDataUpdate { longitude: 0.0, latitude: 91.0, data: Default::default() };
    assert!(service.update_map_data(&update).is_err());
    assert!(service.points().is_empty());
}

#[test]
fn updates_near_an_existing_point_replace_it() {
    let mut service = MapService::default();
    let json = r#"{"longitude": 45.0, "latitude": -30.0, "data": {"name": "first"}}"#;
    let first: MapDataUpdate = serde_json::from_str(json).unwrap();
    service.update_map_data(&first).unwrap();

    let mut second = first.clone();
    second.data.insert("name".to_string(), serde_json::json!("second"));
    service.update_map_data(&second).unwrap();
    assert_eq!(service.points().len(), 1);
    assert_eq!(service.points()[0].data()["name"], "second");

    let near = MapDataUpdate {
        longitude: 45.00005,
        latitude: -30.00003,
        data: [("name".to_string(), serde_json::json!("third"))].into_iter().collect(),
    };
    service.update_map_data(&near).unwrap();
    assert_eq!(service.points().len(), 1);
    assert_eq!(service.points()[0].data()["name"], "third");
    assert_eq!(service.points()[0].longitude(), 45.00005);

    let far = MapDataUpdate { longitude: 45.001, latitude: -30.0, data: Default::default() };
    service.update_map_data(&far).unwrap();
    assert_eq!(service.points().len(), 2);
}

#[test]
fn geojson_polygon_renders_its_exterior_ring() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{
            "type": "FeatureCollection",
            "features": [
                {{"type": "Feature", "properties": {{}}, "geometry": {{
                    "type": "Polygon",
                    "coordinates": [
                        [[-10, -10], [10, -10], [10, 10], [-10, 10], [-10, -10]],
                        [[-2, -2], [2, -2], [2, 2], [-2, 2], [-2, -2]]
                    ]
                }}}},
                {{"type": "Feature", "properties": {{}}, "geometry": null}}
            ]
        }}"#
    )
    .unwrap();

    // Degrees are tiny next to the default tolerance floor, so keep every vertex.
    let mut service = MapService::new(Box::new(PlateCarree))
        .with_render_options(RenderOptions { simplify: SimplifyOptions::DISABLED });
    service.load_geojson(file.path(), IndexKind::Grid).unwrap();
    assert_eq!(service.geometry().unwrap().len(), 1);
    assert_eq!(service.geometry_bounds(), Some(Bounds::new(-10.0, -10.0, 10.0, 10.0)));

    // 20 columns x 10 rows = 40 x 40 subpixels covering [-11, 11] on both axes.
    let vp = Viewport::new(0.0, 0.0, 0.55).unwrap();
    let text = service.render(&vp, 20, 10);
    let rows: Vec<&str> = text.split('\n').collect();
    assert_eq!(rows.len(), 10);
    assert!(rows.iter().all(|r| r.chars().count() == 20));

    // Ring edges land on the outer border; the center (hole) stays empty.
    assert!(rows[0].chars().all(|c| c != ' '));
    assert!(rows[9].chars().all(|c| c != ' '));
    assert!(rows[4].chars().nth(10) == Some(' '));
}

#[test]
fn render_before_loading_is_empty() {
    let service = MapService::default();
    assert_eq!(service.render(&Viewport::default(), 80, 24), "");
}

#[test]
fn render_with_unsized_display_is_empty() {
    let mut service = MapService::new(Box::new(PlateCarree));
    service.set_polylines(vec![[(0.0, 0.0), (1.0, 1.0)].into_iter().collect()]);
    let vp = Viewport::new(0.0, 0.0, 0.01).unwrap();
    assert_eq!(service.render(&vp, 0, 24), "");
    assert_eq!(service.render(&vp, 80, -1), "");
}

#[test]
fn config_file_drives_the_service() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "viewport:\n  center_x: 5.0\n  center_y: 6.0\n  scale: 250.0\nrender:\n  index: linear"
    )
    .unwrap();

    let config = Config::load(file.path()).unwrap();
    let vp = config.initial_viewport().unwrap();
    assert_eq!((vp.center_x, vp.center_y, vp.scale()), (5.0, 6.0, 250.0));
    assert_eq!(config.render.index, IndexKind::Linear);
}

#[test]
fn config_parse_errors_report_a_line() {
    let yaml = "viewport:\n  scale: 1.0\nnavigation:\n  pan_step: [oops\n";
    let err = Config::parse(yaml).unwrap_err();
    match err {
        Error::ConfigParse { line, .. } => assert!(line >= 3),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn missing_config_file_is_an_error_but_default_falls_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.yaml");
    assert!(matches!(Config::load(&path), Err(Error::ConfigNotFound(_))));
    let config = Config::load_or_default(&path);
    assert_eq!(config.initial_viewport().unwrap(), Viewport::default());
}
