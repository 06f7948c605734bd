//! Output tests: files written by the tile writer and the JSON marker source.

use std::fs;
use std::sync::Arc;

use image::Rgba;
use serde_json::Value;

use hotspot_tiler::{
    load_markers, IconCache, PyramidDriver, ScriptFormat, SourceError, TileAddress, TileWriter,
    ViewContext, ZoomRange,
};

use super::test_utils::{write_icon, write_markers, TestMarker, REFERENCE_LAT, REFERENCE_LNG, RED};

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Parse the JSON argument out of `callee(<json>);`.
fn call_argument(script: &str, callee: &str) -> Value {
    let inner = script
        .strip_prefix(callee)
        .and_then(|s| s.strip_prefix('('))
        .and_then(|s| s.strip_suffix(");"))
        .expect("script is a single call");
    serde_json::from_str(inner).unwrap()
}

// =============================================================================
// Tile Writer
// =============================================================================

#[test]
fn test_writer_creates_png_and_script() {
    let dir = tempfile::tempdir().unwrap();
    let writer = TileWriter::new(dir.path()).with_base_name("cafes");
    let markers = vec![TestMarker::reference(4).with_name("Plotinka")];

    PyramidDriver::default()
        .generate(&markers, ZoomRange::single(10).unwrap(), &writer)
        .unwrap();

    let address = TileAddress::new(684, 315);
    let png_path = dir.path().join("png/10/tile-684-315.png");
    let js_path = dir.path().join("js/10/tile-684-315.js");
    assert_eq!(writer.tile_path(10, address, "png"), png_path);
    assert_eq!(writer.tile_path(10, address, "js"), js_path);

    let image = image::open(&png_path).unwrap().into_rgba8();
    assert_eq!(image.dimensions(), (256, 256));
    assert_eq!(*image.get_pixel(94, 121), RED);
    assert_eq!(*image.get_pixel(97, 124), RED);
    assert_eq!(*image.get_pixel(93, 121), TRANSPARENT);
    assert_eq!(*image.get_pixel(98, 125), TRANSPARENT);

    let script = fs::read_to_string(&js_path).unwrap();
    let payload = call_argument(&script, "hotspot_callback");
    let features = payload["data"]["features"].as_array().unwrap();
    assert_eq!(payload["data"]["type"], "FeatureCollection");
    assert_eq!(features.len(), 1);

    let properties = &features[0]["properties"];
    assert_eq!(properties["name"], "Plotinka");
    let rectangle = &properties["HotspotMetaData"]["RenderedGeometry"];
    assert_eq!(rectangle["type"], "Rectangle");
    assert_eq!(rectangle["coordinates"], serde_json::json!([[94, 121], [98, 125]]));
}

#[test]
fn test_writer_v1_script() {
    let dir = tempfile::tempdir().unwrap();
    let writer = TileWriter::new(dir.path())
        .with_base_name("cafes")
        .with_format(ScriptFormat::V1);
    let markers = vec![TestMarker::reference(4)];

    PyramidDriver::default()
        .generate(&markers, ZoomRange::single(10).unwrap(), &writer)
        .unwrap();

    let script = fs::read_to_string(dir.path().join("js/10/tile-684-315.js")).unwrap();
    assert_eq!(
        script,
        "YMaps.Hotspots.Loader.onLoad(\"cafes-684-315-10\",{\"objects\":[\
         {\"data\":{},\"base\":new YMaps.GeoPoint(60.597223,56.837992),\
         \"geometry\":[94,121,98,125],\"priority\":1.0}]});"
    );
}

#[test]
fn test_writer_composites_fragments() {
    let dir = tempfile::tempdir().unwrap();
    let writer = TileWriter::new(dir.path());
    let markers = vec![TestMarker::reference(12).with_offset(248 - 25, 248 - 178)];

    PyramidDriver::default()
        .generate(&markers, ZoomRange::single(15).unwrap(), &writer)
        .unwrap();

    let anchor = image::open(dir.path().join("png/15/tile-21899-10095.png"))
        .unwrap()
        .into_rgba8();
    assert_eq!(*anchor.get_pixel(248, 248), RED);
    assert_eq!(*anchor.get_pixel(255, 255), RED);
    assert_eq!(*anchor.get_pixel(247, 247), TRANSPARENT);

    let diagonal = image::open(dir.path().join("png/15/tile-21900-10096.png"))
        .unwrap()
        .into_rgba8();
    assert_eq!(*diagonal.get_pixel(0, 0), RED);
    assert_eq!(*diagonal.get_pixel(3, 3), RED);
    assert_eq!(*diagonal.get_pixel(4, 4), TRANSPARENT);

    for name in ["tile-21899-10096", "tile-21900-10095"] {
        assert!(dir.path().join(format!("png/15/{name}.png")).exists());
        assert!(dir.path().join(format!("js/15/{name}.js")).exists());
    }
}

#[test]
fn test_writer_skips_empty_tiles() {
    let dir = tempfile::tempdir().unwrap();
    let writer = TileWriter::new(dir.path().join("out"));

    let stats = PyramidDriver::default()
        .generate::<TestMarker, _>(&[], ZoomRange::new(0, 3).unwrap(), &writer)
        .unwrap();

    assert_eq!(stats.tiles, 0);
    assert!(!dir.path().join("out").exists());
}

#[test]
fn test_clear_removes_previous_output() {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.path().join("tiles");
    let writer = TileWriter::new(&base);

    PyramidDriver::default()
        .generate(&[TestMarker::reference(4)], ZoomRange::single(3).unwrap(), &writer)
        .unwrap();
    assert!(base.join("png/3").exists());

    writer.clear().unwrap();
    assert!(!base.exists());

    // Clearing twice is fine
    writer.clear().unwrap();
}

#[test]
fn test_view_context() {
    let context = ViewContext::default();
    assert_eq!(context.source_url, "tiles/%e/%z/tile-%x-%y.%e");
    assert_eq!(context.source_name, "myLayer-%x-%y-%z");

    let context = ViewContext::new("static/tiles/", "cafes");
    assert_eq!(context.source_url, "static/tiles/%e/%z/tile-%x-%y.%e");
    assert_eq!(context.source_name, "cafes-%x-%y-%z");
}

// =============================================================================
// JSON Source
// =============================================================================

#[test]
fn test_json_markers_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    write_icon(dir.path(), "icons/pin.png", 6);
    let input = write_markers(
        dir.path(),
        "icons/pin.png",
        &[
            (REFERENCE_LNG, REFERENCE_LAT, "Plotinka"),
            (37.62, 55.75, "Kremlin"),
        ],
    );

    let mut icons = IconCache::new();
    let markers = load_markers(&input, &mut icons).unwrap();
    assert_eq!(markers.len(), 2);
    assert_eq!(icons.loads(), 1);

    let output = dir.path().join("tiles");
    let writer = TileWriter::new(&output);
    let stats = PyramidDriver::default()
        .generate(&markers, ZoomRange::new(9, 10).unwrap(), &writer)
        .unwrap();
    assert_eq!(stats.tiles, 4);

    let script = fs::read_to_string(output.join("js/10/tile-684-315.js")).unwrap();
    let payload = call_argument(&script, "hotspot_callback");
    assert_eq!(payload["data"]["features"][0]["properties"]["name"], "Plotinka");

    let image = image::open(output.join("png/10/tile-684-315.png"))
        .unwrap()
        .into_rgba8();
    assert_eq!(*image.get_pixel(94, 121), RED);
}

#[test]
fn test_json_markers_missing_icon() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_markers(dir.path(), "missing.png", &[(1.0, 1.0, "A")]);

    let result = load_markers(&input, &mut IconCache::new());
    assert!(matches!(result, Err(SourceError::Icon { .. })));
}

#[test]
fn test_json_markers_share_decoded_icon() {
    let dir = tempfile::tempdir().unwrap();
    write_icon(dir.path(), "pin.png", 6);
    let input = write_markers(dir.path(), "pin.png", &[(1.0, 1.0, "A"), (2.0, 2.0, "B")]);

    let mut icons = IconCache::with_capacity(4);
    let markers = load_markers(&input, &mut icons).unwrap();

    use hotspot_tiler::Marker;
    assert!(Arc::ptr_eq(&markers[0].icon(0), &markers[1].icon(0)));
}
