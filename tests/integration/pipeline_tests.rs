//! Pipeline tests: placement, fragmentation, ordering and drivers.

use std::sync::Arc;

use hotspot_tiler::{
    LocalBox, PyramidDriver, PyramidError, TileAddress, TileError, TileGrid, ZoomRange,
};

use super::test_utils::{data_name, CollectingConsumer, TestMarker};

// =============================================================================
// Placement
// =============================================================================

#[test]
fn test_reference_marker_all_zooms() {
    let driver = PyramidDriver::default();
    let consumer = CollectingConsumer::new();
    let markers = vec![TestMarker::reference(8)];

    let stats = driver
        .generate(&markers, ZoomRange::new(10, 16).unwrap(), &consumer)
        .unwrap();
    assert_eq!(stats.zoom_levels, 7);
    assert_eq!(stats.tiles, 7);

    let expected = [
        (10, 684, 315, 121, 94),
        (11, 1368, 630, 242, 187),
        (12, 2737, 1261, 227, 118),
        (13, 5474, 2523, 198, 236),
        (14, 10949, 5047, 141, 217),
        (15, 21899, 10095, 25, 178),
        (16, 43799, 20190, 51, 99),
    ];

    let tiles = consumer.tiles();
    for (tile, (zoom, x, y, top, left)) in tiles.iter().zip(expected) {
        assert_eq!(tile.zoom(), zoom);
        assert_eq!(tile.address(), TileAddress::new(x, y), "zoom {}", zoom);

        let placemark = &tile.placemarks()[0];
        assert_eq!(placemark.local_box, LocalBox::new(left, top, left + 8, top + 8));
        assert_eq!(placemark.priority, 1.0);
    }
}

#[test]
fn test_world_center_at_zoom_zero() {
    let driver = PyramidDriver::default();
    let consumer = CollectingConsumer::new();

    driver
        .generate(&[TestMarker::new(0.0, 0.0, 16)], ZoomRange::single(0).unwrap(), &consumer)
        .unwrap();

    let tiles = consumer.tiles();
    assert_eq!(tiles.len(), 1);
    assert_eq!(tiles[0].address(), TileAddress::new(0, 0));
    assert_eq!(tiles[0].placemarks()[0].local_box, LocalBox::new(128, 128, 144, 144));
}

#[test]
fn test_marker_split_across_corner() {
    let driver = PyramidDriver::default();
    let consumer = CollectingConsumer::new();
    // Anchor at zoom 15 is (top 25, left 178); move the icon onto the corner
    let markers = vec![TestMarker::reference(12).with_offset(248 - 25, 248 - 178)];

    let stats = driver
        .generate(&markers, ZoomRange::single(15).unwrap(), &consumer)
        .unwrap();
    assert_eq!(stats.tiles, 4);
    assert_eq!(stats.placemarks, 4);

    let boxes: Vec<(TileAddress, LocalBox)> = consumer
        .tiles()
        .iter()
        .map(|tile| (tile.address(), tile.placemarks()[0].local_box))
        .collect();

    assert_eq!(
        boxes,
        vec![
            (TileAddress::new(21899, 10095), LocalBox::new(248, 248, 260, 260)),
            (TileAddress::new(21899, 10096), LocalBox::new(248, -8, 260, 4)),
            (TileAddress::new(21900, 10095), LocalBox::new(-8, 248, 4, 260)),
            (TileAddress::new(21900, 10096), LocalBox::new(-8, -8, 4, 4)),
        ]
    );
}

#[test]
fn test_fragments_share_marker_data() {
    let driver = PyramidDriver::default();
    let marker = TestMarker::reference(12)
        .with_offset(248 - 25, 0)
        .with_name("Dam");

    let set = driver.build_level(&[marker], 15).unwrap();
    assert_eq!(set.len(), 2);

    for tile in set.tiles() {
        let placemark = &tile.placemarks()[0];
        assert_eq!(data_name(&placemark.data), Some("Dam"));
        assert_eq!(placemark.lng, 60.597223);
    }
}

// =============================================================================
// Ordering
// =============================================================================

#[test]
fn test_render_order_and_priorities() {
    let driver = PyramidDriver::default();
    let markers = vec![
        TestMarker::reference(8).with_name("middle"),
        TestMarker::reference(8).with_offset(20, 0).with_name("bottom"),
        TestMarker::reference(8).with_offset(-20, 0).with_name("top"),
    ];

    let set = driver.build_level(&markers, 10).unwrap();
    assert_eq!(set.len(), 1);

    let tile = set.get(&TileAddress::new(684, 315)).unwrap();
    let order: Vec<_> = tile
        .placemarks()
        .iter()
        .map(|p| (data_name(&p.data).unwrap(), p.local_box.top, p.priority))
        .collect();

    assert_eq!(
        order,
        vec![("top", 101, 1.0), ("middle", 121, 0.6667), ("bottom", 141, 0.3333)]
    );
}

#[test]
fn test_equal_tops_keep_input_order() {
    let driver = PyramidDriver::default();
    let markers = vec![
        TestMarker::reference(8).with_name("first"),
        TestMarker::reference(8).with_offset(0, 30).with_name("second"),
    ];

    let set = driver.build_level(&markers, 10).unwrap();
    let tile = set.get(&TileAddress::new(684, 315)).unwrap();
    let names: Vec<_> = tile.placemarks().iter().map(|p| data_name(&p.data)).collect();
    assert_eq!(names, vec![Some("first"), Some("second")]);
    assert_eq!(tile.placemarks()[1].priority, 0.5);
}

#[test]
fn test_tiles_arrive_in_address_order() {
    let driver = PyramidDriver::default();
    let consumer = CollectingConsumer::new();
    let markers = vec![
        TestMarker::new(37.62, 55.75, 8),
        TestMarker::new(-73.98, 40.75, 8),
        TestMarker::reference(8),
    ];

    driver
        .generate(&markers, ZoomRange::single(9).unwrap(), &consumer)
        .unwrap();

    let addresses: Vec<_> = consumer.arrivals().iter().map(|t| t.address()).collect();
    let mut sorted = addresses.clone();
    sorted.sort();
    assert_eq!(addresses, sorted);
    assert_eq!(addresses.len(), 3);
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn test_icon_larger_than_tile() {
    let driver = PyramidDriver::new(TileGrid::new(64).unwrap());
    let result = driver.build_level(&[TestMarker::reference(65)], 10);

    assert!(matches!(
        result,
        Err(PyramidError::Tile(TileError::UnsupportedGeometry { .. }))
    ));
}

#[test]
fn test_pole_is_rejected() {
    let driver = PyramidDriver::default();
    let result = driver.build_level(&[TestMarker::new(10.0, -90.0, 8)], 3);
    assert!(matches!(result, Err(PyramidError::Geo(_))));
}

// =============================================================================
// Concurrency
// =============================================================================

#[tokio::test]
async fn test_concurrent_driver_matches_sequential() {
    let driver = PyramidDriver::default();
    let markers: Arc<[TestMarker]> = Arc::from(vec![
        TestMarker::reference(12).with_offset(248 - 25, 248 - 178),
        TestMarker::reference(10).with_offset(-5, 3),
        TestMarker::new(37.62, 55.75, 20),
        TestMarker::new(-73.98, 40.75, 20),
    ]);
    let zooms = ZoomRange::new(5, 15).unwrap();

    let sequential = CollectingConsumer::new();
    let expected = driver.generate(&markers, zooms, &sequential).unwrap();

    let concurrent = Arc::new(CollectingConsumer::new());
    let actual = driver
        .generate_concurrent(Arc::clone(&markers), zooms, Arc::clone(&concurrent))
        .await
        .unwrap();

    assert_eq!(actual.zoom_levels, expected.zoom_levels);
    assert_eq!(actual.tiles, expected.tiles);
    assert_eq!(actual.placemarks, expected.placemarks);

    let summarize = |consumer: &CollectingConsumer| {
        consumer
            .tiles()
            .iter()
            .map(|tile| {
                let boxes: Vec<_> = tile
                    .placemarks()
                    .iter()
                    .map(|p| (p.local_box, p.priority.to_bits()))
                    .collect();
                (tile.zoom(), tile.address(), boxes)
            })
            .collect::<Vec<_>>()
    };
    assert_eq!(summarize(&sequential), summarize(&concurrent));
}

#[tokio::test]
async fn test_concurrent_driver_reports_errors() {
    let driver = PyramidDriver::default();
    let markers: Arc<[TestMarker]> = Arc::from(vec![TestMarker::new(0.0, 95.0, 8)]);

    let zooms = ZoomRange::new(1, 3).unwrap();
    let result = driver
        .generate_concurrent(markers, zooms, Arc::new(CollectingConsumer::new()))
        .await;
    assert!(matches!(result, Err(PyramidError::Geo(_))));
}
