//! Per-zoom aggregation of placemarks into tiles.
//!
//! Placemarks are bucketed by tile address as they arrive. Ordering and
//! priorities are computed once every placemark of the zoom level has been
//! collected, never incrementally.

use std::collections::BTreeMap;

use crate::geo::TileAddress;
use crate::placemark::Placemark;

/// Round to four decimal places, half away from zero.
fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Priority of the placemark at `index` in a sorted tile of `count` placemarks.
///
/// The topmost placemark gets `1.0`; each following one is `1/count` lower,
/// down to `round(1/count, 4)` for the last.
pub fn priority_for(index: usize, count: usize) -> f64 {
    if count == 0 || index >= count {
        return 0.0;
    }
    round4((count - index) as f64 / count as f64)
}

// =============================================================================
// Tile
// =============================================================================

/// The placemarks drawn on one tile at one zoom level.
#[derive(Debug, Clone)]
pub struct Tile {
    address: TileAddress,
    zoom: u8,
    placemarks: Vec<Placemark>,
}

impl Tile {
    /// Create an empty tile.
    pub fn new(address: TileAddress, zoom: u8) -> Self {
        Self {
            address,
            zoom,
            placemarks: Vec::new(),
        }
    }

    pub fn address(&self) -> TileAddress {
        self.address
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    /// Placemarks in their current order (render order once sorted).
    pub fn placemarks(&self) -> &[Placemark] {
        &self.placemarks
    }

    pub fn len(&self) -> usize {
        self.placemarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placemarks.is_empty()
    }

    /// Append a placemark. Its address is expected to match the tile.
    pub fn add(&mut self, placemark: Placemark) {
        debug_assert_eq!(placemark.address, self.address);
        self.placemarks.push(placemark);
    }

    /// Order placemarks top to bottom and assign priorities.
    ///
    /// The sort is stable, so placemarks sharing a top edge keep their
    /// insertion order.
    pub fn sort(&mut self) {
        self.placemarks.sort_by_key(|p| p.local_box.top);

        let count = self.placemarks.len();
        for (index, placemark) in self.placemarks.iter_mut().enumerate() {
            placemark.priority = priority_for(index, count);
        }
    }
}

// =============================================================================
// Tile Set
// =============================================================================

/// All tiles of one zoom level, keyed and ordered by address.
#[derive(Debug, Clone)]
pub struct TileSet {
    zoom: u8,
    tiles: BTreeMap<TileAddress, Tile>,
}

impl TileSet {
    /// Create an empty set for `zoom`.
    pub fn new(zoom: u8) -> Self {
        Self {
            zoom,
            tiles: BTreeMap::new(),
        }
    }

    /// Bucket `placemarks` into tiles and sort each tile.
    pub fn build(zoom: u8, placemarks: impl IntoIterator<Item = Placemark>) -> Self {
        let mut set = Self::new(zoom);
        for placemark in placemarks {
            set.add(placemark);
        }
        set.sort();
        set
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    /// Add a placemark to its tile, creating the tile on first use.
    pub fn add(&mut self, placemark: Placemark) {
        let zoom = self.zoom;
        self.tiles
            .entry(placemark.address)
            .or_insert_with(|| Tile::new(placemark.address, zoom))
            .add(placemark);
    }

    /// Sort every tile. Call once all placemarks are in.
    pub fn sort(&mut self) {
        for tile in self.tiles.values_mut() {
            tile.sort();
        }
    }

    pub fn get(&self, address: &TileAddress) -> Option<&Tile> {
        self.tiles.get(address)
    }

    /// Number of tiles.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Total number of placemarks across all tiles.
    pub fn placemark_count(&self) -> usize {
        self.tiles.values().map(Tile::len).sum()
    }

    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.values()
    }

    pub fn into_tiles(self) -> impl Iterator<Item = Tile> {
        self.tiles.into_values()
    }
}

// =============================================================================
// Tests
// =============================================================================
