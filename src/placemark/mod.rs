//! Placemarks: markers bound to a single tile.
//!
//! A marker near a tile edge is drawn on every tile its icon overlaps. It is
//! therefore turned into one [`Placemark`] per tile, each with a box in that
//! tile's local frame. All fragments of a marker share the icon and data
//! payload through reference counting.

mod fragment;

use std::sync::Arc;

use image::RgbaImage;
use serde_json::{Map, Value};

use crate::error::TileError;
use crate::geo::{GeoPoint, Offset, TileAddress, TileGrid};

pub use fragment::{fragment, Fragment, LocalBox};

/// Decoded marker icon, composited onto tiles as-is.
pub type Icon = Arc<RgbaImage>;

/// Arbitrary key/value payload passed through to the tile script.
pub type PlacemarkData = Map<String, Value>;

/// Priority of a placemark that has not been sorted into a tile yet.
pub const DEFAULT_PRIORITY: f64 = 1.0;

/// One marker fragment rendered on one tile.
#[derive(Debug, Clone)]
pub struct Placemark {
    /// Tile this fragment is drawn on
    pub address: TileAddress,

    /// Longitude of the marker anchor (shared by all fragments)
    pub lng: f64,

    /// Latitude of the marker anchor (shared by all fragments)
    pub lat: f64,

    /// Icon box in the tile's local frame
    pub local_box: LocalBox,

    pub icon: Icon,

    pub data: Arc<PlacemarkData>,

    /// Stacking hint for the client, in `(0, 1]`; set when the tile is sorted
    pub priority: f64,
}

impl Placemark {
    /// Place a marker at `zoom` and split it across the tiles it overlaps.
    ///
    /// The marker is located, shifted by `offset` (with tile wrap-around), and
    /// its icon box is fragmented. The first placemark is always the one on the
    /// anchor tile, followed by neighbor fragments.
    ///
    /// # Errors
    ///
    /// Fails for zoom levels the grid cannot address and for icons larger
    /// than one tile.
    pub fn create(
        grid: &TileGrid,
        point: &GeoPoint,
        zoom: u8,
        offset: Offset,
        icon: Icon,
        data: Arc<PlacemarkData>,
    ) -> Result<Vec<Placemark>, TileError> {
        let location = grid.locate_point(point, zoom)?;
        let anchor = grid.move_anchor(location, offset);

        let (width, height) = icon.dimensions();
        if width > grid.tile_size() || height > grid.tile_size() {
            return Err(TileError::UnsupportedGeometry {
                width: i32::try_from(width).unwrap_or(i32::MAX),
                height: i32::try_from(height).unwrap_or(i32::MAX),
                tile_size: grid.tile_size(),
            });
        }
        // Both fit in a tile edge, which is far below i32::MAX
        let local_box = LocalBox::anchored(anchor.top, anchor.left, width as i32, height as i32);

        let fragments = fragment(grid, anchor.address, local_box)?;

        let mut placemarks = Vec::with_capacity(fragments.len() + 1);
        placemarks.push(Placemark {
            address: anchor.address,
            lng: point.lng(),
            lat: point.lat(),
            local_box,
            icon: Arc::clone(&icon),
            data: Arc::clone(&data),
            priority: DEFAULT_PRIORITY,
        });
        placemarks.extend(fragments.into_iter().map(|f| Placemark {
            address: f.address,
            lng: point.lng(),
            lat: point.lat(),
            local_box: f.local_box,
            icon: Arc::clone(&icon),
            data: Arc::clone(&data),
            priority: DEFAULT_PRIORITY,
        }));

        Ok(placemarks)
    }
}
