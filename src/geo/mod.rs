//! Geographic projection and tile addressing.
//!
//! Converting a marker position into a tile is a two-step process:
//!
//! ```text
//!  (lng, lat)  ──project──▶  (mercator x, mercator y)  ──locate(zoom)──▶  (tile x, tile y, top, left)
//!   degrees                   meters, zoom-independent                     pixels, per zoom level
//! ```
//!
//! - [`GeoPoint`] / [`project`]: ellipsoidal Mercator projection (meters)
//! - [`TileGrid`]: pixel space of a tile pyramid with a fixed tile edge length,
//!   turns meters into a [`TileLocation`] and applies pixel offsets with tile wrap-around
//!
//! # Example
//!
//! ```
//! use hotspot_tiler::geo::{GeoPoint, TileGrid};
//!
//! let point = GeoPoint::new(60.597223, 56.837992).unwrap();
//! let grid = TileGrid::default();
//!
//! let location = grid.locate_point(&point, 10).unwrap();
//! assert_eq!((location.address.x, location.address.y), (684, 315));
//! assert_eq!((location.top, location.left), (121, 94));
//! ```

mod locator;
mod mercator;

pub use locator::{
    Offset, TileAddress, TileGrid, TileLocation, DEFAULT_TILE_SIZE, MAX_TILE_SIZE, MAX_ZOOM,
};
pub use mercator::{project, GeoPoint, EARTH_RADIUS, ECCENTRICITY, EQUATOR_LENGTH};
