//! Tile pyramid addressing.
//!
//! Pixel space at zoom `z` is a square of `tile_size · 2^z` pixels with the
//! origin at the north-west corner; Y grows southward. A pixel belongs to the
//! tile `(px div tile_size, py div tile_size)` and sits at
//! `(py mod tile_size, px mod tile_size)` inside it.

use serde::Serialize;

use crate::error::TileError;

use super::mercator::{GeoPoint, EQUATOR_LENGTH};

/// Default tile edge length in pixels. Shared with the client renderer.
pub const DEFAULT_TILE_SIZE: u32 = 256;

/// Largest supported tile edge length in pixels.
pub const MAX_TILE_SIZE: u32 = 4096;

/// Highest zoom level the pixel space can address.
pub const MAX_ZOOM: u8 = 30;

// =============================================================================
// Tile Address
// =============================================================================

/// Column/row of a tile within one zoom level.
///
/// Ordered by `x` then `y`, which gives tile sets a deterministic iteration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TileAddress {
    /// Tile column (0 at the antimeridian, growing eastward)
    pub x: i64,

    /// Tile row (0 at the top of the projection, growing southward)
    pub y: i64,
}

impl TileAddress {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

impl From<(i64, i64)> for TileAddress {
    fn from((x, y): (i64, i64)) -> Self {
        Self { x, y }
    }
}

// =============================================================================
// Tile Location
// =============================================================================

/// A tile address plus a pixel position inside that tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileLocation {
    pub address: TileAddress,

    /// Pixels from the top edge of the tile, in `[0, tile_size)`
    pub top: i32,

    /// Pixels from the left edge of the tile, in `[0, tile_size)`
    pub left: i32,
}

impl TileLocation {
    pub fn new(address: TileAddress, top: i32, left: i32) -> Self {
        Self { address, top, left }
    }
}

/// A pixel displacement, `top` first to match tile-local `(top, left)` pairs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Offset {
    pub top: i32,
    pub left: i32,
}

impl Offset {
    pub fn new(top: i32, left: i32) -> Self {
        Self { top, left }
    }
}

// =============================================================================
// Tile Grid
// =============================================================================

/// Pixel space of a tile pyramid with a fixed tile edge length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileGrid {
    tile_size: u32,
}

impl Default for TileGrid {
    fn default() -> Self {
        Self {
            tile_size: DEFAULT_TILE_SIZE,
        }
    }
}

impl TileGrid {
    /// Create a grid with the given tile edge length.
    pub fn new(tile_size: u32) -> Result<Self, TileError> {
        if tile_size == 0 || tile_size > MAX_TILE_SIZE {
            return Err(TileError::InvalidTileSize {
                size: tile_size,
                max: MAX_TILE_SIZE,
            });
        }
        Ok(Self { tile_size })
    }

    /// Tile edge length in pixels.
    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Edge length of the whole world in pixels at `zoom`.
    pub fn world_size(&self, zoom: u8) -> f64 {
        self.tile_size as f64 * 2f64.powi(zoom as i32)
    }

    /// Number of tiles along each axis at `zoom`.
    pub fn tiles_per_axis(zoom: u8) -> i64 {
        1i64 << zoom
    }

    /// Convert Mercator meters to absolute pixel coordinates at `zoom`.
    ///
    /// Rounds half away from zero. Y is flipped so that it grows southward.
    pub fn pixel(
        &self,
        mercator_x: f64,
        mercator_y: f64,
        zoom: u8,
    ) -> Result<(i64, i64), TileError> {
        check_zoom(zoom)?;

        let scale = self.world_size(zoom) / EQUATOR_LENGTH;
        let half_equator = EQUATOR_LENGTH / 2.0;

        let pixel_x = ((half_equator + mercator_x) * scale).round() as i64;
        let pixel_y = ((half_equator - mercator_y) * scale).round() as i64;

        Ok((pixel_x, pixel_y))
    }

    /// Locate Mercator meters at `zoom`: the tile and the position inside it.
    pub fn locate(
        &self,
        mercator_x: f64,
        mercator_y: f64,
        zoom: u8,
    ) -> Result<TileLocation, TileError> {
        let (pixel_x, pixel_y) = self.pixel(mercator_x, mercator_y, zoom)?;
        Ok(self.split_pixel(pixel_x, pixel_y))
    }

    /// Locate a projected point at `zoom`.
    pub fn locate_point(&self, point: &GeoPoint, zoom: u8) -> Result<TileLocation, TileError> {
        let (x, y) = point.mercator();
        self.locate(x, y, zoom)
    }

    /// Shift a tile-local position by a pixel offset, carrying whole tiles into
    /// the address. The resulting `top`/`left` are always in `[0, tile_size)`.
    pub fn move_anchor(&self, location: TileLocation, offset: Offset) -> TileLocation {
        let size = self.tile_size as i64;
        let left = location.left as i64 + offset.left as i64;
        let top = location.top as i64 + offset.top as i64;

        TileLocation {
            address: TileAddress {
                x: location.address.x + left.div_euclid(size),
                y: location.address.y + top.div_euclid(size),
            },
            top: top.rem_euclid(size) as i32,
            left: left.rem_euclid(size) as i32,
        }
    }

    /// Whether `address` lies inside the world at `zoom`.
    pub fn contains(&self, address: TileAddress, zoom: u8) -> bool {
        let n = Self::tiles_per_axis(zoom.min(MAX_ZOOM));
        (0..n).contains(&address.x) && (0..n).contains(&address.y)
    }

    fn split_pixel(&self, pixel_x: i64, pixel_y: i64) -> TileLocation {
        let size = self.tile_size as i64;
        TileLocation {
            address: TileAddress {
                x: pixel_x.div_euclid(size),
                y: pixel_y.div_euclid(size),
            },
            top: pixel_y.rem_euclid(size) as i32,
            left: pixel_x.rem_euclid(size) as i32,
        }
    }
}

fn check_zoom(zoom: u8) -> Result<(), TileError> {
    if zoom > MAX_ZOOM {
        return Err(TileError::InvalidZoom {
            zoom,
            max: MAX_ZOOM,
        });
    }
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
