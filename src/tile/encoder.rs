//! PNG tile encoder.
//!
//! This module composites the icons of a sorted tile onto a transparent
//! canvas and encodes the result as PNG.
//!
//! # Design Decisions
//!
//! - **Render order**: Icons are drawn in the tile's placemark order, so later
//!   (lower) placemarks end up on top.
//!
//! - **Clipping**: Fragment boxes may start at negative coordinates or run past
//!   the tile edge. Only the part inside the canvas is drawn; the neighbor tile
//!   draws the rest.
//!
//! - **Alpha blending**: Icons are blended over the canvas with their own alpha
//!   channel, so overlapping markers keep their anti-aliased edges.

use bytes::Bytes;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, Rgba, RgbaImage};

use crate::error::OutputError;
use crate::geo::DEFAULT_TILE_SIZE;

use super::set::Tile;

/// Fully transparent background pixel.
const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

// =============================================================================
// PNG Encoder
// =============================================================================

/// Composites and encodes tile images.
///
/// # Example
///
/// ```ignore
/// use hotspot_tiler::tile::PngTileEncoder;
///
/// let encoder = PngTileEncoder::new(256);
///
/// // A sorted tile from a TileSet
/// let tile: Tile = /* ... */;
///
/// let png = encoder.encode(&tile)?;
/// ```
#[derive(Debug, Clone, Copy)]
pub struct PngTileEncoder {
    tile_size: u32,
}

impl Default for PngTileEncoder {
    fn default() -> Self {
        Self::new(DEFAULT_TILE_SIZE)
    }
}

impl PngTileEncoder {
    /// Create an encoder for tiles of `tile_size`×`tile_size` pixels.
    pub fn new(tile_size: u32) -> Self {
        Self { tile_size }
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Draw every placemark icon of `tile` at its local box.
    pub fn compose(&self, tile: &Tile) -> RgbaImage {
        let mut canvas = RgbaImage::from_pixel(self.tile_size, self.tile_size, TRANSPARENT);

        for placemark in tile.placemarks() {
            image::imageops::overlay(
                &mut canvas,
                &*placemark.icon,
                placemark.local_box.left as i64,
                placemark.local_box.top as i64,
            );
        }

        canvas
    }

    /// Compose `tile` and encode it as PNG.
    ///
    /// # Errors
    ///
    /// Returns an error if PNG encoding fails.
    pub fn encode(&self, tile: &Tile) -> Result<Bytes, OutputError> {
        let canvas = self.compose(tile);

        let mut output = Vec::new();
        PngEncoder::new(&mut output)
            .write_image(
                canvas.as_raw(),
                canvas.width(),
                canvas.height(),
                ExtendedColorType::Rgba8,
            )
            .map_err(|e| OutputError::Encode {
                message: e.to_string(),
            })?;

        Ok(Bytes::from(output))
    }
}

// =============================================================================
// Tests
// =============================================================================
