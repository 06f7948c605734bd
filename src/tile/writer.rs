//! Writing finished tiles to disk.
//!
//! # Layout
//!
//! ```text
//! <base>/
//! ├── png/<zoom>/tile-<x>-<y>.png
//! └── js/<zoom>/tile-<x>-<y>.js
//! ```
//!
//! Zoom is part of every path, so zoom levels never write to the same file
//! and may be generated concurrently.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use crate::error::OutputError;
use crate::geo::{TileAddress, DEFAULT_TILE_SIZE};

use super::encoder::PngTileEncoder;
use super::script::ScriptFormat;
use super::set::Tile;

/// Default layer name, used as the tile name prefix.
pub const DEFAULT_BASE_NAME: &str = "myLayer";

/// Default URL directory the client loads tiles from.
pub const DEFAULT_TILES_DIR: &str = "tiles";

const IMAGE_EXT: &str = "png";
const SCRIPT_EXT: &str = "js";

fn relative_path(ext: &str, zoom: &str, x: &str, y: &str) -> String {
    format!("{ext}/{zoom}/tile-{x}-{y}.{ext}")
}

fn layer_name(base_name: &str, x: &str, y: &str, zoom: &str) -> String {
    format!("{base_name}-{x}-{y}-{zoom}")
}

// =============================================================================
// Tile Consumer
// =============================================================================

/// Receives each finished (sorted) tile of a pyramid.
///
/// Consumers are shared between zoom workers, so they take `&self`.
pub trait TileConsumer: Send + Sync {
    fn consume(&self, tile: &Tile) -> Result<(), OutputError>;
}

// =============================================================================
// Tile Writer
// =============================================================================

/// Writes a PNG image and a JS script for every tile.
#[derive(Debug, Clone)]
pub struct TileWriter {
    base_path: PathBuf,
    base_name: String,
    format: ScriptFormat,
    encoder: PngTileEncoder,
}

impl TileWriter {
    /// Create a writer rooted at `base_path` with default name, format and tile size.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            base_name: DEFAULT_BASE_NAME.to_string(),
            format: ScriptFormat::default(),
            encoder: PngTileEncoder::new(DEFAULT_TILE_SIZE),
        }
    }

    /// Set the layer name used in tile names.
    pub fn with_base_name(mut self, base_name: impl Into<String>) -> Self {
        self.base_name = base_name.into();
        self
    }

    /// Set the script format.
    pub fn with_format(mut self, format: ScriptFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the tile edge length of the rendered images.
    pub fn with_tile_size(mut self, tile_size: u32) -> Self {
        self.encoder = PngTileEncoder::new(tile_size);
        self
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    pub fn format(&self) -> ScriptFormat {
        self.format
    }

    /// Path of a tile artifact, e.g. `<base>/png/10/tile-684-315.png`.
    pub fn tile_path(&self, zoom: u8, address: TileAddress, ext: &str) -> PathBuf {
        let ext = ext.to_lowercase();
        self.base_path.join(relative_path(
            &ext,
            &zoom.to_string(),
            &address.x.to_string(),
            &address.y.to_string(),
        ))
    }

    /// Layer-qualified tile name, e.g. `myLayer-684-315-10`.
    pub fn tile_name(&self, zoom: u8, address: TileAddress) -> String {
        layer_name(
            &self.base_name,
            &address.x.to_string(),
            &address.y.to_string(),
            &zoom.to_string(),
        )
    }

    /// Remove everything under the base path. Missing directories are fine.
    pub fn clear(&self) -> Result<(), OutputError> {
        match fs::remove_dir_all(&self.base_path) {
            Ok(()) => {
                debug!("Removed {}", self.base_path.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(OutputError::Io {
                path: self.base_path.clone(),
                message: e.to_string(),
            }),
        }
    }

    fn write_file(path: &Path, contents: &[u8]) -> Result<(), OutputError> {
        let io_error = |e: std::io::Error| OutputError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_error)?;
        }
        fs::write(path, contents).map_err(io_error)
    }
}

impl TileConsumer for TileWriter {
    fn consume(&self, tile: &Tile) -> Result<(), OutputError> {
        let address = tile.address();
        debug!(
            "Generating tile ({}, {}) at zoom {} with {} placemark(s)",
            address.x,
            address.y,
            tile.zoom(),
            tile.len()
        );

        let image = self.encoder.encode(tile)?;
        Self::write_file(&self.tile_path(tile.zoom(), address, IMAGE_EXT), &image)?;

        let name = self.tile_name(tile.zoom(), address);
        let script = self.format.render(tile, &name)?;
        Self::write_file(
            &self.tile_path(tile.zoom(), address, SCRIPT_EXT),
            script.as_bytes(),
        )
    }
}

// =============================================================================
// View Context
// =============================================================================

/// URL and name templates the client needs to load the layer.
///
/// Placeholders follow the client convention: `%x`, `%y` tile column/row,
/// `%z` zoom, `%e` extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewContext {
    pub source_url: String,
    pub source_name: String,
}

impl ViewContext {
    pub fn new(tiles_dir: &str, base_name: &str) -> Self {
        let tiles_dir = tiles_dir.trim_end_matches('/');
        Self {
            source_url: format!("{tiles_dir}/{}", relative_path("%e", "%z", "%x", "%y")),
            source_name: layer_name(base_name, "%x", "%y", "%z"),
        }
    }
}

impl Default for ViewContext {
    fn default() -> Self {
        Self::new(DEFAULT_TILES_DIR, DEFAULT_BASE_NAME)
    }
}

// =============================================================================
// Tests
// =============================================================================
