//! Configuration management for the hotspot tiler.
//!
//! This module provides the command-line interface:
//! - Subcommands via clap (`generate`, `context`)
//! - Environment variables with `HOTSPOTS_` prefix
//! - Defaults for all optional settings
//!
//! # Example
//!
//! ```ignore
//! use hotspot_tiler::config::{Cli, Command};
//!
//! let cli = Cli::parse();
//! if let Command::Generate(config) = cli.into_command() {
//!     println!("Writing tiles to {}", config.output.display());
//! }
//! ```
//!
//! # Environment Variables
//!
//! - `HOTSPOTS_INPUT` - Marker file (JSON)
//! - `HOTSPOTS_OUTPUT` - Output directory (default: tiles)
//! - `HOTSPOTS_MIN_ZOOM` - First zoom level
//! - `HOTSPOTS_MAX_ZOOM` - Last zoom level (default: min zoom)
//! - `HOTSPOTS_BASE_NAME` - Layer name prefix (default: myLayer)
//! - `HOTSPOTS_FORMAT` - Script format, `v1` or `v2` (default: v2)
//! - `HOTSPOTS_TILE_SIZE` - Tile edge in pixels (default: 256)
//! - `HOTSPOTS_ICON_CACHE` - Max decoded icons to keep (default: 256)
//! - `HOTSPOTS_CONCURRENT` - Process zoom levels in parallel (default: false)
//! - `HOTSPOTS_TILES_DIR` - Tiles URL prefix printed by `context` (default: tiles)

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::error::PyramidError;
use crate::geo::{DEFAULT_TILE_SIZE, MAX_TILE_SIZE, MAX_ZOOM};
use crate::pyramid::ZoomRange;
use crate::source::DEFAULT_ICON_CACHE_CAPACITY;
use crate::tile::{ScriptFormat, DEFAULT_BASE_NAME, DEFAULT_TILES_DIR};

// =============================================================================
// CLI Arguments
// =============================================================================

/// Hotspot tiler - pre-renders map markers into transparent tiles.
///
/// Places marker icons on Web-Mercator tiles for a range of zoom levels and
/// writes one PNG image plus one hotspot script per non-empty tile.
#[derive(Parser, Debug, Clone)]
#[command(name = "hotspot-tiler")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn into_command(self) -> Command {
        self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Render marker tiles for a zoom range.
    Generate(GenerateConfig),

    /// Print the URL and name templates a map client needs to load the layer.
    Context(ContextConfig),
}

// =============================================================================
// Generate Command
// =============================================================================

#[derive(Args, Debug, Clone)]
pub struct GenerateConfig {
    /// JSON file with the markers to place.
    #[arg(long, short, env = "HOTSPOTS_INPUT")]
    pub input: PathBuf,

    /// Directory the tiles are written under.
    #[arg(long, short, default_value = DEFAULT_TILES_DIR, env = "HOTSPOTS_OUTPUT")]
    pub output: PathBuf,

    /// First zoom level to render.
    #[arg(long, env = "HOTSPOTS_MIN_ZOOM")]
    pub min_zoom: u8,

    /// Last zoom level to render (inclusive). Defaults to --min-zoom.
    #[arg(long, env = "HOTSPOTS_MAX_ZOOM")]
    pub max_zoom: Option<u8>,

    /// Prefix of the per-tile names passed to the client callback.
    #[arg(long, default_value = DEFAULT_BASE_NAME, env = "HOTSPOTS_BASE_NAME")]
    pub base_name: String,

    /// Hotspot script format.
    #[arg(long, value_enum, default_value_t = ScriptFormat::V2, env = "HOTSPOTS_FORMAT")]
    pub format: ScriptFormat,

    /// Tile edge length in pixels.
    #[arg(long, default_value_t = DEFAULT_TILE_SIZE, env = "HOTSPOTS_TILE_SIZE")]
    pub tile_size: u32,

    /// Maximum number of decoded icons to keep in memory.
    #[arg(long, default_value_t = DEFAULT_ICON_CACHE_CAPACITY, env = "HOTSPOTS_ICON_CACHE")]
    pub icon_cache: usize,

    /// Keep existing output instead of clearing it first.
    #[arg(long, default_value_t = false)]
    pub no_remove: bool,

    /// Render zoom levels in parallel.
    #[arg(long, default_value_t = false, env = "HOTSPOTS_CONCURRENT")]
    pub concurrent: bool,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl GenerateConfig {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.base_name.is_empty() {
            return Err("base_name must not be empty".to_string());
        }

        if self.tile_size == 0 || self.tile_size > MAX_TILE_SIZE {
            return Err(format!("tile_size must be between 1 and {}", MAX_TILE_SIZE));
        }

        if self.icon_cache == 0 {
            return Err("icon_cache must be greater than 0".to_string());
        }

        if self.min_zoom > MAX_ZOOM {
            return Err(format!("min_zoom must be at most {}", MAX_ZOOM));
        }

        if let Some(max_zoom) = self.max_zoom {
            if max_zoom > MAX_ZOOM {
                return Err(format!("max_zoom must be at most {}", MAX_ZOOM));
            }
            if max_zoom < self.min_zoom {
                return Err(format!(
                    "max_zoom ({}) must not be below min_zoom ({})",
                    max_zoom, self.min_zoom
                ));
            }
        }

        Ok(())
    }

    /// Zoom levels to render.
    pub fn zoom_range(&self) -> Result<ZoomRange, PyramidError> {
        ZoomRange::new(self.min_zoom, self.max_zoom.unwrap_or(self.min_zoom))
    }
}

// =============================================================================
// Context Command
// =============================================================================

#[derive(Args, Debug, Clone)]
pub struct ContextConfig {
    /// Tiles directory as seen by the client (relative URL).
    #[arg(long, default_value = DEFAULT_TILES_DIR, env = "HOTSPOTS_TILES_DIR")]
    pub tiles_dir: String,

    /// Layer name prefix used when generating.
    #[arg(long, default_value = DEFAULT_BASE_NAME, env = "HOTSPOTS_BASE_NAME")]
    pub base_name: String,
}

// =============================================================================
// Tests
// =============================================================================
