//! # Hotspot Tiler
//!
//! Pre-renders point markers into transparent Web-Mercator map tiles.
//!
//! Given a set of geo-located markers, each with an icon bitmap and a pixel
//! offset, the library decides for every zoom level which tile each icon lands
//! on, splits icons that straddle tile edges into per-tile fragments, sorts
//! each tile's contents top to bottom and assigns priorities. Finished tiles
//! are handed to a consumer; the bundled [`TileWriter`] composites a PNG and a
//! hotspot script per tile so the client can make the icons clickable.
//!
//! ## Features
//!
//! - **Ellipsoidal Mercator**: WGS84 projection with the reference constants
//! - **Edge splitting**: icons crossing right/bottom tile edges are fragmented
//! - **Deterministic output**: tiles ordered by address, placemarks top to bottom
//! - **Script formats**: client API v1 (`YMaps.Hotspots.Loader`) and v2 (GeoJSON)
//! - **Parallel zooms**: zoom levels are independent and can run concurrently
//!
//! ## Architecture
//!
//! - [`geo`] - projection and tile/pixel addressing
//! - [`placemark`] - icon placement and edge fragmentation
//! - [`tile`] - tile aggregation, PNG compositing, scripts, output
//! - [`source`] - the [`Marker`] trait and the JSON marker source
//! - [`pyramid`] - per-zoom pipeline driver
//! - [`config`] - CLI and configuration types
//!
//! ## Example
//!
//! ```rust,no_run
//! use hotspot_tiler::{load_markers, IconCache, PyramidDriver, TileWriter, ZoomRange};
//! use std::path::Path;
//!
//! let mut icons = IconCache::new();
//! let markers = load_markers(Path::new("markers.json"), &mut icons).unwrap();
//!
//! let writer = TileWriter::new("tiles").with_base_name("cafes");
//! let stats = PyramidDriver::default()
//!     .generate(&markers, ZoomRange::new(10, 16).unwrap(), &writer)
//!     .unwrap();
//! println!("{} tiles", stats.tiles);
//! ```

pub mod config;
pub mod error;
pub mod geo;
pub mod placemark;
pub mod pyramid;
pub mod source;
pub mod tile;

// Re-export commonly used types
pub use config::{Cli, Command, ContextConfig, GenerateConfig};
pub use error::{GeoError, OutputError, PyramidError, SourceError, TileError};
pub use geo::{project, GeoPoint, Offset, TileAddress, TileGrid, TileLocation};
pub use placemark::{fragment, Fragment, Icon, LocalBox, Placemark, PlacemarkData};
pub use pyramid::{GenerationStats, PyramidDriver, ZoomRange};
pub use source::{load_markers, parse_markers, IconCache, JsonMarker, Marker};
pub use tile::{
    PngTileEncoder, ScriptFormat, Tile, TileConsumer, TileSet, TileWriter, ViewContext,
};
