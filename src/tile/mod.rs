//! Tile aggregation and output.
//!
//! This module turns placemarks of one zoom level into finished tiles and
//! writes them out.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            Pyramid Driver               │
//! └────────────────────┬────────────────────┘
//!                      │ placemarks per zoom
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │               TileSet                   │
//! │  (bucket by address, sort, priority)    │
//! └────────────────────┬────────────────────┘
//!                      │ sorted Tile
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │        TileConsumer (TileWriter)        │
//! │  ┌────────────────┐ ┌────────────────┐  │
//! │  │ PngTileEncoder │ │  ScriptFormat  │  │
//! │  │  (composite)   │ │   (v1 / v2)    │  │
//! │  └────────────────┘ └────────────────┘  │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Components
//!
//! - [`Tile`]: placemarks of one tile, sorted top to bottom with priorities
//! - [`TileSet`]: all tiles of one zoom level, ordered by address
//! - [`PngTileEncoder`]: composites icons onto a transparent canvas
//! - [`ScriptFormat`]: hotspot script generation for client API v1/v2
//! - [`TileConsumer`]: sink for finished tiles
//! - [`TileWriter`]: filesystem consumer writing PNG + JS per tile
//! - [`ViewContext`]: URL/name templates for the client

mod encoder;
mod script;
mod set;
mod writer;

pub use encoder::PngTileEncoder;
pub use script::ScriptFormat;
pub use set::{priority_for, Tile, TileSet};
pub use writer::{TileConsumer, TileWriter, ViewContext, DEFAULT_BASE_NAME, DEFAULT_TILES_DIR};
