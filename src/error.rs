use std::path::PathBuf;

use thiserror::Error;

/// Errors raised when a geographic coordinate is outside the projection domain
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeoError {
    /// Longitude or latitude is NaN or infinite
    #[error("Non-finite coordinate: lng={lng}, lat={lat}")]
    NonFinite { lng: f64, lat: f64 },

    /// Latitude at or beyond the poles, where the projection diverges
    #[error("Latitude {lat} is outside the projection domain (must be within (-90, 90))")]
    LatitudeOutOfDomain { lat: f64 },
}

/// Errors related to tile addressing and placemark fragmentation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TileError {
    /// Box is larger than one tile edge and cannot be split by neighbor offsets
    #[error("Unsupported geometry: {width}x{height} box does not fit the {tile_size}px tile edge")]
    UnsupportedGeometry {
        width: i32,
        height: i32,
        tile_size: u32,
    },

    /// Zoom level beyond what the pixel space can address
    #[error("Invalid zoom level {zoom}: maximum is {max}")]
    InvalidZoom { zoom: u8, max: u8 },

    /// Tile edge length outside the supported range
    #[error("Invalid tile size {size}: must be between 1 and {max}")]
    InvalidTileSize { size: u32, max: u32 },
}

/// Errors that can occur while loading markers from a data source
#[derive(Debug, Clone, Error)]
pub enum SourceError {
    /// The marker file could not be read
    #[error("I/O error reading {path}: {message}")]
    Io { path: PathBuf, message: String },

    /// The marker file is not valid marker JSON (including missing required fields)
    #[error("Invalid marker data: {0}")]
    Parse(String),

    /// An icon referenced by a marker could not be opened or decoded
    #[error("Failed to load icon {path}: {message}")]
    Icon { path: PathBuf, message: String },

    /// A marker carries coordinates the projection cannot handle
    #[error("Marker #{index}: {source}")]
    InvalidMarker {
        index: usize,
        #[source]
        source: GeoError,
    },
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        SourceError::Parse(err.to_string())
    }
}

/// Errors produced while rendering or writing a finished tile
#[derive(Debug, Clone, Error)]
pub enum OutputError {
    /// Filesystem error
    #[error("I/O error at {path}: {message}")]
    Io { path: PathBuf, message: String },

    /// PNG encoding failed
    #[error("Failed to encode tile image: {message}")]
    Encode { message: String },

    /// Script serialization failed
    #[error("Failed to serialize tile script: {0}")]
    Script(String),
}

impl From<serde_json::Error> for OutputError {
    fn from(err: serde_json::Error) -> Self {
        OutputError::Script(err.to_string())
    }
}

/// Errors surfaced by the pyramid driver
#[derive(Debug, Clone, Error)]
pub enum PyramidError {
    /// Marker coordinates outside the projection domain
    #[error("Geo error: {0}")]
    Geo(#[from] GeoError),

    /// Tile addressing or fragmentation error
    #[error("Tile error: {0}")]
    Tile(#[from] TileError),

    /// The tile consumer failed
    #[error("Output error: {0}")]
    Output(#[from] OutputError),

    /// Minimum zoom is greater than maximum zoom
    #[error("Invalid zoom range: {min}..={max}")]
    InvalidZoomRange { min: u8, max: u8 },

    /// A per-zoom worker panicked or was cancelled
    #[error("Zoom worker failed: {0}")]
    Worker(String),
}
