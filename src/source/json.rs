//! Markers loaded from a JSON file.
//!
//! # Format
//!
//! A JSON array of marker records:
//!
//! ```json
//! [
//!   {
//!     "lng": 60.597223,
//!     "lat": 56.837992,
//!     "icon": "icons/pin.png",
//!     "offset": [-20, -8],
//!     "name": "Plotinka",
//!     "description": "City pond dam",
//!     "data": { "id": 17 }
//!   }
//! ]
//! ```
//!
//! `lng`, `lat` and `icon` are required. `offset` is `[top, left]` in pixels.
//! Relative icon paths are resolved against the directory of the marker file.
//! Keys in `data` are merged with `name`/`description` and win on conflict.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;
use tracing::info;

use crate::error::SourceError;
use crate::geo::{GeoPoint, Offset};
use crate::placemark::{Icon, PlacemarkData};

use super::icons::IconCache;
use super::{default_data, Marker};

/// One marker as written in the JSON file.
#[derive(Debug, Clone, Deserialize)]
pub struct MarkerRecord {
    pub lng: f64,
    pub lat: f64,
    pub icon: PathBuf,

    /// `[top, left]`
    #[serde(default)]
    pub offset: Option<[i32; 2]>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub data: Option<PlacemarkData>,
}

/// A marker from a JSON file with its icon decoded.
#[derive(Debug, Clone)]
pub struct JsonMarker {
    lng: f64,
    lat: f64,
    icon: Icon,
    offset: Offset,
    name: Option<String>,
    description: Option<String>,
    data: Arc<PlacemarkData>,
}

impl JsonMarker {
    fn from_record(record: MarkerRecord, icon: Icon) -> Self {
        let mut data = default_data(record.name.clone(), record.description.clone());
        if let Some(extra) = record.data {
            data.extend(extra);
        }

        let offset = record
            .offset
            .map(|[top, left]| Offset::new(top, left))
            .unwrap_or_default();

        Self {
            lng: record.lng,
            lat: record.lat,
            icon,
            offset,
            name: record.name,
            description: record.description,
            data: Arc::new(data),
        }
    }
}

impl Marker for JsonMarker {
    fn longitude(&self) -> f64 {
        self.lng
    }

    fn latitude(&self) -> f64 {
        self.lat
    }

    fn icon(&self, _zoom: u8) -> Icon {
        Arc::clone(&self.icon)
    }

    fn offset(&self, _zoom: u8) -> Offset {
        self.offset
    }

    fn name(&self) -> Option<String> {
        self.name.clone()
    }

    fn description(&self) -> Option<String> {
        self.description.clone()
    }

    fn data(&self) -> Arc<PlacemarkData> {
        Arc::clone(&self.data)
    }
}

/// Parse marker JSON, resolving relative icon paths against `base_dir`.
///
/// # Errors
///
/// Fails on malformed JSON or missing required fields, on coordinates outside
/// the projection domain, and on icons that cannot be loaded.
pub fn parse_markers(
    json: &str,
    base_dir: &Path,
    icons: &mut IconCache,
) -> Result<Vec<JsonMarker>, SourceError> {
    let records: Vec<MarkerRecord> = serde_json::from_str(json)?;

    let mut markers = Vec::with_capacity(records.len());
    for (index, record) in records.into_iter().enumerate() {
        GeoPoint::new(record.lng, record.lat)
            .map_err(|source| SourceError::InvalidMarker { index, source })?;

        let icon_path = if record.icon.is_absolute() {
            record.icon.clone()
        } else {
            base_dir.join(&record.icon)
        };
        let icon = icons.get_or_load(&icon_path)?;

        markers.push(JsonMarker::from_record(record, icon));
    }

    Ok(markers)
}

/// Read and parse a marker file.
pub fn load_markers(path: &Path, icons: &mut IconCache) -> Result<Vec<JsonMarker>, SourceError> {
    let json = fs::read_to_string(path).map_err(|e| SourceError::Io {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let markers = parse_markers(&json, base_dir, icons)?;

    info!(
        "Loaded {} marker(s) from {} ({} distinct icon(s))",
        markers.len(),
        path.display(),
        icons.loads()
    );

    Ok(markers)
}
