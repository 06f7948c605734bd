//! Marker sources.
//!
//! The pyramid driver reads markers through the [`Marker`] trait. Position
//! and icon are required methods with no default; offset and popup data are
//! optional and default to "no offset" and "name/description if present".
//!
//! [`JsonMarker`] is the bundled implementation: markers read from a JSON file
//! whose icons are decoded once through an [`IconCache`].

mod icons;
mod json;

use std::sync::Arc;

use serde_json::Value;

use crate::error::GeoError;
use crate::geo::{GeoPoint, Offset};
use crate::placemark::{Icon, PlacemarkData};

pub use icons::{IconCache, DEFAULT_ICON_CACHE_CAPACITY};
pub use json::{load_markers, parse_markers, JsonMarker, MarkerRecord};

/// A domain object that can be placed on the map.
pub trait Marker {
    /// Longitude in degrees.
    fn longitude(&self) -> f64;

    /// Latitude in degrees.
    fn latitude(&self) -> f64;

    /// Icon drawn for this marker at `zoom`.
    fn icon(&self, zoom: u8) -> Icon;

    /// Pixel offset `(top, left)` of the icon's top-left corner from the
    /// marker position at `zoom`.
    fn offset(&self, _zoom: u8) -> Offset {
        Offset::default()
    }

    /// Popup title.
    fn name(&self) -> Option<String> {
        None
    }

    /// Popup body.
    fn description(&self) -> Option<String> {
        None
    }

    /// Payload serialized into the tile script.
    fn data(&self) -> Arc<PlacemarkData> {
        Arc::new(default_data(self.name(), self.description()))
    }

    /// Validated geographic position.
    fn geo_point(&self) -> Result<GeoPoint, GeoError> {
        GeoPoint::new(self.longitude(), self.latitude())
    }
}

/// Build the standard payload: `name` and `description` keys when present.
pub fn default_data(name: Option<String>, description: Option<String>) -> PlacemarkData {
    let mut data = PlacemarkData::new();
    if let Some(name) = name {
        data.insert("name".to_string(), Value::String(name));
    }
    if let Some(description) = description {
        data.insert("description".to_string(), Value::String(description));
    }
    data
}
