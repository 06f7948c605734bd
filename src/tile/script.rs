//! Hotspot tile scripts.
//!
//! Every image tile is accompanied by a JavaScript file that tells the map
//! client where the clickable regions are and what data they carry. Two
//! client API generations are supported:
//!
//! - [`ScriptFormat::V1`]: `YMaps.Hotspots.Loader.onLoad(name, {objects: [...]})`,
//!   one object per placemark with its data, geographic anchor, box and priority
//! - [`ScriptFormat::V2`]: `hotspot_callback({data: FeatureCollection})`, one
//!   `Feature` per placemark whose properties carry the data and the rendered
//!   rectangle
//!
//! Output is assembled from `serde_json` values; only the JS call wrappers
//! (and the `new YMaps.GeoPoint(...)` constructor in v1) are literal text.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::OutputError;
use crate::placemark::Placemark;

use super::set::Tile;

/// Loader call of the 1.x client API.
const V1_LOADER: &str = "YMaps.Hotspots.Loader.onLoad";

/// JSONP callback of the 2.x client API.
const V2_CALLBACK: &str = "hotspot_callback";

/// Properties key under which v2 features carry their rectangle.
const V2_METADATA_KEY: &str = "HotspotMetaData";

/// Client API generation the tile scripts target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptFormat {
    /// Maps JS API 1.x
    V1,

    /// Maps JS API 2.x hotspot object source
    #[default]
    V2,
}

impl ScriptFormat {
    /// Render the script for a sorted tile.
    ///
    /// `name` is the layer-qualified tile name; only v1 embeds it.
    pub fn render(&self, tile: &Tile, name: &str) -> Result<String, OutputError> {
        match self {
            ScriptFormat::V1 => render_v1(tile, name),
            ScriptFormat::V2 => render_v2(tile),
        }
    }
}

impl std::fmt::Display for ScriptFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScriptFormat::V1 => write!(f, "v1"),
            ScriptFormat::V2 => write!(f, "v2"),
        }
    }
}

// =============================================================================
// Version 1
// =============================================================================

fn render_v1(tile: &Tile, name: &str) -> Result<String, OutputError> {
    let objects = tile
        .placemarks()
        .iter()
        .map(v1_object)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(format!(
        "{V1_LOADER}({},{{\"objects\":[{}]}});",
        serde_json::to_string(name)?,
        objects.join(",")
    ))
}

fn v1_object(placemark: &Placemark) -> Result<String, OutputError> {
    let data = serde_json::to_string(placemark.data.as_ref())?;
    let geometry = serde_json::to_string(&placemark.local_box.to_array())?;
    let priority = serde_json::to_string(&placemark.priority)?;

    Ok(format!(
        concat!(
            "{{\"data\":{data},\"base\":new YMaps.GeoPoint({lng},{lat}),",
            "\"geometry\":{geometry},\"priority\":{priority}}}"
        ),
        data = data,
        lng = placemark.lng,
        lat = placemark.lat,
        geometry = geometry,
        priority = priority,
    ))
}

// =============================================================================
// Version 2
// =============================================================================

fn render_v2(tile: &Tile) -> Result<String, OutputError> {
    let features: Vec<Value> = tile.placemarks().iter().map(v2_feature).collect();

    let payload = json!({
        "data": {
            "type": "FeatureCollection",
            "features": features,
        }
    });

    Ok(format!("{V2_CALLBACK}({});", serde_json::to_string(&payload)?))
}

fn v2_feature(placemark: &Placemark) -> Value {
    let b = placemark.local_box;

    let mut properties = placemark.data.as_ref().clone();
    properties.insert(
        V2_METADATA_KEY.to_string(),
        json!({
            "RenderedGeometry": {
                "type": "Rectangle",
                "coordinates": [[b.left, b.top], [b.right, b.bottom]],
            }
        }),
    );

    json!({
        "type": "Feature",
        "properties": properties,
    })
}

// =============================================================================
// Tests
// =============================================================================
