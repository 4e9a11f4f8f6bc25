//! OpenStreetMap embed URLs for the map panel.

use serde::{Deserialize, Serialize};

use crate::model::Coordinates;

const EMBED_URL: &str = "https://www.openstreetmap.org/export/embed.html";
const LAYER: &str = "mapnik";

/// Half-width of the bounding box around a coordinate, in degrees.
pub const BBOX_DELTA: f64 = 0.15;

/// Encoded comma used between bbox and marker components.
const SEP: &str = "%2C";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MapMode {
    CoordinateCentered,
    NameSearch,
}

/// The map embed currently shown. Lives independently of weather results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapView {
    pub url: String,
    pub mode: MapMode,
}

/// Build the embed target for a city.
///
/// Coordinates win whenever they are supplied, even if they belong to an
/// earlier search than `city_name`. Returns `None` only for an empty name.
pub fn build_map_url(city_name: &str, coordinates: Option<Coordinates>) -> Option<MapView> {
    if city_name.is_empty() {
        return None;
    }

    let view = match coordinates {
        Some(Coordinates { lat, lon }) => {
            let bbox = [
                lon - BBOX_DELTA,
                lat - BBOX_DELTA,
                lon + BBOX_DELTA,
                lat + BBOX_DELTA,
            ]
            .map(|v| v.to_string())
            .join(SEP);

            MapView {
                url: format!("{EMBED_URL}?bbox={bbox}&layer={LAYER}&marker={lat}{SEP}{lon}"),
                mode: MapMode::CoordinateCentered,
            }
        }
        None => MapView {
            url: format!(
                "{EMBED_URL}?search={}&layer={LAYER}",
                urlencoding::encode(city_name)
            ),
            mode: MapMode::NameSearch,
        },
    };

    Some(view)
}
