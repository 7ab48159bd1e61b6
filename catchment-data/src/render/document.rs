//! Leaflet HTML document assembly.

use catchment_core::{MapFeature, RenderError};
use geo::{Coord, LineString, Polygon};
use serde::Serialize;

use super::tiles::TileSet;

const LEAFLET_VERSION: &str = "1.9.4";

/// One outlet as embedded in the page script.
#[derive(Debug, Serialize)]
pub(crate) struct Layer<'a> {
    pub(crate) name: &'a str,
    pub(crate) chain: &'a str,
    pub(crate) colour: &'a str,
    pub(crate) popup: String,
    /// `[lat, lon]` as Leaflet expects.
    pub(crate) marker: [f64; 2],
    pub(crate) isochrone: GeoJsonPolygon,
}

/// GeoJSON geometry object for a polygon.
#[derive(Debug, Serialize)]
pub(crate) struct GeoJsonPolygon {
    #[serde(rename = "type")]
    kind: &'static str,
    coordinates: Vec<Vec<[f64; 2]>>,
}

impl From<&Polygon<f64>> for GeoJsonPolygon {
    fn from(polygon: &Polygon<f64>) -> Self {
        let ring = |line: &LineString<f64>| -> Vec<[f64; 2]> {
            line.coords().map(|c| [c.x, c.y]).collect()
        };
        let coordinates = std::iter::once(polygon.exterior())
            .chain(polygon.interiors())
            .map(ring)
            .collect();
        Self {
            kind: "Polygon",
            coordinates,
        }
    }
}

/// Popup text: the display name, then the reachable population if known.
pub(crate) fn popup_text(feature: &MapFeature) -> String {
    match feature.isochrone.total_population {
        Some(population) if population.is_finite() => {
            format!("{}, Population: {:.0}", feature.display_name, population.trunc())
        }
        _ => feature.display_name.clone(),
    }
}

/// Serialise one feature into the JSON object embedded in the page.
pub(crate) fn encode_layer(feature: &MapFeature, colour: &str) -> Result<String, RenderError> {
    let layer = Layer {
        name: &feature.display_name,
        chain: &feature.chain,
        colour,
        popup: popup_text(feature),
        marker: [feature.location.y, feature.location.x],
        isochrone: GeoJsonPolygon::from(&feature.isochrone.polygon),
    };
    serde_json::to_string(&layer)
        .map(|json| escape_script(&json))
        .map_err(|err| RenderError::Encode {
            id: feature.id,
            message: err.to_string(),
        })
}

/// Keep embedded text from changing the HTML parser state inside the
/// surrounding `<script>` element (`</script>`, `<!--`, `-->`).
///
/// The replacements are JSON and JavaScript string escapes, so the decoded
/// value is unchanged.
fn escape_script(json: &str) -> String {
    json.replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026")
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Page-level settings.
pub(crate) struct Page<'a> {
    pub(crate) title: &'a str,
    pub(crate) centre: Coord<f64>,
    pub(crate) zoom: u8,
    pub(crate) tiles: TileSet,
}

/// Assemble the complete HTML document from pre-encoded layers.
pub(crate) fn html_document(page: &Page<'_>, layers: &[String]) -> String {
    let title = escape_html(page.title);
    let layers = layers.join(",\n");
    let Coord { x: lon, y: lat } = page.centre;
    let zoom = page.zoom;
    let tile_url = page.tiles.url_template();
    let attribution = escape_script(&page.tiles.attribution().replace('\'', "\\'"));
    format!(
        r##"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{title}</title>
<link rel="stylesheet" href="https://unpkg.com/leaflet@{LEAFLET_VERSION}/dist/leaflet.css">
<script src="https://unpkg.com/leaflet@{LEAFLET_VERSION}/dist/leaflet.js"></script>
<style>html, body, #map {{ height: 100%; margin: 0; }}</style>
</head>
<body>
<div id="map"></div>
<script>
const layers = [
{layers}
];
const map = L.map('map').setView([{lat}, {lon}], {zoom});
L.tileLayer('{tile_url}', {{ maxZoom: 19, attribution: '{attribution}' }}).addTo(map);
for (const layer of layers) {{
  L.geoJSON(layer.isochrone, {{ style: {{ color: layer.colour }} }}).addTo(map);
  const popup = document.createElement('span');
  popup.textContent = layer.popup;
  L.circleMarker(layer.marker, {{ radius: 6, color: layer.colour, fillOpacity: 0.9 }})
    .bindPopup(popup)
    .addTo(map);
}}
</script>
</body>
</html>
"##
    )
}
