//! Overpass JSON response types.
//!
//! See: <https://wiki.openstreetmap.org/wiki/Overpass_API/Output_Formats#JSON>

use catchment_core::{ElementId, ElementKind, NodeCoordinate, NodeId, RawElement, Tags};
use log::debug;
use serde::Deserialize;

/// Top-level Overpass JSON document.
#[derive(Debug, Deserialize)]
pub struct OverpassResponse {
    /// Elements in output order.
    #[serde(default)]
    pub elements: Vec<OverpassElement>,
    /// Server note; runtime errors such as query timeouts are reported here
    /// with a `200 OK` status.
    pub remark: Option<String>,
}

impl OverpassResponse {
    /// Return the runtime error reported in `remark`, if any.
    pub fn runtime_error(&self) -> Option<&str> {
        self.remark
            .as_deref()
            .filter(|remark| remark.contains("runtime error"))
    }
}

/// One element of an Overpass JSON document.
#[derive(Debug, Clone, Deserialize)]
pub struct OverpassElement {
    /// Element type (`node`, `way`, `relation`, ...).
    #[serde(rename = "type")]
    pub kind: String,
    /// Numeric identifier within `kind`.
    pub id: u64,
    /// Latitude for nodes.
    pub lat: Option<f64>,
    /// Longitude for nodes.
    pub lon: Option<f64>,
    /// Border-node identifiers for ways.
    pub nodes: Option<Vec<u64>>,
    /// Tags, absent on untagged elements.
    pub tags: Option<Tags>,
}

impl OverpassElement {
    /// Convert into a [`RawElement`], skipping element types the pipeline
    /// does not know.
    pub fn into_raw(self) -> Option<RawElement> {
        let Ok(kind) = self.kind.parse::<ElementKind>() else {
            debug!("Skipping Overpass element {}/{}", self.kind, self.id);
            return None;
        };
        Some(RawElement {
            id: ElementId { kind, id: self.id },
            lat: self.lat,
            lon: self.lon,
            nodes: self
                .nodes
                .map(|nodes| nodes.into_iter().map(NodeId).collect()),
            tags: self.tags,
        })
    }

    /// Convert a located node into a [`NodeCoordinate`].
    pub fn into_node_coordinate(self) -> Option<NodeCoordinate> {
        if self.kind != ElementKind::Node.as_str() {
            return None;
        }
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some(NodeCoordinate::new(self.id, lat, lon)),
            _ => None,
        }
    }
}
