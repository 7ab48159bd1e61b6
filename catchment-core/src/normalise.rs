//! Geometry normalisation for raw elements.
//!
//! Decides whether an element can become an entity and, if so, what its
//! provisional location is. Polygons are represented by their first border
//! node rather than a centroid; the node is resolved to a coordinate later by
//! [`crate::resolve`].

use geo::Coord;

use crate::element::{NodeId, RawElement};
use crate::entity::{GeometryKind, Location};

/// Outcome of classifying one raw element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Classification {
    /// The element has no tags or no `name` tag.
    Ineligible,
    /// Direct coordinates; the location is final.
    Point(Coord<f64>),
    /// Border-node list; the location is the first node.
    Polygon(NodeId),
    /// Named, but carries neither a border-node list nor usable coordinates.
    Unclassifiable,
}

impl Classification {
    /// Split a locatable classification into geometry kind and location.
    pub const fn into_parts(self) -> Option<(GeometryKind, Location)> {
        match self {
            Self::Point(coord) => Some((GeometryKind::Point, Location::Resolved(coord))),
            Self::Polygon(node) => Some((GeometryKind::Polygon, Location::Pending(node))),
            Self::Ineligible | Self::Unclassifiable => None,
        }
    }
}

/// Classify `element`.
///
/// A non-empty border-node list takes precedence over direct coordinates.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use catchment_core::{Classification, NodeId, RawElement, classify};
///
/// let way = RawElement::polygon(2, [111, 222]).with_name("New World Metro");
/// assert_eq!(classify(&way), Classification::Polygon(NodeId(111)));
///
/// let node = RawElement::point(1, -36.88, 174.76).with_name("Countdown Mt Eden");
/// assert_eq!(classify(&node), Classification::Point(Coord { x: 174.76, y: -36.88 }));
///
/// let untagged = RawElement::point(3, -36.88, 174.76);
/// assert_eq!(classify(&untagged), Classification::Ineligible);
/// ```
pub fn classify(element: &RawElement) -> Classification {
    if element.name().is_none() {
        return Classification::Ineligible;
    }
    if let Some(node) = element.first_border_node() {
        return Classification::Polygon(node);
    }
    match (element.lat, element.lon) {
        (Some(lat), Some(lon)) => {
            validated_coord(lon, lat).map_or(Classification::Unclassifiable, Classification::Point)
        }
        _ => Classification::Unclassifiable,
    }
}

/// Build a coordinate from WGS84 degrees, rejecting non-finite or
/// out-of-range values.
pub fn validated_coord(lon: f64, lat: f64) -> Option<Coord<f64>> {
    (lon.is_finite()
        && lat.is_finite()
        && (-180.0..=180.0).contains(&lon)
        && (-90.0..=90.0).contains(&lat))
    .then_some(Coord { x: lon, y: lat })
}
