//! Raw map elements as delivered by the map-data service.
//!
//! Elements are read-only inputs to the pipeline. Geometry fields are kept
//! optional because the upstream service does not guarantee their presence;
//! classification lives in [`crate::normalise`].

use std::collections::BTreeMap;
use std::fmt;

/// Free-form key/value tags attached to an element.
pub type Tags = BTreeMap<String, String>;

/// Tag key holding an element's display name.
pub const NAME_TAG: &str = "name";

/// Element types published by the map-data service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementKind {
    /// A single coordinate.
    Node,
    /// An ordered list of border nodes.
    Way,
    /// A collection of other elements.
    Relation,
}

impl ElementKind {
    /// Return the element type as used by the upstream service.
    ///
    /// # Examples
    /// ```
    /// use catchment_core::ElementKind;
    ///
    /// assert_eq!(ElementKind::Way.as_str(), "way");
    /// ```
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Node => "node",
            Self::Way => "way",
            Self::Relation => "relation",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ElementKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "node" => Ok(Self::Node),
            "way" => Ok(Self::Way),
            "relation" => Ok(Self::Relation),
            _ => Err(format!("unknown element kind '{s}'")),
        }
    }
}

/// Identifier of a raw element.
///
/// Numeric identifiers are only unique within one [`ElementKind`], so the kind
/// is part of the key.
///
/// # Examples
/// ```
/// use catchment_core::ElementId;
///
/// assert_eq!(ElementId::way(42).to_string(), "way/42");
/// assert_ne!(ElementId::way(42), ElementId::node(42));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId {
    /// Element type.
    pub kind: ElementKind,
    /// Numeric identifier within `kind`.
    pub id: u64,
}

impl ElementId {
    /// Identifier of a node element.
    pub const fn node(id: u64) -> Self {
        Self {
            kind: ElementKind::Node,
            id,
        }
    }

    /// Identifier of a way element.
    pub const fn way(id: u64) -> Self {
        Self {
            kind: ElementKind::Way,
            id,
        }
    }

    /// Identifier of a relation element.
    pub const fn relation(id: u64) -> Self {
        Self {
            kind: ElementKind::Relation,
            id,
        }
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind, self.id)
    }
}

/// Identifier of a border node referenced by a way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One element returned by the map-data service.
///
/// Points carry `lat`/`lon`; polygons carry the ordered border-node list in
/// `nodes`. Either may be absent, in which case the element cannot be
/// located.
///
/// # Examples
/// ```
/// use catchment_core::{ElementId, RawElement};
///
/// let shop = RawElement::point(7, -36.88, 174.76).with_name("Countdown Mt Eden");
/// assert_eq!(shop.id, ElementId::node(7));
/// assert_eq!(shop.name(), Some("Countdown Mt Eden"));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawElement {
    /// Source identifier.
    pub id: ElementId,
    /// Latitude in WGS84 degrees.
    pub lat: Option<f64>,
    /// Longitude in WGS84 degrees.
    pub lon: Option<f64>,
    /// Border-node identifiers in boundary order.
    pub nodes: Option<Vec<NodeId>>,
    /// Element tags, if the service returned any.
    pub tags: Option<Tags>,
}

impl Default for ElementId {
    fn default() -> Self {
        Self::node(0)
    }
}

impl RawElement {
    /// A node carrying direct coordinates and no tags.
    pub fn point(id: u64, lat: f64, lon: f64) -> Self {
        Self {
            id: ElementId::node(id),
            lat: Some(lat),
            lon: Some(lon),
            ..Self::default()
        }
    }

    /// A way carrying a border-node list and no tags.
    pub fn polygon<I>(id: u64, nodes: I) -> Self
    where
        I: IntoIterator<Item = u64>,
    {
        Self {
            id: ElementId::way(id),
            nodes: Some(nodes.into_iter().map(NodeId).collect()),
            ..Self::default()
        }
    }

    /// Attach a tag, creating the tag map when absent.
    #[must_use]
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags
            .get_or_insert_with(Tags::new)
            .insert(key.into(), value.into());
        self
    }

    /// Attach a `name` tag.
    #[must_use]
    pub fn with_name(self, name: impl Into<String>) -> Self {
        self.with_tag(NAME_TAG, name)
    }

    /// Return the `name` tag, if any.
    pub fn name(&self) -> Option<&str> {
        self.tags
            .as_ref()
            .and_then(|tags| tags.get(NAME_TAG))
            .map(String::as_str)
    }

    /// Return the first border node, treating an empty list as absent.
    pub fn first_border_node(&self) -> Option<NodeId> {
        self.nodes.as_deref().and_then(<[NodeId]>::first).copied()
    }
}
