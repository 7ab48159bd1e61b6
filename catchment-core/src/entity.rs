//! Matched outlets and the ordered set that carries them through a run.

use geo::Coord;
use indexmap::IndexMap;
use indexmap::map::Entry;

use crate::element::{ElementId, NodeId};

/// Source geometry an entity was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryKind {
    /// A single coordinate.
    Point,
    /// A polygon described by border nodes.
    Polygon,
}

/// Where an entity sits on the map.
///
/// Coordinates use `x = longitude` and `y = latitude`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Location {
    /// Final coordinate.
    Resolved(Coord<f64>),
    /// Representative border node awaiting a coordinate lookup.
    Pending(NodeId),
}

impl Location {
    /// Return the border node still awaiting resolution.
    pub const fn pending(&self) -> Option<NodeId> {
        match self {
            Self::Pending(node) => Some(*node),
            Self::Resolved(_) => None,
        }
    }

    /// Return the final coordinate, if resolved.
    pub const fn coordinate(&self) -> Option<Coord<f64>> {
        match self {
            Self::Resolved(coord) => Some(*coord),
            Self::Pending(_) => None,
        }
    }
}

/// One matched outlet before border-node resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    /// Identifier copied from the source element.
    pub id: ElementId,
    /// Matched target chain, lowercased.
    pub chain: String,
    /// Name tag in its original casing.
    pub display_name: String,
    /// Geometry the entity was derived from.
    pub kind: GeometryKind,
    /// Final coordinate or pending border node.
    pub location: Location,
}

/// One matched outlet with its final coordinate.
///
/// Produced only by [`crate::resolve::resolve_entities`], so holding a value
/// of this type means no border-node reference remains.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedEntity {
    /// Identifier copied from the source element.
    pub id: ElementId,
    /// Matched target chain, lowercased.
    pub chain: String,
    /// Name tag in its original casing.
    pub display_name: String,
    /// Geometry the entity was derived from.
    pub kind: GeometryKind,
    /// Final coordinate (`x = longitude`, `y = latitude`).
    pub location: Coord<f64>,
}

impl ResolvedEntity {
    /// Build a resolved entity from `entity` and its final coordinate.
    pub fn new(entity: Entity, location: Coord<f64>) -> Self {
        Self {
            id: entity.id,
            chain: entity.chain,
            display_name: entity.display_name,
            kind: entity.kind,
            location,
        }
    }

    /// Return the coordinate as a `[lat, lon]` pair.
    pub const fn lat_lon(&self) -> [f64; 2] {
        [self.location.y, self.location.x]
    }
}

/// Entities keyed by identifier.
///
/// Iteration order is insertion order, which is the order the filter
/// encountered the source elements. Every later stage resolves and enriches
/// entities in this order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntitySet {
    entries: IndexMap<ElementId, Entity>,
}

impl EntitySet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `entity` unless its identifier is already present.
    ///
    /// Returns the rejected entity when the key is taken; the existing entry
    /// is left untouched.
    pub fn insert(&mut self, entity: Entity) -> Result<(), Entity> {
        match self.entries.entry(entity.id) {
            Entry::Occupied(_) => Err(entity),
            Entry::Vacant(slot) => {
                slot.insert(entity);
                Ok(())
            }
        }
    }

    /// Look up an entity by identifier.
    pub fn get(&self, id: &ElementId) -> Option<&Entity> {
        self.entries.get(id)
    }

    /// Number of entities.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entities in filter order.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entries.values()
    }
}

impl IntoIterator for EntitySet {
    type Item = Entity;
    type IntoIter = indexmap::map::IntoValues<ElementId, Entity>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_values()
    }
}
