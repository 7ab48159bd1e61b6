//! Batch resolution of polygon entities' border nodes.
//!
//! Every pending border node is looked up in contiguous batches of at most
//! `batch_size` identifiers. Results from all batches are accumulated before
//! any correlation happens, then indexed by identifier once. The lookup
//! service may return results in any order, so position in a response never
//! identifies an entity.

mod error;

use std::collections::{HashMap, HashSet};
use std::num::NonZeroUsize;
use std::slice::Chunks;

use geo::Coord;
use log::{debug, warn};

use crate::element::NodeId;
use crate::entity::{EntitySet, Location, ResolvedEntity};
use crate::service::{BorderNodeLookup, NodeCoordinate};

pub use error::{ResolveError, UnresolvedReference};

/// Default number of border nodes per lookup request.
pub const DEFAULT_BATCH_SIZE: NonZeroUsize = match NonZeroUsize::new(100) {
    Some(size) => size,
    None => NonZeroUsize::MIN,
};

/// Entities with final coordinates plus the ones that could not be located.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    /// Resolved entities in filter order.
    pub entities: Vec<ResolvedEntity>,
    /// Polygon entities excluded because their border node was not returned.
    pub unresolved: Vec<UnresolvedReference>,
}

/// Collect the pending border nodes of `entities` in entity order.
///
/// Duplicates are kept: two entities sharing a border node each contribute
/// one reference.
pub fn pending_references(entities: &EntitySet) -> Vec<NodeId> {
    entities
        .iter()
        .filter_map(|entity| entity.location.pending())
        .collect()
}

/// Split `nodes` into contiguous batches of at most `size` identifiers.
///
/// Batch `i` covers `[i * size, (i + 1) * size)`; the final batch holds the
/// remainder and is never empty.
///
/// # Examples
/// ```
/// use std::num::NonZeroUsize;
/// use catchment_core::{NodeId, resolve::batches};
///
/// let nodes: Vec<NodeId> = (0..101).map(NodeId).collect();
/// let size = NonZeroUsize::new(100).expect("non-zero");
/// let lengths: Vec<usize> = batches(&nodes, size).map(<[NodeId]>::len).collect();
/// assert_eq!(lengths, vec![100, 1]);
/// ```
pub fn batches(nodes: &[NodeId], size: NonZeroUsize) -> Chunks<'_, NodeId> {
    nodes.chunks(size.get())
}

/// Replace every pending border node in `entities` with its coordinate.
///
/// Point entities pass through untouched and never trigger a lookup. A
/// polygon entity whose node is missing from all results is reported in
/// [`Resolution::unresolved`] and excluded; the others are unaffected.
///
/// # Errors
///
/// Returns [`ResolveError::Lookup`] when any batch request fails.
pub fn resolve_entities(
    entities: EntitySet,
    lookup: &dyn BorderNodeLookup,
    batch_size: NonZeroUsize,
) -> Result<Resolution, ResolveError> {
    let pending = pending_references(&entities);
    let results = fetch_batches(&pending, lookup, batch_size)?;
    let coordinates = index_results(&pending, results);

    let mut resolution = Resolution::default();
    for entity in entities {
        let location = entity.location;
        match location {
            Location::Resolved(location) => {
                resolution.entities.push(ResolvedEntity::new(entity, location));
            }
            Location::Pending(node) => match coordinates.get(&node) {
                Some(&location) => {
                    resolution.entities.push(ResolvedEntity::new(entity, location));
                }
                None => {
                    let unresolved = UnresolvedReference {
                        id: entity.id,
                        node,
                        name: entity.display_name,
                    };
                    warn!("{unresolved}");
                    resolution.unresolved.push(unresolved);
                }
            },
        }
    }
    Ok(resolution)
}

/// Issue one lookup per batch and accumulate every result in a flat list.
fn fetch_batches(
    pending: &[NodeId],
    lookup: &dyn BorderNodeLookup,
    batch_size: NonZeroUsize,
) -> Result<Vec<NodeCoordinate>, ResolveError> {
    let mut accumulated = Vec::with_capacity(pending.len());
    for (batch, nodes) in batches(pending, batch_size).enumerate() {
        debug!("Looking up batch {batch} ({} border nodes)", nodes.len());
        let results = lookup
            .lookup_nodes(nodes)
            .map_err(|source| ResolveError::Lookup {
                batch,
                size: nodes.len(),
                source,
            })?;
        accumulated.extend(results);
    }
    Ok(accumulated)
}

/// Index accumulated results by identifier.
///
/// The first result for an identifier wins. Identifiers nobody asked for are
/// dropped.
fn index_results(
    requested: &[NodeId],
    results: Vec<NodeCoordinate>,
) -> HashMap<NodeId, Coord<f64>> {
    let requested: HashSet<NodeId> = requested.iter().copied().collect();
    let mut coordinates = HashMap::with_capacity(requested.len());
    for result in results {
        if !requested.contains(&result.id) {
            debug!("Ignoring unrequested border node {}", result.id);
            continue;
        }
        coordinates.entry(result.id).or_insert(result.location);
    }
    coordinates
}
