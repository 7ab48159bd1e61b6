use thiserror::Error;

use crate::diagnostic::Diagnostic;
use crate::element::{ElementId, NodeId};
use crate::service::ServiceError;

/// Errors from [`crate::resolve::resolve_entities`].
///
/// A failed batch leaves nothing sensible to correlate against, so the whole
/// resolution step fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// The border-node lookup failed for one batch.
    #[error("border-node lookup failed for batch {batch} ({size} nodes): {source}")]
    Lookup {
        /// Zero-based batch index.
        batch: usize,
        /// Number of identifiers in the batch.
        size: usize,
        /// Service failure.
        #[source]
        source: ServiceError,
    },
}

/// A polygon entity whose border node was absent from every lookup result.
///
/// Recoverable: the entity is excluded and the run continues.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("border node {node} of {name} ({id}) was not returned by the lookup")]
pub struct UnresolvedReference {
    /// Affected entity.
    pub id: ElementId,
    /// Border node that could not be located.
    pub node: NodeId,
    /// Display name of the entity.
    pub name: String,
}

impl From<UnresolvedReference> for Diagnostic {
    fn from(unresolved: UnresolvedReference) -> Self {
        Self::UnresolvedReference {
            id: unresolved.id,
            node: unresolved.node,
            name: unresolved.name,
        }
    }
}
