//! Non-fatal issues recorded during a run.

use std::fmt;

use crate::element::{ElementId, NodeId};

/// A problem that excluded one element or entity without aborting the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A matching element had neither border nodes nor usable coordinates.
    Unclassifiable {
        /// Source element.
        id: ElementId,
        /// Its `name` tag.
        name: String,
    },
    /// A second element reused an identifier already taken by an entity.
    DuplicateElement {
        /// Repeated identifier.
        id: ElementId,
    },
    /// A polygon entity's border node was missing from every lookup result.
    UnresolvedReference {
        /// Affected entity.
        id: ElementId,
        /// Border node that could not be located.
        node: NodeId,
        /// Display name of the entity.
        name: String,
    },
}

impl Diagnostic {
    /// Identifier of the element or entity the diagnostic concerns.
    pub const fn id(&self) -> ElementId {
        match self {
            Self::Unclassifiable { id, .. }
            | Self::DuplicateElement { id }
            | Self::UnresolvedReference { id, .. } => *id,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unclassifiable { id, name } => {
                write!(f, "location {name} ({id}) does not appear to be readable")
            }
            Self::DuplicateElement { id } => {
                write!(f, "element {id} appeared more than once; keeping the first")
            }
            Self::UnresolvedReference { id, node, name } => write!(
                f,
                "border node {node} of {name} ({id}) was not returned by the lookup"
            ),
        }
    }
}
