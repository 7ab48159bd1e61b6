//! Rendering sink receiving fully enriched entities.

use std::io;

use geo::Coord;
use thiserror::Error;

use crate::element::ElementId;
use crate::entity::ResolvedEntity;
use crate::isochrone::Isochrone;

/// One outlet ready for display.
#[derive(Debug, Clone, PartialEq)]
pub struct MapFeature {
    /// Source identifier.
    pub id: ElementId,
    /// Outlet coordinate (`x = longitude`, `y = latitude`).
    pub location: Coord<f64>,
    /// Name tag in its original casing.
    pub display_name: String,
    /// Matched chain, lowercased.
    pub chain: String,
    /// Reachability polygon around `location`.
    pub isochrone: Isochrone,
}

impl MapFeature {
    /// Pair a resolved entity with its isochrone.
    pub fn new(entity: ResolvedEntity, isochrone: Isochrone) -> Self {
        Self {
            id: entity.id,
            location: entity.location,
            display_name: entity.display_name,
            chain: entity.chain,
            isochrone,
        }
    }
}

/// Errors raised while rendering or persisting the map.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Writing the artefact failed.
    #[error("failed to write map to {path}: {source}")]
    Write {
        /// Destination path.
        path: String,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// A feature could not be encoded for display.
    #[error("failed to encode feature {id}: {message}")]
    Encode {
        /// Feature identifier.
        id: ElementId,
        /// Error detail.
        message: String,
    },
}

/// Presentation and persistence of enriched outlets.
///
/// The pipeline calls [`RenderSink::render`] once per outlet in entity order
/// and [`RenderSink::finish`] once after the last one.
pub trait RenderSink {
    /// Add one outlet to the output.
    fn render(&mut self, feature: &MapFeature) -> Result<(), RenderError>;

    /// Persist the output.
    fn finish(&mut self) -> Result<(), RenderError>;
}
