//! Core domain for mapping the catchments of retail chain outlets.
//!
//! Raw map elements are classified as points or polygons, filtered down to
//! named outlets of the configured chains, and resolved to a single
//! coordinate each. Polygon outlets borrow the coordinate of their first
//! border node, which is fetched in batches from a [`BorderNodeLookup`].
//! Resolved outlets are then enriched with an [`Isochrone`] and handed to a
//! [`RenderSink`].
//!
//! External services sit behind the traits in [`service`], [`isochrone`] and
//! [`render`] so that the [`Pipeline`] can be driven entirely by the doubles
//! in [`test_support`].

pub mod bbox;
pub mod diagnostic;
pub mod element;
pub mod entity;
pub mod filter;
pub mod isochrone;
pub mod normalise;
pub mod pipeline;
pub mod render;
pub mod resolve;
pub mod service;
#[doc(hidden)]
pub mod test_support;

pub use bbox::{BoundingBox, BoundingBoxError};
pub use diagnostic::Diagnostic;
pub use element::{ElementId, ElementKind, NAME_TAG, NodeId, RawElement, Tags};
pub use entity::{Entity, EntitySet, GeometryKind, Location, ResolvedEntity};
pub use filter::{ChainMatcher, FilterOutcome, filter_entities};
pub use isochrone::{
    Isochrone, IsochroneAttribute, IsochroneProvider, IsochroneRequest, TravelProfile,
};
pub use normalise::{Classification, classify};
pub use pipeline::{
    DEFAULT_THROTTLE, DEFAULT_TRAVEL_TIME, Pipeline, PipelineConfig, PipelineError, RunReport,
    Throttle,
};
pub use render::{MapFeature, RenderError, RenderSink};
pub use resolve::{
    DEFAULT_BATCH_SIZE, Resolution, ResolveError, UnresolvedReference, resolve_entities,
};
pub use service::{BorderNodeLookup, ElementSource, NodeCoordinate, ServiceError};
