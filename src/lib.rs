//! Facade crate for the catchment mapper.
//!
//! This crate re-exports the core domain types and, behind the default `http`
//! feature, the Overpass, openrouteservice and Leaflet adapters.

#![forbid(unsafe_code)]

pub use catchment_core::{
    BorderNodeLookup, BoundingBox, BoundingBoxError, Diagnostic, ElementId, ElementKind,
    ElementSource, Isochrone, IsochroneAttribute, IsochroneProvider, IsochroneRequest, MapFeature,
    NodeCoordinate, NodeId, Pipeline, PipelineConfig, PipelineError, RawElement, RenderError,
    RenderSink, RunReport, ServiceError, Throttle, TravelProfile,
};

#[cfg(feature = "http")]
pub use catchment_data::{
    ChainPalette, LeafletMap, LeafletMapConfig, OrsConfig, OrsIsochroneProvider, OverpassClient,
    OverpassConfig, TileSet,
};
