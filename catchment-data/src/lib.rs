//! Service adapters and output for the catchment pipeline.
//!
//! Responsibilities:
//! - Fetch map elements and border-node coordinates from an Overpass API
//!   endpoint.
//! - Fetch isochrones from an openrouteservice endpoint.
//! - Render enriched outlets into a self-contained Leaflet HTML map.
//!
//! Boundaries:
//! - Do not encode domain rules (live in `catchment-core`).
//! - Expose synchronous trait implementations; async HTTP stays internal.
//!
//! Invariants:
//! - No global mutable state.

pub mod http;
pub mod ors;
pub mod overpass;
pub mod render;

pub use http::{ClientBuildError, DEFAULT_USER_AGENT, HttpClientConfig};
pub use ors::{DEFAULT_ORS_URL, OrsConfig, OrsIsochroneProvider};
pub use overpass::{
    CategoryFilter, CategoryFilterError, DEFAULT_OVERPASS_URL, OverpassClient, OverpassConfig,
};
pub use render::{ChainPalette, LeafletMap, LeafletMapConfig, TileSet, TileSetError};
