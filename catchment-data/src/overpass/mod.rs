//! Overpass API adapter for map elements and border-node coordinates.
//!
//! [`OverpassClient`] implements both [`catchment_core::ElementSource`] and
//! [`catchment_core::BorderNodeLookup`] against one interpreter endpoint.
//! Queries are written in Overpass QL and request JSON output.
//!
//! # Example
//!
//! ```no_run
//! use catchment_core::{BoundingBox, ElementSource};
//! use catchment_data::overpass::{CategoryFilter, OverpassClient, OverpassConfig};
//!
//! let category: CategoryFilter = "shop=supermarket".parse()?;
//! let client = OverpassClient::with_config(OverpassConfig::new(category))?;
//! let bbox: BoundingBox = "-37.11,174.38,-36.67,175.08".parse()?;
//! let elements = client.fetch_elements(&bbox)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod client;
mod query;
mod response;

pub use client::{DEFAULT_OVERPASS_URL, OverpassClient, OverpassConfig};
pub use query::{CategoryFilter, CategoryFilterError, elements_query, nodes_query};
