//! Travel-time reachability polygons for single coordinates.
//!
//! The [`IsochroneProvider`] trait abstracts the routing service. Callers
//! supply an [`IsochroneRequest`] naming a coordinate, a [`TravelProfile`] and
//! a travel-time budget, and receive one [`Isochrone`].

mod profile;
mod provider;

pub use profile::{IsochroneAttribute, TravelProfile};
pub use provider::{Isochrone, IsochroneProvider, IsochroneRequest};
