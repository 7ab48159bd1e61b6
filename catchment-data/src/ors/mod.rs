//! openrouteservice isochrone adapter.
//!
//! [`OrsIsochroneProvider`] implements [`catchment_core::IsochroneProvider`]
//! using the `POST /v2/isochrones/{profile}` endpoint. The public service
//! allows 20 isochrone requests per minute; pacing is the pipeline's job.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use catchment_core::{IsochroneAttribute, IsochroneProvider, IsochroneRequest, TravelProfile};
//! use catchment_data::ors::{OrsConfig, OrsIsochroneProvider};
//! use geo::Coord;
//!
//! let provider = OrsIsochroneProvider::with_config(OrsConfig::new("my-api-key"))?;
//! let isochrone = provider.isochrone(&IsochroneRequest {
//!     location: Coord { x: 174.76, y: -36.88 },
//!     profile: TravelProfile::DrivingCar,
//!     range: Duration::from_secs(180),
//!     attributes: vec![IsochroneAttribute::TotalPop],
//! })?;
//! println!("population: {:?}", isochrone.total_population);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod provider;
mod response;

pub use provider::{DEFAULT_ORS_URL, OrsConfig, OrsIsochroneProvider};
