//! Isochrone provider trait with its request and response types.

use std::time::Duration;

use geo::{Coord, Polygon};

use crate::service::ServiceError;

use super::profile::{IsochroneAttribute, TravelProfile};

/// Parameters for one isochrone lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct IsochroneRequest {
    /// Origin (`x = longitude`, `y = latitude`).
    pub location: Coord<f64>,
    /// Means of travel.
    pub profile: TravelProfile,
    /// Travel-time budget.
    pub range: Duration,
    /// Attributes to attach to the polygon.
    pub attributes: Vec<IsochroneAttribute>,
}

/// Reachability polygon returned by a routing service.
#[derive(Debug, Clone, PartialEq)]
pub struct Isochrone {
    /// Area reachable within the budget.
    pub polygon: Polygon<f64>,
    /// Population inside the polygon, when requested and available.
    pub total_population: Option<f64>,
    /// Polygon area in square metres, when requested and available.
    pub area: Option<f64>,
}

impl Isochrone {
    /// An isochrone without attributes.
    pub const fn new(polygon: Polygon<f64>) -> Self {
        Self {
            polygon,
            total_population: None,
            area: None,
        }
    }
}

/// Fetch a reachability polygon for one coordinate.
///
/// # Examples
///
/// ```rust
/// use geo::{LineString, Polygon};
/// use catchment_core::{Isochrone, IsochroneProvider, IsochroneRequest, ServiceError};
///
/// struct Square;
///
/// impl IsochroneProvider for Square {
///     fn isochrone(&self, request: &IsochroneRequest) -> Result<Isochrone, ServiceError> {
///         let c = request.location;
///         let ring = LineString::from(vec![
///             (c.x - 0.01, c.y - 0.01),
///             (c.x + 0.01, c.y - 0.01),
///             (c.x + 0.01, c.y + 0.01),
///             (c.x - 0.01, c.y - 0.01),
///         ]);
///         Ok(Isochrone::new(Polygon::new(ring, Vec::new())))
///     }
/// }
/// ```
pub trait IsochroneProvider {
    /// Return the isochrone described by `request`.
    fn isochrone(&self, request: &IsochroneRequest) -> Result<Isochrone, ServiceError>;
}
