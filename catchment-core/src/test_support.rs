//! Deterministic collaborators for unit and behaviour tests.
//!
//! None of these touch the network. Request-recording doubles use interior
//! mutability because the collaborator traits take `&self`.

use std::cell::RefCell;
use std::collections::VecDeque;

use geo::{Coord, LineString, Polygon};

use crate::bbox::BoundingBox;
use crate::element::{NodeId, RawElement};
use crate::isochrone::{Isochrone, IsochroneProvider, IsochroneRequest};
use crate::render::{MapFeature, RenderError, RenderSink};
use crate::service::{BorderNodeLookup, ElementSource, NodeCoordinate, ServiceError};

/// `ElementSource` returning a fixed element list or error.
#[derive(Debug, Clone)]
pub struct StubElementSource {
    response: Result<Vec<RawElement>, ServiceError>,
}

impl StubElementSource {
    /// Return `elements` for every bounding box.
    pub fn with_elements(elements: Vec<RawElement>) -> Self {
        Self {
            response: Ok(elements),
        }
    }

    /// Fail every request with `error`.
    pub fn with_error(error: ServiceError) -> Self {
        Self {
            response: Err(error),
        }
    }
}

impl ElementSource for StubElementSource {
    fn fetch_elements(&self, _bbox: &BoundingBox) -> Result<Vec<RawElement>, ServiceError> {
        self.response.clone()
    }
}

#[derive(Debug, Clone)]
enum LookupResponse {
    /// Answer each batch with the known coordinates it requested.
    Known(Vec<NodeCoordinate>),
    /// Answer call `i` with entry `i` verbatim.
    Scripted(VecDeque<Vec<NodeCoordinate>>),
    Error(ServiceError),
}

/// `BorderNodeLookup` that records every batch it receives.
///
/// # Example
///
/// ```
/// use catchment_core::{BorderNodeLookup, NodeCoordinate, NodeId};
/// use catchment_core::test_support::RecordingBorderNodeLookup;
///
/// let lookup = RecordingBorderNodeLookup::with_results([
///     NodeCoordinate::new(222, -36.90, 174.77),
///     NodeCoordinate::new(111, -36.91, 174.78),
/// ]);
/// let results = lookup.lookup_nodes(&[NodeId(111)])?;
/// assert_eq!(results.len(), 1);
/// assert_eq!(lookup.requests(), vec![vec![NodeId(111)]]);
/// # Ok::<(), catchment_core::ServiceError>(())
/// ```
#[derive(Debug)]
pub struct RecordingBorderNodeLookup {
    response: RefCell<LookupResponse>,
    requests: RefCell<Vec<Vec<NodeId>>>,
}

impl Default for RecordingBorderNodeLookup {
    fn default() -> Self {
        Self::with_results([])
    }
}

impl RecordingBorderNodeLookup {
    /// Answer each batch with those of `results` it asked for, in the order
    /// given here rather than the request order.
    pub fn with_results<I>(results: I) -> Self
    where
        I: IntoIterator<Item = NodeCoordinate>,
    {
        Self::from_response(LookupResponse::Known(results.into_iter().collect()))
    }

    /// Answer the `i`-th call with the `i`-th response, unfiltered, and with
    /// nothing once the script runs out.
    pub fn with_batches<I>(responses: I) -> Self
    where
        I: IntoIterator<Item = Vec<NodeCoordinate>>,
    {
        Self::from_response(LookupResponse::Scripted(responses.into_iter().collect()))
    }

    /// Fail every call with `error`.
    pub fn failing(error: ServiceError) -> Self {
        Self::from_response(LookupResponse::Error(error))
    }

    fn from_response(response: LookupResponse) -> Self {
        Self {
            response: RefCell::new(response),
            requests: RefCell::new(Vec::new()),
        }
    }

    /// Every batch requested so far, in call order.
    pub fn requests(&self) -> Vec<Vec<NodeId>> {
        self.requests.borrow().clone()
    }
}

impl BorderNodeLookup for RecordingBorderNodeLookup {
    fn lookup_nodes(&self, nodes: &[NodeId]) -> Result<Vec<NodeCoordinate>, ServiceError> {
        self.requests.borrow_mut().push(nodes.to_vec());
        match &mut *self.response.borrow_mut() {
            LookupResponse::Known(known) => Ok(known
                .iter()
                .filter(|result| nodes.contains(&result.id))
                .copied()
                .collect()),
            LookupResponse::Scripted(script) => Ok(script.pop_front().unwrap_or_default()),
            LookupResponse::Error(error) => Err(error.clone()),
        }
    }
}

/// `IsochroneProvider` returning a small square around each origin.
#[derive(Debug, Default)]
pub struct SquareIsochroneProvider {
    population: Option<f64>,
    fail_at: Option<(usize, ServiceError)>,
    requests: RefCell<Vec<IsochroneRequest>>,
}

impl SquareIsochroneProvider {
    /// Attach `population` to every isochrone.
    #[must_use]
    pub fn with_population(mut self, population: f64) -> Self {
        self.population = Some(population);
        self
    }

    /// Fail the zero-based `call` with `error`.
    #[must_use]
    pub fn failing_at(mut self, call: usize, error: ServiceError) -> Self {
        self.fail_at = Some((call, error));
        self
    }

    /// Every request received so far.
    pub fn requests(&self) -> Vec<IsochroneRequest> {
        self.requests.borrow().clone()
    }
}

/// Square ring of half-width `0.01` degrees centred on `centre`.
pub fn square_around(centre: Coord<f64>) -> Polygon<f64> {
    let Coord { x, y } = centre;
    let ring = LineString::from(vec![
        (x - 0.01, y - 0.01),
        (x + 0.01, y - 0.01),
        (x + 0.01, y + 0.01),
        (x - 0.01, y + 0.01),
        (x - 0.01, y - 0.01),
    ]);
    Polygon::new(ring, Vec::new())
}

impl IsochroneProvider for SquareIsochroneProvider {
    fn isochrone(&self, request: &IsochroneRequest) -> Result<Isochrone, ServiceError> {
        let call = {
            let mut requests = self.requests.borrow_mut();
            requests.push(request.clone());
            requests.len() - 1
        };
        if let Some((failing, error)) = &self.fail_at
            && *failing == call
        {
            return Err(error.clone());
        }
        let mut isochrone = Isochrone::new(square_around(request.location));
        isochrone.total_population = self.population;
        Ok(isochrone)
    }
}

/// `RenderSink` that keeps every feature in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    /// Features in render order.
    pub features: Vec<MapFeature>,
    /// Number of `finish` calls.
    pub finished: usize,
}

impl RenderSink for RecordingSink {
    fn render(&mut self, feature: &MapFeature) -> Result<(), RenderError> {
        self.features.push(feature.clone());
        Ok(())
    }

    fn finish(&mut self) -> Result<(), RenderError> {
        self.finished += 1;
        Ok(())
    }
}
