//! Offline collaborators for exercising the `run` command end to end.

use catchment_core::test_support::{
    RecordingBorderNodeLookup, SquareIsochroneProvider, StubElementSource,
};
use catchment_core::{
    BorderNodeLookup, BoundingBox, ElementSource, NodeCoordinate, NodeId, RawElement,
    ServiceError,
};

use crate::CliError;
use crate::run::{RunConfig, RunServices, RunServicesBuilder, leaflet_sink};

/// Map-data double answering element and border-node queries.
pub(super) struct StubMapData {
    source: StubElementSource,
    lookup: RecordingBorderNodeLookup,
}

impl ElementSource for StubMapData {
    fn fetch_elements(&self, bbox: &BoundingBox) -> Result<Vec<RawElement>, ServiceError> {
        self.source.fetch_elements(bbox)
    }
}

impl BorderNodeLookup for StubMapData {
    fn lookup_nodes(&self, nodes: &[NodeId]) -> Result<Vec<NodeCoordinate>, ServiceError> {
        self.lookup.lookup_nodes(nodes)
    }
}

/// Builder wiring stub services to a real Leaflet sink.
#[derive(Debug, Clone, Default)]
pub(super) struct StubServicesBuilder {
    pub(super) elements: Vec<RawElement>,
    pub(super) nodes: Vec<NodeCoordinate>,
    pub(super) fetch_error: Option<ServiceError>,
    pub(super) population: f64,
}

impl StubServicesBuilder {
    /// A Countdown store mapped as a point and a New World mapped as a way.
    pub(super) fn supermarkets() -> Self {
        Self {
            elements: vec![
                RawElement::point(1, -36.88, 174.76).with_name("Countdown Mt Eden"),
                RawElement::polygon(2, [10, 11]).with_name("New World Metro"),
                RawElement::point(3, -36.85, 174.74).with_name("Farro Fresh"),
            ],
            nodes: vec![
                NodeCoordinate::new(11, -36.91, 174.78),
                NodeCoordinate::new(10, -36.90, 174.77),
            ],
            fetch_error: None,
            population: 18_250.0,
        }
    }
}

impl RunServicesBuilder for StubServicesBuilder {
    fn build(&self, config: &RunConfig) -> Result<RunServices, CliError> {
        let source = match &self.fetch_error {
            Some(error) => StubElementSource::with_error(error.clone()),
            None => StubElementSource::with_elements(self.elements.clone()),
        };
        Ok(RunServices {
            map_data: Box::new(StubMapData {
                source,
                lookup: RecordingBorderNodeLookup::with_results(self.nodes.clone()),
            }),
            isochrones: Box::new(
                SquareIsochroneProvider::default().with_population(self.population),
            ),
            sink: Box::new(leaflet_sink(config)),
        })
    }
}
