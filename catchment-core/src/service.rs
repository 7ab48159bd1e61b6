//! External map-data collaborators and their shared error type.
//!
//! The traits are synchronous; each call blocks until the service answers.
//! HTTP implementations live in `catchment-data`.

use geo::Coord;
use thiserror::Error;

use crate::bbox::BoundingBox;
use crate::element::{NodeId, RawElement};

/// Failures reported by any external service.
///
/// None of these are recoverable inside the pipeline; they abort the run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// The request timed out.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Requested URL.
        url: String,
        /// Configured timeout.
        timeout_secs: u64,
    },
    /// The service answered with a non-success HTTP status.
    #[error("HTTP {status} from {url}: {message}")]
    Http {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Error detail.
        message: String,
    },
    /// The request could not be delivered.
    #[error("network error for {url}: {message}")]
    Network {
        /// Requested URL.
        url: String,
        /// Error detail.
        message: String,
    },
    /// The response body could not be decoded.
    #[error("malformed response: {message}")]
    Parse {
        /// Error detail.
        message: String,
    },
    /// The service decoded the request but refused it.
    #[error("service rejected the request ({code}): {message}")]
    Rejected {
        /// Service-specific error code.
        code: String,
        /// Error detail.
        message: String,
    },
}

/// Retrieve raw elements inside a bounding box.
pub trait ElementSource {
    /// Return every element of the configured category inside `bbox`.
    fn fetch_elements(&self, bbox: &BoundingBox) -> Result<Vec<RawElement>, ServiceError>;
}

/// One border node located by a [`BorderNodeLookup`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeCoordinate {
    /// Border node identifier as returned by the service.
    pub id: NodeId,
    /// Coordinate (`x = longitude`, `y = latitude`).
    pub location: Coord<f64>,
}

impl NodeCoordinate {
    /// Build a result entry from latitude and longitude.
    pub const fn new(id: u64, lat: f64, lon: f64) -> Self {
        Self {
            id: NodeId(id),
            location: Coord { x: lon, y: lat },
        }
    }
}

/// Resolve border-node identifiers to coordinates in bulk.
///
/// Results are a subset of the requested identifiers in no particular order.
/// Callers must correlate by identifier, never by position.
pub trait BorderNodeLookup {
    /// Locate `nodes`.
    fn lookup_nodes(&self, nodes: &[NodeId]) -> Result<Vec<NodeCoordinate>, ServiceError>;
}
