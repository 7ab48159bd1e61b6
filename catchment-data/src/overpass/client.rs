//! Blocking Overpass API client.

use std::time::Duration;

use catchment_core::{
    BorderNodeLookup, BoundingBox, ElementSource, NodeCoordinate, NodeId, RawElement,
    ServiceError,
};
use log::{debug, warn};
use reqwest::RequestBuilder;
use reqwest::header::CONTENT_TYPE;
use url::Url;
use url::form_urlencoded;

use super::query::{CategoryFilter, elements_query, nodes_query};
use super::response::{OverpassElement, OverpassResponse};
use crate::http::{BlockingClient, ClientBuildError, HttpClientConfig, parse_url};

/// Public Overpass interpreter endpoint.
pub const DEFAULT_OVERPASS_URL: &str = "https://overpass-api.de/api/interpreter";

/// Client-side timeout; longer than the server-side query timeout.
const DEFAULT_OVERPASS_TIMEOUT_SECS: u64 = 120;

/// Configuration for [`OverpassClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverpassConfig {
    /// Interpreter endpoint URL.
    pub endpoint: String,
    /// Category of elements returned by [`ElementSource::fetch_elements`].
    pub category: CategoryFilter,
    /// Transport settings.
    pub http: HttpClientConfig,
}

impl OverpassConfig {
    /// Configuration for the public endpoint and the given category.
    pub fn new(category: CategoryFilter) -> Self {
        Self {
            endpoint: DEFAULT_OVERPASS_URL.to_owned(),
            category,
            http: HttpClientConfig::default()
                .with_timeout(Duration::from_secs(DEFAULT_OVERPASS_TIMEOUT_SECS)),
        }
    }

    /// Use a different interpreter endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Replace the transport settings.
    #[must_use]
    pub fn with_http(mut self, http: HttpClientConfig) -> Self {
        self.http = http;
        self
    }
}

/// Overpass API client serving element and border-node queries.
#[derive(Debug)]
pub struct OverpassClient {
    http: BlockingClient,
    endpoint: Url,
    category: CategoryFilter,
}

impl OverpassClient {
    /// Create a client for `endpoint` with default transport settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is not a URL or the HTTP client or
    /// Tokio runtime fails to build.
    pub fn new(endpoint: &str, category: CategoryFilter) -> Result<Self, ClientBuildError> {
        Self::with_config(OverpassConfig::new(category).with_endpoint(endpoint))
    }

    /// Create a client with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is not a URL or the HTTP client or
    /// Tokio runtime fails to build.
    pub fn with_config(config: OverpassConfig) -> Result<Self, ClientBuildError> {
        let endpoint = parse_url(&config.endpoint)?;
        let http = BlockingClient::new(&config.http)?;
        Ok(Self {
            http,
            endpoint,
            category: config.category,
        })
    }

    /// Build the POST request carrying `query` in the form-encoded `data`
    /// field, so long node-id lists never end up in the request line.
    fn query_request(&self, query: &str) -> RequestBuilder {
        let body = form_urlencoded::Serializer::new(String::new())
            .append_pair("data", query)
            .finish();
        self.http
            .client()
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(body)
    }

    async fn run_query(&self, query: &str) -> Result<Vec<OverpassElement>, ServiceError> {
        debug!("Overpass query: {query}");
        let response: OverpassResponse = self
            .http
            .get_json(self.query_request(query), self.endpoint.as_str())
            .await?;
        if let Some(remark) = response.runtime_error() {
            return Err(ServiceError::Rejected {
                code: "runtime".to_owned(),
                message: remark.to_owned(),
            });
        }
        if let Some(remark) = &response.remark {
            warn!("Overpass remark: {remark}");
        }
        Ok(response.elements)
    }
}

impl ElementSource for OverpassClient {
    fn fetch_elements(&self, bbox: &BoundingBox) -> Result<Vec<RawElement>, ServiceError> {
        let query = elements_query(&self.category, bbox);
        let elements = self.http.block_on(self.run_query(&query))?;
        Ok(elements
            .into_iter()
            .filter_map(OverpassElement::into_raw)
            .collect())
    }
}

impl BorderNodeLookup for OverpassClient {
    fn lookup_nodes(&self, nodes: &[NodeId]) -> Result<Vec<NodeCoordinate>, ServiceError> {
        if nodes.is_empty() {
            return Ok(Vec::new());
        }
        let query = nodes_query(nodes);
        let elements = self.http.block_on(self.run_query(&query))?;
        Ok(elements
            .into_iter()
            .filter_map(OverpassElement::into_node_coordinate)
            .collect())
    }
}
