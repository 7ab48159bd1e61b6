//! Blocking openrouteservice isochrone client.

use catchment_core::{Isochrone, IsochroneProvider, IsochroneRequest, ServiceError, TravelProfile};
use log::debug;
use reqwest::header::AUTHORIZATION;
use url::Url;

use super::response::{ErrorResponse, IsochroneBody, IsochroneResponse};
use crate::http::{BlockingClient, ClientBuildError, HttpClientConfig, parse_url};

/// Public openrouteservice API root.
pub const DEFAULT_ORS_URL: &str = "https://api.openrouteservice.org";

/// Configuration for [`OrsIsochroneProvider`].
#[derive(Clone, PartialEq, Eq)]
pub struct OrsConfig {
    /// API root, e.g. `https://api.openrouteservice.org` or a self-hosted
    /// `http://localhost:8080/ors`.
    pub base_url: String,
    /// API key sent in the `Authorization` header.
    pub api_key: String,
    /// Transport settings.
    pub http: HttpClientConfig,
}

impl std::fmt::Debug for OrsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrsConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("http", &self.http)
            .finish()
    }
}

impl OrsConfig {
    /// Configuration for the public API with the given key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_ORS_URL.to_owned(),
            api_key: api_key.into(),
            http: HttpClientConfig::default(),
        }
    }

    /// Use a different API root.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Replace the transport settings.
    #[must_use]
    pub fn with_http(mut self, http: HttpClientConfig) -> Self {
        self.http = http;
        self
    }
}

/// Isochrone provider backed by openrouteservice.
#[derive(Debug)]
pub struct OrsIsochroneProvider {
    http: BlockingClient,
    isochrones_root: Url,
    api_key: String,
}

impl OrsIsochroneProvider {
    /// Create a provider with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is not a URL or the HTTP client or
    /// Tokio runtime fails to build.
    pub fn with_config(config: OrsConfig) -> Result<Self, ClientBuildError> {
        let mut base = parse_url(&config.base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let isochrones_root = base
            .join("v2/isochrones/")
            .map_err(|source| ClientBuildError::InvalidUrl {
                url: config.base_url.clone(),
                source,
            })?;
        let http = BlockingClient::new(&config.http)?;
        Ok(Self {
            http,
            isochrones_root,
            api_key: config.api_key,
        })
    }

    /// Endpoint for `profile`.
    fn isochrone_url(&self, profile: TravelProfile) -> Result<Url, ServiceError> {
        self.isochrones_root
            .join(profile.as_str())
            .map_err(|err| ServiceError::Network {
                url: self.isochrones_root.to_string(),
                message: err.to_string(),
            })
    }

    fn request_body(request: &IsochroneRequest) -> IsochroneBody {
        IsochroneBody {
            locations: vec![[request.location.x, request.location.y]],
            range: vec![request.range.as_secs()],
            range_type: "time",
            attributes: request
                .attributes
                .iter()
                .map(|attribute| attribute.as_str())
                .collect(),
        }
    }

    async fn fetch_isochrone(
        &self,
        request: &IsochroneRequest,
    ) -> Result<Isochrone, ServiceError> {
        let url = self.isochrone_url(request.profile)?;
        let body = Self::request_body(request);
        debug!(
            "Requesting {}s {} isochrone at {},{}",
            request.range.as_secs(),
            request.profile,
            request.location.y,
            request.location.x
        );
        let builder = self
            .http
            .client()
            .post(url.clone())
            .header(AUTHORIZATION, &self.api_key)
            .json(&body);
        let response = self.http.send(builder, url.as_str()).await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(rejection(url.as_str(), status.as_u16(), &text));
        }

        let decoded: IsochroneResponse =
            response.json().await.map_err(|err| ServiceError::Parse {
                message: err.to_string(),
            })?;
        decoded.into_isochrone()
    }
}

/// Interpret a non-success response body.
fn rejection(url: &str, status: u16, body: &str) -> ServiceError {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(document) => document.error.into_service_error(),
        Err(_) => ServiceError::Http {
            url: url.to_owned(),
            status,
            message: body.to_owned(),
        },
    }
}

impl IsochroneProvider for OrsIsochroneProvider {
    fn isochrone(&self, request: &IsochroneRequest) -> Result<Isochrone, ServiceError> {
        self.http.block_on(self.fetch_isochrone(request))
    }
}
