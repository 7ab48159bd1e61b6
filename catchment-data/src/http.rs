//! Blocking bridge over `reqwest` shared by the service clients.
//!
//! The collaborator traits in `catchment-core` are synchronous. Each client
//! owns a [`BlockingClient`] that drives async requests on a private
//! current-thread Tokio runtime, or on the caller's runtime when invoked from
//! inside a multi-threaded one.

use std::future::Future;
use std::time::Duration;

use catchment_core::ServiceError;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};

/// Default user agent sent to every service.
pub const DEFAULT_USER_AGENT: &str = "catchment/0.1";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Errors raised while constructing a service client.
#[derive(Debug, Error)]
pub enum ClientBuildError {
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    /// Failed to build the Tokio runtime.
    #[error("failed to build Tokio runtime: {0}")]
    Runtime(#[source] std::io::Error),
    /// A service URL could not be parsed.
    #[error("invalid service URL '{url}': {source}")]
    InvalidUrl {
        /// URL as supplied.
        url: String,
        /// Parse failure.
        #[source]
        source: url::ParseError,
    },
}

/// Transport settings shared by the service clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpClientConfig {
    /// Connect and request timeout.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl HttpClientConfig {
    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// `reqwest` client paired with the runtime that drives it.
pub(crate) struct BlockingClient {
    client: Client,
    timeout: Duration,
    runtime: Runtime,
}

impl std::fmt::Debug for BlockingClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockingClient")
            .field("client", &self.client)
            .field("timeout", &self.timeout)
            .field("runtime", &"<tokio::runtime::Runtime>")
            .finish()
    }
}

impl BlockingClient {
    pub(crate) fn new(config: &HttpClientConfig) -> Result<Self, ClientBuildError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(ClientBuildError::HttpClient)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(ClientBuildError::Runtime)?;
        Ok(Self {
            client,
            timeout: config.timeout,
            runtime,
        })
    }

    pub(crate) const fn client(&self) -> &Client {
        &self.client
    }

    /// Run `future` to completion on the calling thread.
    ///
    /// Inside a multi-threaded runtime the caller's handle is used through
    /// [`tokio::task::block_in_place`]. Otherwise, including inside a
    /// `current_thread` runtime, the private runtime is used.
    pub(crate) fn block_on<F: Future>(&self, future: F) -> F::Output {
        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(future))
            }
            _ => self.runtime.block_on(future),
        }
    }

    /// Send `request`, mapping transport failures onto [`ServiceError`].
    pub(crate) async fn send(
        &self,
        request: RequestBuilder,
        url: &str,
    ) -> Result<Response, ServiceError> {
        request
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, url))
    }

    /// Send `request`, reject non-success statuses and decode a JSON body.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        url: &str,
    ) -> Result<T, ServiceError> {
        let response = self
            .send(request, url)
            .await?
            .error_for_status()
            .map_err(|err| self.convert_reqwest_error(&err, url))?;
        response.json().await.map_err(|err| ServiceError::Parse {
            message: err.to_string(),
        })
    }

    pub(crate) fn convert_reqwest_error(&self, error: &reqwest::Error, url: &str) -> ServiceError {
        if error.is_timeout() {
            return ServiceError::Timeout {
                url: url.to_owned(),
                timeout_secs: self.timeout.as_secs(),
            };
        }

        if let Some(status) = error.status() {
            return ServiceError::Http {
                url: url.to_owned(),
                status: status.as_u16(),
                message: error.to_string(),
            };
        }

        ServiceError::Network {
            url: url.to_owned(),
            message: error.to_string(),
        }
    }
}

/// Parse `raw` as a URL, naming it in the error.
pub(crate) fn parse_url(raw: &str) -> Result<url::Url, ClientBuildError> {
    url::Url::parse(raw).map_err(|source| ClientBuildError::InvalidUrl {
        url: raw.to_owned(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn config_builder_pattern() {
        let config = HttpClientConfig::default()
            .with_timeout(Duration::from_secs(90))
            .with_user_agent("test-agent/1.0");

        assert_eq!(config.timeout, Duration::from_secs(90));
        assert_eq!(config.user_agent, "test-agent/1.0");
    }

    #[rstest]
    fn default_config_uses_crate_user_agent() {
        let config = HttpClientConfig::default();

        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[rstest]
    fn unreachable_host_maps_to_network_error() {
        let config = HttpClientConfig::default().with_timeout(Duration::from_secs(2));
        let client = BlockingClient::new(&config).expect("client should build");
        let url = "http://127.0.0.1:9/unreachable";

        let result: Result<serde_json::Value, ServiceError> =
            client.block_on(client.get_json(client.client().get(url), url));

        match result {
            Err(
                ServiceError::Network { url: reported, .. }
                | ServiceError::Timeout { url: reported, .. },
            ) => assert_eq!(reported, url),
            other => panic!("expected a transport error, got {other:?}"),
        }
    }

    #[rstest]
    #[case("not a url")]
    #[case("")]
    fn parse_url_rejects_malformed_input(#[case] raw: &str) {
        let err = parse_url(raw).expect_err("malformed URL");

        assert!(matches!(err, ClientBuildError::InvalidUrl { ref url, .. } if url == raw));
    }
}
