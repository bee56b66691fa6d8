//! HTTP client abstraction for testability.

use super::types::RemoteError;
use std::future::Future;
use tracing::{debug, trace, warn};

/// Trait for asynchronous HTTP client operations.
///
/// This abstraction allows for dependency injection and easier testing
/// by enabling mock HTTP clients in tests.
pub trait AsyncHttpClient: Send + Sync {
    /// Performs an async HTTP GET request.
    ///
    /// # Arguments
    ///
    /// * `url` - The URL to request
    ///
    /// # Returns
    ///
    /// The response body as bytes or an error.
    fn get(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, RemoteError>> + Send;

    /// Performs an async HTTP GET request with URL-encoded query parameters.
    ///
    /// # Arguments
    ///
    /// * `url` - The URL to request, without a query string
    /// * `params` - Query parameters as (name, value) pairs
    ///
    /// # Returns
    ///
    /// The response body as bytes or an error.
    fn get_with_params(
        &self,
        url: &str,
        params: &[(&str, String)],
    ) -> impl Future<Output = Result<Vec<u8>, RemoteError>> + Send;
}

/// Default User-Agent string for HTTP requests.
const DEFAULT_USER_AGENT: &str = concat!("aoireport/", env!("CARGO_PKG_VERSION"));

/// Default per-request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Real async HTTP client implementation using reqwest.
#[derive(Clone)]
pub struct AsyncReqwestClient {
    client: reqwest::Client,
}

impl AsyncReqwestClient {
    /// Creates a new AsyncReqwestClient with default configuration.
    ///
    /// Report runs issue many small requests against the same handful of
    /// hosts, so the client keeps idle connections warm between targets.
    pub fn new() -> Result<Self, RemoteError> {
        Self::with_timeout(DEFAULT_TIMEOUT_SECS)
    }

    /// Creates a new AsyncReqwestClient with a custom timeout.
    pub fn with_timeout(timeout_secs: u64) -> Result<Self, RemoteError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .user_agent(DEFAULT_USER_AGENT)
            .pool_idle_timeout(std::time::Duration::from_secs(90))
            .tcp_nodelay(true)
            .build()
            .map_err(|e| RemoteError::HttpError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    async fn execute(&self, request: reqwest::RequestBuilder) -> Result<Vec<u8>, RemoteError> {
        let response = match request.send().await {
            Ok(resp) => {
                debug!(
                    url = %resp.url(),
                    status = resp.status().as_u16(),
                    "HTTP response received"
                );
                resp
            }
            Err(e) => {
                warn!(
                    error = %e,
                    is_connect = e.is_connect(),
                    is_timeout = e.is_timeout(),
                    "HTTP request failed"
                );
                return Err(RemoteError::HttpError(format!("Request failed: {}", e)));
            }
        };

        if !response.status().is_success() {
            return Err(RemoteError::HttpError(format!(
                "HTTP {} from {}",
                response.status(),
                response.url()
            )));
        }

        match response.bytes().await {
            Ok(bytes) => {
                trace!(bytes = bytes.len(), "HTTP response body read");
                Ok(bytes.to_vec())
            }
            Err(e) => Err(RemoteError::HttpError(format!(
                "Failed to read response: {}",
                e
            ))),
        }
    }
}

impl Default for AsyncReqwestClient {
    fn default() -> Self {
        Self::new().expect("Failed to create default HTTP client")
    }
}

impl AsyncHttpClient for AsyncReqwestClient {
    async fn get(&self, url: &str) -> Result<Vec<u8>, RemoteError> {
        trace!(url = url, "HTTP GET request starting");
        self.execute(self.client.get(url)).await
    }

    async fn get_with_params(
        &self,
        url: &str,
        params: &[(&str, String)],
    ) -> Result<Vec<u8>, RemoteError> {
        trace!(url = url, params = params.len(), "HTTP GET request starting");
        self.execute(self.client.get(url).query(params)).await
    }
}
