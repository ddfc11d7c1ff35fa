//! HTTP client abstraction for testability
//!
//! The fetcher only needs the status line, the content type, and the body,
//! so the trait surfaces exactly that. Mock clients in tests script whole
//! responses without touching the network.

use std::future::Future;
use std::time::Duration;

use bytes::Bytes;

/// One HTTP response, reduced to what tile validation needs.
///
/// A non-200 status is still an `Ok` response; only transport-level
/// failures (connect, timeout) become errors.
#[derive(Debug, Clone)]
pub struct TileResponse {
    /// HTTP status code.
    pub status: u16,
    /// Content-Type header, if the server sent one.
    pub content_type: Option<String>,
    /// Response body.
    pub body: Bytes,
}

impl TileResponse {
    /// Convenience constructor for a 200 image response.
    pub fn image(content_type: &str, body: impl Into<Bytes>) -> Self {
        Self {
            status: 200,
            content_type: Some(content_type.to_string()),
            body: body.into(),
        }
    }
}

/// Error performing an HTTP request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HttpError {
    /// Failed to construct the underlying client
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(String),

    /// The request did not complete within the configured timeout
    #[error("request timed out")]
    Timeout,

    /// Connection or protocol failure
    #[error("request failed: {0}")]
    Network(String),
}

/// Trait for asynchronous tile HTTP transport.
///
/// This abstraction allows for dependency injection and easier testing
/// by enabling mock HTTP clients in tests.
pub trait HttpClient: Send + Sync {
    /// Performs an async HTTP GET request.
    fn get(&self, url: &str) -> impl Future<Output = Result<TileResponse, HttpError>> + Send;
}

/// Real HTTP client implementation using reqwest.
#[derive(Debug, Clone)]
pub struct ReqwestTileClient {
    client: reqwest::Client,
}

impl ReqwestTileClient {
    /// Creates a client with the given identifying user-agent and
    /// per-request timeout.
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, HttpError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .pool_max_idle_per_host(16)
            .tcp_nodelay(true)
            .build()
            .map_err(|e| HttpError::ClientBuild(e.to_string()))?;

        Ok(Self { client })
    }
}

impl HttpClient for ReqwestTileClient {
    async fn get(&self, url: &str) -> Result<TileResponse, HttpError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                HttpError::Timeout
            } else {
                HttpError::Network(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                HttpError::Timeout
            } else {
                HttpError::Network(e.to_string())
            }
        })?;

        Ok(TileResponse {
            status,
            content_type,
            body,
        })
    }
}
