//! HTTP transport port

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use vendorlink_domain::{
    HttpMethod, RequestBody, ResponseSpec,
    request::Header,
};

/// A request ready for the wire.
///
/// The URL is absolute, headers include authentication, and every file part
/// of a multipart body has been normalized.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Absolute URL without query string.
    pub url: String,
    /// Query string parameters.
    pub query: Vec<(String, String)>,
    /// Final header set.
    pub headers: Vec<Header>,
    /// Request body.
    pub body: RequestBody,
    /// Bound on the whole exchange.
    pub timeout: Duration,
}

impl PreparedRequest {
    /// Looks up a header value by case-insensitive name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|h| h.is(name))
            .map(|h| h.value.as_str())
    }
}

/// Errors raised when no response was received.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The request did not complete within its timeout.
    #[error("request timed out after {timeout_ms}ms")]
    Timeout {
        /// The timeout that elapsed.
        timeout_ms: u64,
    },

    /// The server could not be reached (DNS, refused, reset, TLS).
    #[error("network error: {0}")]
    Network(String),

    /// A file part could not be read for upload.
    #[error("could not read upload {locator}: {message}")]
    Upload {
        /// Locator that failed.
        locator: String,
        /// Underlying error.
        message: String,
    },

    /// The request could not be built or failed for another local reason.
    #[error("{0}")]
    Other(String),
}

/// Port for sending prepared requests.
///
/// This trait abstracts the HTTP library, so the pipeline can be exercised
/// against scripted transports in tests.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Sends a request and returns whatever response the server produced.
    ///
    /// Non-2xx responses are returned as `Ok`; only the absence of a
    /// response is an error.
    ///
    /// # Errors
    ///
    /// Returns `TransportError` when no response was received.
    async fn send(&self, request: &PreparedRequest) -> Result<ResponseSpec, TransportError>;
}
