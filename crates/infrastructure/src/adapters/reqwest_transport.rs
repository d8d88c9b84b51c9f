//! HTTP transport implementation using reqwest.
//!
//! This adapter implements the `HttpTransport` port. It sends prepared
//! requests as-is; retries, authentication and error classification happen
//! in the pipeline.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, Method, Url};
use vendorlink_application::{HttpTransport, PreparedRequest, TransportError};
use vendorlink_domain::{HttpMethod, ResponseSpec};

use crate::http::{BuiltBody, build_body};

/// Default User-Agent header.
pub const DEFAULT_USER_AGENT: &str = concat!("Vendorlink/", env!("CARGO_PKG_VERSION"));

/// HTTP transport backed by `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Creates a transport with default settings.
    ///
    /// Default configuration:
    /// - Connect timeout: 10 seconds
    /// - Follow redirects: up to 10
    /// - TLS verification: enabled
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created.
    pub fn new(user_agent: &str) -> Result<Self, TransportError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .connect_timeout(Duration::from_secs(10))
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| TransportError::Other(e.to_string()))?;

        Ok(Self { client })
    }

    /// Creates a transport over a custom reqwest client.
    #[must_use]
    pub const fn with_client(client: Client) -> Self {
        Self { client }
    }

    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
        }
    }

    /// Maps reqwest errors to `TransportError`.
    fn map_error(error: &reqwest::Error, timeout: Duration) -> TransportError {
        if error.is_timeout() {
            return TransportError::Timeout {
                timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            };
        }

        // A connection dropped mid-body surfaces as a body or decode error.
        if error.is_connect() || error.is_request() || error.is_body() || error.is_decode() {
            let host = error
                .url()
                .and_then(Url::host_str)
                .unwrap_or("unknown")
                .to_string();
            return TransportError::Network(format!("{host}: {error}"));
        }

        TransportError::Other(error.to_string())
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: &PreparedRequest) -> Result<ResponseSpec, TransportError> {
        let mut url = Url::parse(&request.url)
            .map_err(|e| TransportError::Other(format!("Invalid URL {}: {e}", request.url)))?;
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&request.query);
        }

        let start = Instant::now();

        let mut builder = self
            .client
            .request(Self::to_reqwest_method(request.method), url)
            .timeout(request.timeout);

        // The pipeline already stripped any caller content type from multipart
        // requests; reqwest sets it with the boundary.
        for header in &request.headers {
            builder = builder.header(&header.name, &header.value);
        }

        builder = match build_body(&request.body).await? {
            BuiltBody::None => builder,
            BuiltBody::Json(content) => builder.body(content),
            BuiltBody::Multipart(form) => builder.multipart(form),
        };

        let response = builder
            .send()
            .await
            .map_err(|e| Self::map_error(&e, request.timeout))?;

        let status = response.status().as_u16();
        let headers: HashMap<String, String> = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("<binary>").to_string()))
            .collect();

        let body = response
            .bytes()
            .await
            .map_err(|e| Self::map_error(&e, request.timeout))?
            .to_vec();

        let duration = start.elapsed();
        tracing::debug!(
            method = %request.method,
            url = %request.url,
            status,
            elapsed_ms = duration.as_millis(),
            "response received"
        );

        Ok(ResponseSpec::new(status, headers, body, duration))
    }
}
