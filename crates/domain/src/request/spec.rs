//! Request descriptor type

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{HttpMethod, Payload, RequestBody};

/// A single HTTP header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// Header name.
    pub name: String,
    /// Header value.
    pub value: String,
}

impl Header {
    /// Creates a header.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Case-insensitive name comparison.
    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

/// Everything needed to issue one call against the backend.
///
/// The path is relative to the configured base URL. Exactly one body
/// representation is active at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestDescriptor {
    /// HTTP method.
    pub method: HttpMethod,
    /// Path relative to the base URL, e.g. `/orders/42`.
    pub path: String,
    /// Query string parameters.
    #[serde(default)]
    pub query: Vec<(String, String)>,
    /// Request body.
    #[serde(default)]
    pub body: RequestBody,
    /// Caller-provided headers.
    #[serde(default)]
    pub headers: Vec<Header>,
    /// Per-request timeout; the pipeline default applies when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<Duration>,
    /// Non-2xx statuses returned to the caller instead of raised as errors.
    #[serde(default)]
    pub accepted_statuses: Vec<u16>,
}

impl RequestDescriptor {
    /// Creates a descriptor with no body.
    #[must_use]
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: RequestBody::None,
            headers: Vec::new(),
            timeout: None,
            accepted_statuses: Vec::new(),
        }
    }

    /// Creates a GET descriptor.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    /// Creates a POST descriptor.
    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    /// Creates a PUT descriptor.
    #[must_use]
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, path)
    }

    /// Creates a PATCH descriptor.
    #[must_use]
    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Patch, path)
    }

    /// Creates a DELETE descriptor.
    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    /// Sets the body from a payload, choosing JSON or multipart.
    #[must_use]
    pub fn payload(mut self, payload: &Payload) -> Self {
        self.body = RequestBody::from_payload(payload);
        self
    }

    /// Adds a query parameter.
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Adds a caller header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push(Header::new(name, value));
        self
    }

    /// Overrides the request timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Treats the given status as a normal response rather than an error.
    #[must_use]
    pub fn accept_status(mut self, status: u16) -> Self {
        if !self.accepted_statuses.contains(&status) {
            self.accepted_statuses.push(status);
        }
        self
    }

    /// Returns true if the status is 2xx or explicitly accepted.
    #[must_use]
    pub fn accepts(&self, status: u16) -> bool {
        (200..300).contains(&status) || self.accepted_statuses.contains(&status)
    }

    /// Headers to put on the wire, excluding authentication.
    ///
    /// Any caller-set content type is dropped: JSON bodies get
    /// `application/json`, and multipart bodies get none so the transport
    /// can add its boundary.
    #[must_use]
    pub fn effective_headers(&self) -> Vec<Header> {
        let mut headers: Vec<Header> = self
            .headers
            .iter()
            .filter(|h| !h.is("content-type"))
            .cloned()
            .collect();
        if let Some(content_type) = self.body.content_type() {
            headers.push(Header::new("Content-Type", content_type));
        }
        headers
    }

    /// Short `METHOD /path` label for logs.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} {}", self.method, self.path)
    }
}
