//! Classified API errors
//!
//! Every terminal failure of the pipeline is surfaced as an [`ApiError`]
//! carrying its [`ApiErrorKind`], a display-ready message, the HTTP status
//! and the raw server payload when there was one.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;
use thiserror::Error;
use vendorlink_domain::{DomainError, ResponseSpec, StatusCode};

use crate::ports::TransportError;

/// Classification of a pipeline failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiErrorKind {
    /// No response before the request timeout.
    Timeout,
    /// No response because the network or server was unreachable.
    NetworkUnreachable,
    /// A response arrived but it was markup instead of API JSON.
    ServerMisconfigured,
    /// The server rejected the bearer token (401).
    AuthExpired,
    /// The server rejected the input (422); field errors are attached.
    ValidationFailed,
    /// Any other non-success status.
    RequestFailed,
    /// A local failure before or around dispatch.
    UnexpectedError,
}

impl ApiErrorKind {
    /// Short title for UI display.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Timeout => "Request Timeout",
            Self::NetworkUnreachable => "Network Unavailable",
            Self::ServerMisconfigured => "Server Error",
            Self::AuthExpired => "Session Expired",
            Self::ValidationFailed => "Validation Failed",
            Self::RequestFailed => "Request Failed",
            Self::UnexpectedError => "Unexpected Error",
        }
    }
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// A classified, non-silent pipeline failure.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("{message}")]
pub struct ApiError {
    /// Classification.
    pub kind: ApiErrorKind,
    /// Display-ready message.
    pub message: String,
    /// HTTP status, when a response was received.
    pub status: Option<u16>,
    /// Decoded server payload, when there was one.
    pub payload: Option<Value>,
    /// Field name to messages, for `ValidationFailed`.
    pub field_errors: BTreeMap<String, Vec<String>>,
}

/// Result type alias for pipeline operations.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// Creates an error with no response attached.
    #[must_use]
    pub fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            payload: None,
            field_errors: BTreeMap::new(),
        }
    }

    /// A local failure that happened before dispatch.
    #[must_use]
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::UnexpectedError, message)
    }

    /// Classifies a failure where no response was received.
    #[must_use]
    pub fn from_transport(error: &TransportError) -> Self {
        match error {
            TransportError::Timeout { .. } => Self::new(
                ApiErrorKind::Timeout,
                "The request timed out. Please check your connection and try again.",
            ),
            TransportError::Network(_) => Self::new(
                ApiErrorKind::NetworkUnreachable,
                "Unable to reach the server. Please check your internet connection.",
            ),
            TransportError::Upload { .. } | TransportError::Other(_) => {
                Self::unexpected(error.to_string())
            }
        }
    }

    /// Classifies a response whose status was not accepted.
    #[must_use]
    pub fn from_response(response: &ResponseSpec) -> Self {
        let status = response.status;

        if status == 401 {
            let payload = response.json_body().ok();
            let message = payload
                .as_ref()
                .and_then(server_message)
                .unwrap_or_else(|| "Your session has expired. Please sign in again.".to_string());
            return Self::with_response(ApiErrorKind::AuthExpired, message, status, payload);
        }

        if response.is_markup() {
            return Self::with_response(
                ApiErrorKind::ServerMisconfigured,
                "The server returned an unexpected page instead of data. Please try again later.",
                status,
                None,
            );
        }

        let payload = response.json_body().ok().filter(|v| !v.is_null());

        if status == 422 {
            let field_errors = payload.as_ref().map(field_errors).unwrap_or_default();
            let message = payload
                .as_ref()
                .and_then(server_message)
                .or_else(|| field_errors.values().flatten().next().cloned())
                .unwrap_or_else(|| "Please check the highlighted fields.".to_string());
            let mut error =
                Self::with_response(ApiErrorKind::ValidationFailed, message, status, payload);
            error.field_errors = field_errors;
            return error;
        }

        let message = payload
            .as_ref()
            .and_then(server_message)
            .unwrap_or_else(|| fallback_message(status).to_string());
        Self::with_response(ApiErrorKind::RequestFailed, message, status, payload)
    }

    fn with_response(
        kind: ApiErrorKind,
        message: impl Into<String>,
        status: u16,
        payload: Option<Value>,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            status: Some(status),
            payload,
            field_errors: BTreeMap::new(),
        }
    }

    /// Returns true if the failure may go away on its own.
    ///
    /// Timeouts, unreachable networks and 5xx responses are transient;
    /// everything else, 429 included, is surfaced immediately.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self.kind {
            ApiErrorKind::Timeout | ApiErrorKind::NetworkUnreachable => true,
            ApiErrorKind::RequestFailed => self
                .status
                .is_some_and(|s| StatusCode::new(s).is_server_error()),
            ApiErrorKind::ServerMisconfigured
            | ApiErrorKind::AuthExpired
            | ApiErrorKind::ValidationFailed
            | ApiErrorKind::UnexpectedError => false,
        }
    }

    /// First message recorded for a field.
    #[must_use]
    pub fn field_error(&self, field: &str) -> Option<&str> {
        self.field_errors
            .get(field)
            .and_then(|m| m.first())
            .map(String::as_str)
    }
}

impl From<TransportError> for ApiError {
    fn from(error: TransportError) -> Self {
        Self::from_transport(&error)
    }
}

impl From<DomainError> for ApiError {
    fn from(error: DomainError) -> Self {
        Self::unexpected(error.to_string())
    }
}

/// Pulls a human message out of a server payload.
fn server_message(payload: &Value) -> Option<String> {
    let candidates = [
        payload.get("message"),
        payload.get("error").filter(|e| e.is_string()),
        payload.get("error").and_then(|e| e.get("message")),
        payload.get("detail"),
    ];
    candidates
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
        .map(str::trim)
        .find(|m| !m.is_empty())
        .map(str::to_string)
}

/// Reads `{errors: {field: "msg" | ["msg", ...]}}`.
pub(crate) fn field_errors(payload: &Value) -> BTreeMap<String, Vec<String>> {
    let Some(errors) = payload.get("errors").and_then(Value::as_object) else {
        return BTreeMap::new();
    };
    errors
        .iter()
        .filter_map(|(field, value)| {
            let messages: Vec<String> = match value {
                Value::String(s) => vec![s.clone()],
                Value::Array(items) => items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect(),
                _ => Vec::new(),
            };
            (!messages.is_empty()).then(|| (field.clone(), messages))
        })
        .collect()
}

const fn fallback_message(status: u16) -> &'static str {
    match status {
        400 => "The request was invalid. Please review your input.",
        403 => "You do not have permission to perform this action.",
        404 => "The requested resource was not found.",
        429 => "Too many requests. Please wait a moment and try again.",
        500 => "The server encountered an error. Please try again later.",
        503 => "The service is temporarily unavailable. Please try again later.",
        _ => "The request failed. Please try again.",
    }
}
