//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur during validation or processing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The configured base URL is empty or malformed.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// A request payload cannot be encoded into a body.
    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    /// A path parameter or identifier is invalid or empty.
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
