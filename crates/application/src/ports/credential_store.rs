//! Credential store port
//!
//! Defines the interface for bearer-token persistence.

use async_trait::async_trait;
use vendorlink_domain::Credential;

/// Errors that can occur during credential store operations.
#[derive(Debug, thiserror::Error)]
pub enum CredentialStoreError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Key-value store holding the session's bearer token.
///
/// The pipeline only reads the token and clears it when the server rejects
/// it; `save` is used by the login operation.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Reads the stored token.
    ///
    /// # Returns
    /// `None` if no session is stored.
    async fn load(&self) -> Result<Option<Credential>, CredentialStoreError>;

    /// Stores a token, replacing any previous one.
    ///
    /// # Errors
    /// Returns an error if the token cannot be persisted.
    async fn save(&self, credential: &Credential) -> Result<(), CredentialStoreError>;

    /// Removes the token and any session data stored with it.
    ///
    /// # Errors
    /// Returns an error if the stored data cannot be removed.
    async fn clear(&self) -> Result<(), CredentialStoreError>;
}
