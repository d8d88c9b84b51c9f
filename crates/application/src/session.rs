//! In-memory credential storage.
//!
//! Used by tests and by hosts that keep the session only for the lifetime of
//! the process.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use vendorlink_domain::Credential;

use crate::ports::{CredentialStore, CredentialStoreError};

/// Thread-safe in-memory credential store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCredentialStore {
    credential: Arc<RwLock<Option<Credential>>>,
}

impl InMemoryCredentialStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store already holding a token.
    #[must_use]
    pub fn with_credential(credential: Credential) -> Self {
        Self {
            credential: Arc::new(RwLock::new(Some(credential))),
        }
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn load(&self) -> Result<Option<Credential>, CredentialStoreError> {
        Ok(self.credential.read().await.clone())
    }

    async fn save(&self, credential: &Credential) -> Result<(), CredentialStoreError> {
        *self.credential.write().await = Some(credential.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), CredentialStoreError> {
        self.credential.write().await.take();
        Ok(())
    }
}
