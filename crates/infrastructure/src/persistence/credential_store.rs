//! File-based credential store.
//!
//! The session is stored as a small JSON document:
//! ```json
//! {
//!   "schema_version": 1,
//!   "token": "..."
//! }
//! ```

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::ser::{PrettyFormatter, Serializer};
use vendorlink_application::{CredentialStore, CredentialStoreError};
use vendorlink_domain::Credential;

const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct SessionFile {
    schema_version: u32,
    token: String,
}

/// Credential store persisting the token to a JSON file.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    /// Creates a store backed by `path`. The file is created on first save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the session file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn load(&self) -> Result<Option<Credential>, CredentialStoreError> {
        let content = match tokio::fs::read(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let session: SessionFile = serde_json::from_slice(&content)
            .map_err(|e| CredentialStoreError::Serialization(e.to_string()))?;
        Ok(Credential::new(session.token))
    }

    async fn save(&self, credential: &Credential) -> Result<(), CredentialStoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let session = SessionFile {
            schema_version: SCHEMA_VERSION,
            token: credential.token().to_string(),
        };
        let content = to_json_pretty(&session)?;

        // Atomic replace.
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &content).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), CredentialStoreError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Serializes with 2-space indentation and a trailing newline.
fn to_json_pretty<T: Serialize>(value: &T) -> Result<Vec<u8>, CredentialStoreError> {
    let mut buffer = Vec::new();
    let mut serializer =
        Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b"  "));
    value
        .serialize(&mut serializer)
        .map_err(|e| CredentialStoreError::Serialization(e.to_string()))?;
    buffer.push(b'\n');
    Ok(buffer)
}
