//! Normalizer for Android `content://` locators.
//!
//! Copies the bytes behind a content locator into the upload cache so the
//! transport can read them from disk. On failure the original locator is
//! kept.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;
use vendorlink_application::LocatorNormalizer;
use vendorlink_domain::{FilePart, NormalizedFile};

use super::PassthroughNormalizer;

/// Extensions preferred when a media type maps to several.
const PREFERRED_EXTENSIONS: &[&str] = &["jpg", "png", "gif", "webp"];

/// Reads the bytes behind a content-provider locator.
///
/// On Android this is backed by the platform content resolver; the host
/// injects it.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Reads all bytes referenced by `locator`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the content cannot be opened or read.
    async fn read(&self, locator: &str) -> io::Result<Vec<u8>>;
}

/// Source for hosts without a content resolver. Every read fails, so
/// `content://` locators fall back to the original locator.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableContentSource;

#[async_trait]
impl ContentSource for UnavailableContentSource {
    async fn read(&self, locator: &str) -> io::Result<Vec<u8>> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            format!("no content resolver for {locator}"),
        ))
    }
}

/// Normalizer that copies `content://` locators into the cache directory.
///
/// Other locators are handled like [`PassthroughNormalizer`].
pub struct ContentUriNormalizer {
    source: Arc<dyn ContentSource>,
    cache_dir: PathBuf,
}

impl ContentUriNormalizer {
    /// Creates a normalizer writing into `cache_dir`.
    pub fn new(source: Arc<dyn ContentSource>, cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            source,
            cache_dir: cache_dir.into(),
        }
    }

    /// The directory materialized files are written to.
    #[must_use]
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    async fn materialize(&self, part: &FilePart) -> io::Result<NormalizedFile> {
        let bytes = self.source.read(&part.locator).await?;

        tokio::fs::create_dir_all(&self.cache_dir).await?;
        let path = self
            .cache_dir
            .join(format!("{}.{}", Uuid::new_v4(), infer_extension(part)));
        tokio::fs::write(&path, &bytes).await?;

        let mut file = NormalizedFile::from_part(part, path.to_string_lossy().into_owned());
        file.size = Some(bytes.len() as u64);
        Ok(file)
    }
}

#[async_trait]
impl LocatorNormalizer for ContentUriNormalizer {
    async fn normalize(&self, part: &FilePart) -> NormalizedFile {
        if !part.is_content_locator() {
            return PassthroughNormalizer.normalize(part).await;
        }
        match self.materialize(part).await {
            Ok(file) => {
                tracing::debug!(
                    path = %file.locator,
                    size = ?file.size,
                    "materialized content locator"
                );
                file
            }
            Err(e) => {
                tracing::warn!(
                    locator = %part.locator,
                    error = %e,
                    "could not materialize content locator, uploading original"
                );
                NormalizedFile::from_part(part, part.locator.clone())
            }
        }
    }
}

/// Extension for a materialized file: locator or filename, then the declared
/// media type, then `jpg`.
fn infer_extension(part: &FilePart) -> String {
    part.extension()
        .or_else(|| {
            let media_type = part.media_type.as_deref()?;
            let extensions = mime_guess::get_mime_extensions_str(media_type)?;
            extensions
                .iter()
                .find(|e| PREFERRED_EXTENSIONS.contains(e))
                .or_else(|| extensions.first())
                .map(|e| (*e).to_string())
        })
        .unwrap_or_else(|| "jpg".to_string())
}
