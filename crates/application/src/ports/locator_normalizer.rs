//! File locator normalization port

use async_trait::async_trait;
use vendorlink_domain::{FilePart, NormalizedFile};

/// Turns picker-provided file parts into uploadable files.
///
/// One implementation exists per platform quirk. Implementations never fail:
/// when a locator cannot be made readable they return it unchanged and let
/// the upload fail.
#[async_trait]
pub trait LocatorNormalizer: Send + Sync {
    /// Normalizes a single file part.
    async fn normalize(&self, part: &FilePart) -> NormalizedFile;
}

/// Normalizer that leaves locators untouched and only fills in media type
/// and filename.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityNormalizer;

#[async_trait]
impl LocatorNormalizer for IdentityNormalizer {
    async fn normalize(&self, part: &FilePart) -> NormalizedFile {
        NormalizedFile::from_part(part, part.locator.clone())
    }
}
