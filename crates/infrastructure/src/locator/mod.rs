//! File locator normalizers.
//!
//! Image pickers hand over locators the transport cannot always read. One
//! normalizer exists per platform quirk; [`Platform::normalizer`] picks the
//! right one at construction time.

mod content_uri;
mod passthrough;

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use vendorlink_application::LocatorNormalizer;

pub use content_uri::{ContentSource, ContentUriNormalizer, UnavailableContentSource};
pub use passthrough::PassthroughNormalizer;

/// Platform the client runs on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Android: pickers return `content://` locators.
    Android,
    /// iOS: pickers return `file://` locators.
    Ios,
    /// Desktop hosts and tests: plain paths.
    #[default]
    Desktop,
}

impl Platform {
    /// Builds the normalizer for this platform.
    ///
    /// `source` is only used on Android, where it reads `content://` bytes
    /// into `cache_dir`.
    #[must_use]
    pub fn normalizer(
        self,
        cache_dir: PathBuf,
        source: Arc<dyn ContentSource>,
    ) -> Arc<dyn LocatorNormalizer> {
        match self {
            Self::Android => Arc::new(ContentUriNormalizer::new(source, cache_dir)),
            Self::Ios | Self::Desktop => Arc::new(PassthroughNormalizer),
        }
    }
}

impl std::str::FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "android" => Ok(Self::Android),
            "ios" => Ok(Self::Ios),
            "desktop" => Ok(Self::Desktop),
            other => Err(format!("unknown platform: {other}")),
        }
    }
}

/// Size of a local file, if it can be read.
async fn file_size(path: &str) -> Option<u64> {
    tokio::fs::metadata(path).await.ok().map(|m| m.len())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_platform_from_str() {
        assert_eq!("Android".parse::<Platform>().unwrap(), Platform::Android);
        assert_eq!(" ios ".parse::<Platform>().unwrap(), Platform::Ios);
        assert!("web".parse::<Platform>().is_err());
    }
}
