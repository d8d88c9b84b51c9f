//! Normalizer for platforms whose locators are already file paths.

use async_trait::async_trait;
use vendorlink_application::LocatorNormalizer;
use vendorlink_domain::{FilePart, NormalizedFile, request::FILE_SCHEME};

use super::file_size;

/// Normalizer for platforms whose pickers return readable files.
///
/// Strips a `file://` prefix and fills in media type, filename and size.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughNormalizer;

#[async_trait]
impl LocatorNormalizer for PassthroughNormalizer {
    async fn normalize(&self, part: &FilePart) -> NormalizedFile {
        let locator = part
            .locator
            .strip_prefix(FILE_SCHEME)
            .unwrap_or(&part.locator)
            .to_string();
        let mut file = NormalizedFile::from_part(part, locator);
        if file.size.is_none() {
            file.size = file_size(&file.locator).await;
        }
        file
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_strips_file_scheme_and_reads_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cover.gif");
        tokio::fs::write(&path, b"GIF89a").await.unwrap();

        let part = FilePart::new(format!("file://{}", path.display()));
        let file = PassthroughNormalizer.normalize(&part).await;

        assert_eq!(file.locator, path.display().to_string());
        assert_eq!(file.media_type, "image/gif");
        assert_eq!(file.file_name, "cover.gif");
        assert_eq!(file.size, Some(6));
    }

    #[tokio::test]
    async fn test_missing_file_keeps_locator() {
        let part = FilePart::new("/does/not/exist.png").with_file_name("logo.png");
        let file = PassthroughNormalizer.normalize(&part).await;
        assert_eq!(file.locator, "/does/not/exist.png");
        assert_eq!(file.file_name, "logo.png");
        assert_eq!(file.size, None);
    }
}
