//! File parts attached to multipart payloads.

use serde::{Deserialize, Serialize};

/// Media type used when nothing better can be derived.
pub const FALLBACK_MEDIA_TYPE: &str = "image/jpeg";

/// Scheme of locators served by a content provider rather than the filesystem.
pub const CONTENT_SCHEME: &str = "content://";

/// Scheme prefix for plain file locators.
pub const FILE_SCHEME: &str = "file://";

/// A file the caller wants to upload, as handed over by the image picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilePart {
    /// Where the content lives (`content://...`, `file://...` or a path).
    pub locator: String,
    /// Media type declared by the picker, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    /// Filename declared by the picker, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    /// Size in bytes, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

impl FilePart {
    /// Creates a file part with only a locator.
    #[must_use]
    pub fn new(locator: impl Into<String>) -> Self {
        Self {
            locator: locator.into(),
            media_type: None,
            file_name: None,
            size: None,
        }
    }

    /// Sets the declared media type.
    #[must_use]
    pub fn with_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = Some(media_type.into());
        self
    }

    /// Sets the declared filename.
    #[must_use]
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    /// Returns true if the locator points at a content provider.
    #[must_use]
    pub fn is_content_locator(&self) -> bool {
        self.locator.starts_with(CONTENT_SCHEME)
    }

    /// Best-effort extension, taken from the locator then the declared filename.
    #[must_use]
    pub fn extension(&self) -> Option<String> {
        extension_of(&self.locator).or_else(|| self.file_name.as_deref().and_then(extension_of))
    }
}

/// A file part after locator normalization.
///
/// Every field is concrete: the locator is filesystem-resolvable (unless
/// materialization failed, in which case it is the original locator), the
/// media type and filename are never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedFile {
    /// Filesystem path of the content.
    pub locator: String,
    /// Concrete media type.
    pub media_type: String,
    /// Non-empty filename sent in the multipart disposition.
    pub file_name: String,
    /// Size in bytes, if known.
    pub size: Option<u64>,
}

impl NormalizedFile {
    /// Completes a file part without touching its locator.
    ///
    /// Missing media types are derived from the extension and missing
    /// filenames from the last locator segment.
    #[must_use]
    pub fn from_part(part: &FilePart, locator: impl Into<String>) -> Self {
        let locator = locator.into();
        let extension = extension_of(&locator).or_else(|| part.extension());
        let media_type = part
            .media_type
            .clone()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| media_type_for_extension(extension.as_deref()).to_string());
        let file_name = part
            .file_name
            .clone()
            .filter(|n| !n.trim().is_empty())
            .or_else(|| last_segment(&locator).filter(|s| s.contains('.')))
            .unwrap_or_else(|| format!("upload.{}", extension.as_deref().unwrap_or("jpg")));

        Self {
            locator,
            media_type,
            file_name,
            size: part.size,
        }
    }
}

/// Maps a file extension to the media type the backend expects.
#[must_use]
pub fn media_type_for_extension(extension: Option<&str>) -> &'static str {
    match extension.map(str::to_ascii_lowercase).as_deref() {
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => FALLBACK_MEDIA_TYPE,
    }
}

/// Extracts a plausible extension from a locator or filename.
///
/// Query strings and fragments are ignored, and only short alphanumeric
/// suffixes count, so opaque content ids are not mistaken for extensions.
#[must_use]
pub fn extension_of(value: &str) -> Option<String> {
    let segment = last_segment(value)?;
    let (_, ext) = segment.rsplit_once('.')?;
    let ext = ext.to_ascii_lowercase();
    (!ext.is_empty() && ext.len() <= 5 && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .then_some(ext)
}

fn last_segment(value: &str) -> Option<String> {
    let value = value.split(['?', '#']).next().unwrap_or(value);
    value
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_media_type_mapping() {
        assert_eq!(media_type_for_extension(Some("jpg")), "image/jpeg");
        assert_eq!(media_type_for_extension(Some("JPEG")), "image/jpeg");
        assert_eq!(media_type_for_extension(Some("png")), "image/png");
        assert_eq!(media_type_for_extension(Some("gif")), "image/gif");
        assert_eq!(media_type_for_extension(Some("webp")), "image/webp");
        assert_eq!(media_type_for_extension(Some("heic")), "image/jpeg");
        assert_eq!(media_type_for_extension(None), "image/jpeg");
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("/tmp/photo.PNG"), Some("png".to_string()));
        assert_eq!(extension_of("file:///a/b.webp?x=1"), Some("webp".to_string()));
        assert_eq!(extension_of("content://media/external/images/1234"), None);
        assert_eq!(extension_of("content://provider/img.v2-final_build"), None);
    }

    #[test]
    fn test_extension_falls_back_to_file_name() {
        let part = FilePart::new("content://media/42").with_file_name("dish.gif");
        assert_eq!(part.extension(), Some("gif".to_string()));
        assert!(part.is_content_locator());
    }

    #[test]
    fn test_normalized_from_part_fills_blanks() {
        let part = FilePart::new("/cache/dish.png");
        let file = NormalizedFile::from_part(&part, "/cache/dish.png");
        assert_eq!(file.media_type, "image/png");
        assert_eq!(file.file_name, "dish.png");
    }

    #[test]
    fn test_normalized_keeps_declared_values() {
        let part = FilePart::new("/cache/1")
            .with_media_type("image/webp")
            .with_file_name("logo.webp");
        let file = NormalizedFile::from_part(&part, "/cache/1");
        assert_eq!(file.media_type, "image/webp");
        assert_eq!(file.file_name, "logo.webp");
    }

    #[test]
    fn test_normalized_invents_file_name() {
        let part = FilePart::new("content://media/external/images/1234");
        let file = NormalizedFile::from_part(&part, part.locator.clone());
        assert_eq!(file.file_name, "upload.jpg");
        assert_eq!(file.media_type, "image/jpeg");
    }
}
