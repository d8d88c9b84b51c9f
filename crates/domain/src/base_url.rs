//! Sanitized backend base URL.

use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{DomainError, DomainResult};

/// The backend base URL, cleaned once at startup.
///
/// Values pasted into environment files often carry quotes, stray
/// whitespace, a missing scheme or a trailing slash. [`BaseUrl::sanitize`]
/// removes all of that so that `join("/orders")` always yields a single
/// slash between base and path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BaseUrl(String);

impl BaseUrl {
    /// Cleans and validates a raw base URL.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidBaseUrl` if nothing usable remains or the
    /// result is not an http(s) URL with a host.
    pub fn sanitize(raw: &str) -> DomainResult<Self> {
        let cleaned: String = raw
            .chars()
            .filter(|c| !c.is_whitespace() && !c.is_control() && !matches!(c, '"' | '\'' | '`'))
            .collect();

        if cleaned.is_empty() {
            return Err(DomainError::InvalidBaseUrl("base URL is empty".to_string()));
        }

        let with_scheme = if cleaned.contains("://") {
            cleaned
        } else {
            format!("https://{cleaned}")
        };
        let trimmed = with_scheme.trim_end_matches('/');

        let parsed =
            Url::parse(trimmed).map_err(|e| DomainError::InvalidBaseUrl(format!("{e}: {raw}")))?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
            return Err(DomainError::InvalidBaseUrl(format!(
                "expected an http(s) URL with a host: {raw}"
            )));
        }

        Ok(Self(trimmed.to_string()))
    }

    /// Returns the base URL without a trailing slash.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Joins a request path onto the base URL.
    #[must_use]
    pub fn join(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        if path.is_empty() {
            self.0.clone()
        } else {
            format!("{}/{path}", self.0)
        }
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for BaseUrl {
    type Error = DomainError;

    fn try_from(value: String) -> DomainResult<Self> {
        Self::sanitize(&value)
    }
}

impl From<BaseUrl> for String {
    fn from(value: BaseUrl) -> Self {
        value.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_sanitize_strips_noise() {
        let url = BaseUrl::sanitize("  \"https://api.example.com/v1/\"\n").unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/v1");
    }

    #[test]
    fn test_sanitize_defaults_scheme() {
        let url = BaseUrl::sanitize("api.example.com").unwrap();
        assert_eq!(url.as_str(), "https://api.example.com");
    }

    #[test]
    fn test_sanitize_keeps_http() {
        let url = BaseUrl::sanitize("http://10.0.2.2:8000/api//").unwrap();
        assert_eq!(url.as_str(), "http://10.0.2.2:8000/api");
    }

    #[test]
    fn test_sanitize_removes_control_characters() {
        let url = BaseUrl::sanitize("'https://api.exa\tmple.com\r'").unwrap();
        assert_eq!(url.as_str(), "https://api.example.com");
    }

    #[test]
    fn test_sanitize_rejects_garbage() {
        assert!(BaseUrl::sanitize("   ").is_err());
        assert!(BaseUrl::sanitize("\"\"").is_err());
        assert!(BaseUrl::sanitize("ftp://files.example.com").is_err());
    }

    #[test]
    fn test_join() {
        let url = BaseUrl::sanitize("https://api.example.com/v1").unwrap();
        assert_eq!(url.join("/orders"), "https://api.example.com/v1/orders");
        assert_eq!(url.join("orders/1"), "https://api.example.com/v1/orders/1");
        assert_eq!(url.join(""), "https://api.example.com/v1");
    }
}
