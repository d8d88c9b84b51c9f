//! Bearer credential.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An opaque bearer token.
///
/// `Debug` is redacted so the token never reaches logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
    /// Wraps a token. Returns `None` for blank tokens.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        let trimmed = token.trim();
        (!trimmed.is_empty()).then(|| Self(trimmed.to_string()))
    }

    /// Returns the raw token.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.0
    }

    /// Value for the `Authorization` header.
    #[must_use]
    pub fn authorization_value(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_blank_tokens_are_rejected() {
        assert!(Credential::new("").is_none());
        assert!(Credential::new("   ").is_none());
    }

    #[test]
    fn test_authorization_value() {
        let credential = Credential::new(" abc123 ").unwrap();
        assert_eq!(credential.token(), "abc123");
        assert_eq!(credential.authorization_value(), "Bearer abc123");
    }

    #[test]
    fn test_debug_is_redacted() {
        let credential = Credential::new("secret").unwrap();
        assert!(!format!("{credential:?}").contains("secret"));
    }
}
