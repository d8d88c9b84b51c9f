//! Client configuration.
//!
//! Sources, later overriding earlier:
//! 1. Built-in defaults
//! 2. `vendorlink.toml` in the working directory (optional) or an explicit file
//! 3. `VENDORLINK_*` environment variables, `__` separating nested keys
//!    (`VENDORLINK_RETRY__MAX_ATTEMPTS=5`)

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use vendorlink_application::{PipelineSettings, RetryPolicy};
use vendorlink_domain::BaseUrl;

use crate::adapters::DEFAULT_USER_AGENT;
use crate::locator::Platform;

/// Errors that can occur while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A source could not be read or a value has the wrong shape.
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// A value was read but is not acceptable.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Retry settings as written in configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrySettings {
    /// Attempts per operation, including the first.
    pub max_attempts: u32,
    /// Delay after the first failure, in milliseconds.
    pub base_delay_ms: u64,
    /// Cap on a single delay, in milliseconds.
    pub max_delay_ms: u64,
    /// Extra random delay as a fraction of the computed one.
    #[serde(default)]
    pub jitter_factor: f64,
}

/// Full client configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Backend base URL, sanitized on load.
    pub base_url: BaseUrl,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Retry settings.
    pub retry: RetrySettings,
    /// Platform the client runs on; selects the locator normalizer.
    pub platform: Platform,
    /// Where materialized uploads are written.
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
    /// Where the session token is stored.
    #[serde(default)]
    pub credential_path: Option<PathBuf>,
    /// User-Agent header.
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl ClientConfig {
    /// Loads from defaults, an optional `vendorlink.toml` and the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a source is malformed or the base URL is missing
    /// or invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let builder = defaults()?.add_source(File::with_name("vendorlink").required(false));
        Self::build(builder.add_source(environment()))
    }

    /// Loads from defaults, the given file and the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or malformed.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let builder = defaults()?.add_source(File::from(path));
        Self::build(builder.add_source(environment()))
    }

    /// Parses TOML on top of the defaults, ignoring the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or incomplete.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Self::build(defaults()?.add_source(File::from_str(content, FileFormat::Toml)))
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid("timeout_secs must be positive".into()));
        }
        if !(0.0..=1.0).contains(&self.retry.jitter_factor) {
            return Err(ConfigError::Invalid(
                "retry.jitter_factor must be between 0 and 1".into(),
            ));
        }
        Ok(())
    }

    /// Per-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Retry policy for the pipeline.
    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.retry.max_attempts,
            base_delay: Duration::from_millis(self.retry.base_delay_ms),
            max_delay: Duration::from_millis(self.retry.max_delay_ms),
            jitter_factor: self.retry.jitter_factor,
        }
    }

    /// Pipeline settings derived from this configuration.
    #[must_use]
    pub fn pipeline_settings(&self) -> PipelineSettings {
        PipelineSettings {
            base_url: self.base_url.clone(),
            default_timeout: self.timeout(),
            retry: self.retry_policy(),
        }
    }

    /// Cache directory, defaulting to the user cache dir.
    #[must_use]
    pub fn cache_dir(&self) -> PathBuf {
        self.cache_dir.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("vendorlink")
                .join("uploads")
        })
    }

    /// Session file path, defaulting to the user data dir.
    #[must_use]
    pub fn credential_path(&self) -> PathBuf {
        self.credential_path.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("vendorlink")
                .join("session.json")
        })
    }

    /// User-Agent header value.
    #[must_use]
    pub fn user_agent(&self) -> &str {
        self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT)
    }
}

fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Ok(Config::builder()
        .set_default("timeout_secs", 30)?
        .set_default("retry.max_attempts", 3)?
        .set_default("retry.base_delay_ms", 500)?
        .set_default("retry.max_delay_ms", 30_000)?
        .set_default("retry.jitter_factor", 0.0)?
        .set_default("platform", "desktop")?)
}

fn environment() -> Environment {
    Environment::with_prefix("VENDORLINK")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_fill_missing_values() {
        let config = ClientConfig::from_toml(r#"base_url = "api.example.com/v1/""#).unwrap();
        assert_eq!(config.base_url.as_str(), "https://api.example.com/v1");
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.retry_policy(), RetryPolicy::default());
        assert_eq!(config.platform, Platform::Desktop);
        assert!(config.user_agent().starts_with("Vendorlink/"));
    }

    #[test]
    fn test_full_file() {
        let config = ClientConfig::from_toml(
            r#"
            base_url = " 'https://vendors.example.com/api/' "
            timeout_secs = 10
            platform = "android"
            cache_dir = "/tmp/vl-cache"

            [retry]
            max_attempts = 5
            base_delay_ms = 200
            max_delay_ms = 2000
            "#,
        )
        .unwrap();
        assert_eq!(config.base_url.as_str(), "https://vendors.example.com/api");
        assert_eq!(config.platform, Platform::Android);
        assert_eq!(config.cache_dir(), PathBuf::from("/tmp/vl-cache"));
        let settings = config.pipeline_settings();
        assert_eq!(settings.default_timeout, Duration::from_secs(10));
        assert_eq!(settings.retry.max_attempts, 5);
        assert_eq!(settings.retry.base_delay, Duration::from_millis(200));
    }

    #[test]
    fn test_missing_base_url_is_error() {
        assert!(matches!(
            ClientConfig::from_toml("timeout_secs = 5"),
            Err(ConfigError::Load(_))
        ));
    }

    #[test]
    fn test_invalid_base_url_is_error() {
        assert!(ClientConfig::from_toml(r#"base_url = "ftp://files.example.com""#).is_err());
        assert!(ClientConfig::from_toml(r#"base_url = "  ""#).is_err());
    }

    #[test]
    fn test_zero_timeout_is_invalid() {
        assert!(matches!(
            ClientConfig::from_toml(
                r#"
                base_url = "https://api.example.com"
                timeout_secs = 0
                "#
            ),
            Err(ConfigError::Invalid(_))
        ));
    }

    fn load_with_env(vars: &[(&str, &str)]) -> Result<ClientConfig, ConfigError> {
        let source: config::Map<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ClientConfig::build(defaults()?.add_source(environment().source(Some(source))))
    }

    #[test]
    fn test_environment_variables() {
        let config = load_with_env(&[
            ("VENDORLINK_BASE_URL", "https://api.example.com/"),
            ("VENDORLINK_RETRY__MAX_ATTEMPTS", "5"),
            ("VENDORLINK_PLATFORM", "ios"),
        ])
        .unwrap();
        assert_eq!(config.base_url.as_str(), "https://api.example.com");
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.retry.base_delay_ms, 500);
        assert_eq!(config.platform, Platform::Ios);
    }

    #[test]
    fn test_double_underscore_prefix_is_ignored() {
        assert!(matches!(
            load_with_env(&[("VENDORLINK__BASE_URL", "https://api.example.com")]),
            Err(ConfigError::Load(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("client.toml");
        std::fs::write(&path, "base_url = \"https://api.example.com\"\n").unwrap();
        let config = ClientConfig::load_from(&path).unwrap();
        assert_eq!(config.base_url.as_str(), "https://api.example.com");
    }
}
