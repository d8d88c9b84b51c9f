//! Vendorlink Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer, plus configuration loading.

pub mod adapters;
pub mod config;
pub mod http;
pub mod locator;
pub mod persistence;

pub use adapters::{DEFAULT_USER_AGENT, ReqwestTransport};
pub use config::{ClientConfig, ConfigError, RetrySettings};
pub use http::{BuiltBody, build_body};
pub use locator::{
    ContentSource, ContentUriNormalizer, PassthroughNormalizer, Platform, UnavailableContentSource,
};
pub use persistence::FileCredentialStore;
