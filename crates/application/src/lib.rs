//! Vendorlink Application - Request pipeline and vendor operations
//!
//! This crate defines the application layer with:
//! - Port traits (transport, credential storage, file locators)
//! - The resilient request pipeline and its retry policy
//! - Error classification
//! - Named vendor operations

pub mod api;
pub mod error;
pub mod pipeline;
pub mod ports;
pub mod retry;
pub mod session;

pub use api::VendorApi;
pub use error::{ApiError, ApiErrorKind, ApiResult};
pub use pipeline::{ApiResponse, DEFAULT_TIMEOUT, PipelineSettings, RequestPipeline};
pub use ports::{
    CredentialStore, CredentialStoreError, HttpTransport, IdentityNormalizer, LocatorNormalizer,
    PreparedRequest, TransportError,
};
pub use retry::{RetryPolicy, with_retry};
pub use session::InMemoryCredentialStore;
