//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the request pipeline and external
//! systems. Each port is a trait implemented by adapters in the
//! infrastructure layer.

mod credential_store;
mod http_transport;
mod locator_normalizer;

pub use credential_store::{CredentialStore, CredentialStoreError};
pub use http_transport::{HttpTransport, PreparedRequest, TransportError};
pub use locator_normalizer::{IdentityNormalizer, LocatorNormalizer};
