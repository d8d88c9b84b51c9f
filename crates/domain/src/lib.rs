//! Vendorlink Domain - Core types
//!
//! This crate defines the domain model for the vendor request pipeline.
//! All types here are pure Rust with no I/O dependencies.

pub mod base_url;
pub mod credential;
pub mod error;
pub mod request;
pub mod response;
pub mod vendor;

pub use base_url::BaseUrl;
pub use credential::Credential;
pub use error::{DomainError, DomainResult};
pub use request::{
    FilePart, HttpMethod, MultipartForm, NormalizedFile, Payload, PayloadValue, RequestBody,
    RequestDescriptor,
};
pub use response::{ResponseSpec, StatusCode, normalize_record, normalize_records};
