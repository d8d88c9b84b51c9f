//! HTTP infrastructure utilities.
//!
//! This module provides body building for JSON and multipart requests.

mod body_builder;

pub use body_builder::{BuiltBody, build_body};
