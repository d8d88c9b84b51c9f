//! Named vendor operations.
//!
//! [`VendorApi`] is the surface screens call into. Each operation maps onto
//! one backend endpoint, goes through the [`RequestPipeline`], and returns
//! normalized records or a classified [`ApiError`].
//!
//! [`ApiError`]: crate::ApiError

mod account;
mod bank;
mod catalog;
mod orders;
mod wallet;

use std::sync::Arc;

use vendorlink_domain::DomainError;

use crate::error::ApiResult;
use crate::pipeline::RequestPipeline;
use crate::ports::HttpTransport;

/// Vendor operations over a shared pipeline.
///
/// Cloning is cheap; clones share the pipeline, so independent operations
/// can be issued from separate tasks and joined by the caller.
///
/// # Example
///
/// ```ignore
/// let api = VendorApi::new(Arc::new(pipeline));
/// let (balance, earnings) = tokio::join!(api.wallet_balance(), api.earnings_summary(None));
/// ```
pub struct VendorApi<T: HttpTransport> {
    pipeline: Arc<RequestPipeline<T>>,
}

impl<T: HttpTransport> Clone for VendorApi<T> {
    fn clone(&self) -> Self {
        Self {
            pipeline: Arc::clone(&self.pipeline),
        }
    }
}

impl<T: HttpTransport> VendorApi<T> {
    /// Creates the API over a pipeline.
    pub const fn new(pipeline: Arc<RequestPipeline<T>>) -> Self {
        Self { pipeline }
    }

    /// The underlying pipeline.
    #[must_use]
    pub const fn pipeline(&self) -> &Arc<RequestPipeline<T>> {
        &self.pipeline
    }
}

/// Validates a path parameter.
fn path_id(id: &str) -> ApiResult<&str> {
    let id = id.trim();
    if id.is_empty() || id.contains(['/', '?', '#']) {
        return Err(DomainError::InvalidIdentifier(id.to_string()).into());
    }
    Ok(id)
}
