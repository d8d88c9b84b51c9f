//! Vendorlink - wiring for the vendor client
//!
//! Builds a [`VendorApi`] from a [`ClientConfig`] using the reqwest
//! transport, the file-backed credential store and the platform's locator
//! normalizer.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use vendorlink_application::{
    ApiResult, CredentialStore, RequestPipeline, TransportError, VendorApi,
};
use vendorlink_domain::vendor::{OrderFilter, OrderStatus};
use vendorlink_infrastructure::{
    ClientConfig, ConfigError, ContentSource, FileCredentialStore, ReqwestTransport,
    UnavailableContentSource,
};

/// The vendor API as wired for production.
pub type Client = VendorApi<ReqwestTransport>;

/// Errors raised while starting the client.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The HTTP client could not be created.
    #[error("Failed to create HTTP client: {0}")]
    Transport(#[from] TransportError),
}

/// Builds the client from configuration.
///
/// `content_source` reads `content://` locators on Android; hosts without a
/// content resolver pass `None`.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be created.
pub fn build_client(
    config: &ClientConfig,
    content_source: Option<Arc<dyn ContentSource>>,
) -> Result<Client, AppError> {
    let transport = Arc::new(ReqwestTransport::new(config.user_agent())?);
    let credentials: Arc<dyn CredentialStore> =
        Arc::new(FileCredentialStore::new(config.credential_path()));
    let source = content_source.unwrap_or_else(|| Arc::new(UnavailableContentSource));
    let normalizer = config.platform.normalizer(config.cache_dir(), source);

    tracing::debug!(
        base_url = %config.base_url,
        platform = ?config.platform,
        "client configured"
    );

    let pipeline = RequestPipeline::new(
        transport,
        credentials,
        normalizer,
        config.pipeline_settings(),
    );
    Ok(VendorApi::new(Arc::new(pipeline)))
}

/// Figures shown on the vendor home screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    /// Wallet balance record.
    pub wallet: Value,
    /// Earnings summary record.
    pub earnings: Value,
    /// Orders waiting for a decision.
    pub pending_orders: Vec<Value>,
}

/// Loads the dashboard, issuing the three reads concurrently.
///
/// # Errors
///
/// Returns the first classified error.
pub async fn dashboard<T>(api: &VendorApi<T>) -> ApiResult<DashboardSnapshot>
where
    T: vendorlink_application::HttpTransport,
{
    let pending = OrderFilter::status(OrderStatus::Pending);
    let (wallet, earnings, pending_orders) = tokio::try_join!(
        api.wallet_balance(),
        api.earnings_summary(None),
        api.list_orders(&pending),
    )?;
    Ok(DashboardSnapshot {
        wallet,
        earnings,
        pending_orders,
    })
}
