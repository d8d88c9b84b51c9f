//! Vendorlink - Main Entry Point
//!
//! Loads configuration, signs in when credentials are provided through the
//! environment, and prints the dashboard snapshot as JSON.
//!
//! Usage: `vendorlink [config.toml]`

use std::path::PathBuf;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use vendorlink::{build_client, dashboard};
use vendorlink_application::ApiErrorKind;
use vendorlink_domain::vendor::LoginInput;
use vendorlink_infrastructure::ClientConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => ClientConfig::load_from(&path)?,
        None => ClientConfig::load()?,
    };

    tracing::info!(
        "Starting Vendorlink v{} against {}",
        env!("CARGO_PKG_VERSION"),
        config.base_url
    );

    let api = build_client(&config, None)?;

    if let (Ok(login), Ok(password)) = (
        std::env::var("VENDORLINK_LOGIN"),
        std::env::var("VENDORLINK_PASSWORD"),
    ) {
        api.login(&LoginInput { login, password }).await?;
    }

    match dashboard(&api).await {
        Ok(snapshot) => {
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
            Ok(())
        }
        Err(e) if e.kind == ApiErrorKind::AuthExpired => {
            tracing::error!(
                "{}: sign in with VENDORLINK_LOGIN and VENDORLINK_PASSWORD",
                e.kind.title()
            );
            Err(e.into())
        }
        Err(e) => {
            tracing::error!(kind = ?e.kind, status = ?e.status, "{}", e.message);
            Err(e.into())
        }
    }
}
