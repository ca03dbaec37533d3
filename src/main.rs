use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{AppState, MemoryStore, app, config_from_env};
use registry_core::config::rest_addr_from_env_value;

/// Main entry point for the registry application
///
/// Loads `.env`, resolves the core configuration and serves the REST API.
///
/// # Environment Variables
/// - `REGISTRY_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `MINIMUM_PASSWORD_STRENGTH`: Required password strength, 0..=1 (default: 0.3)
/// - `REGISTRY_SITE_NAME`: Site name reported by `/health` (default: "registry.dev")
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If configuration, startup or the server fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("registry=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = rest_addr_from_env_value(std::env::var("REGISTRY_REST_ADDR").ok());
    let cfg = Arc::new(config_from_env()?);

    tracing::info!("++ Starting registry REST on {} ({})", rest_addr, cfg.site_name());

    let state = AppState::new(cfg, Arc::new(MemoryStore::seeded()));

    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, app(state)).await?;

    Ok(())
}
