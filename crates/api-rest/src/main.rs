//! Standalone REST API server binary.
//!
//! ## Purpose
//! Runs the REST API server on its own, against an in-memory store seeded with demonstration
//! reference data.
//!
//! ## Intended use
//! Development and debugging of the form endpoints. The workspace's `registry-run` binary serves
//! the same router after loading `.env`.

use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{app, config_from_env, AppState, MemoryStore};
use registry_core::config::rest_addr_from_env_value;

/// Main entry point for the registry REST API server
///
/// # Environment Variables
/// - `REGISTRY_REST_ADDR`: Server address (default: "0.0.0.0:3000")
/// - `MINIMUM_PASSWORD_STRENGTH`: Required password strength, 0..=1 (default: 0.3)
/// - `REGISTRY_SITE_NAME`: Site name reported by `/health` (default: "registry.dev")
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the configuration is invalid,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = rest_addr_from_env_value(std::env::var("REGISTRY_REST_ADDR").ok());
    let cfg = Arc::new(config_from_env()?);

    tracing::info!("-- Starting registry REST API on {}", addr);

    let state = AppState::new(cfg, Arc::new(MemoryStore::seeded()));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app(state)).await?;

    Ok(())
}
