//! IoT Manager Gateway - management HTTP API
//!
//! This is the main entry point for the gateway service.
//!
//! # Configuration
//!
//! Settings are read from `IOT_MANAGER_*` environment variables (see
//! [`GatewayConfig::from_env`]). Set `IOT_MANAGER_TWIN_BACKEND_URL` to enable
//! device operations; without it only tenant settings are served.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use iot_manager_app::{
    HttpTwinBackend, ManagerService, TwinBackend, TwinBackendConfig, UnconfiguredTwinBackend,
};
use iot_manager_auth::JwtIdentityDecoder;
use iot_manager_gateway::{create_router, server, GatewayConfig, GatewayState};
use iot_manager_store::RocksStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration from environment
    let config = GatewayConfig::from_env()?;

    // Initialize tracing
    let default_filter = if config.debug_log {
        "debug"
    } else {
        "info,iot_manager=debug"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting IoT Manager Gateway");
    tracing::info!(
        listen_addr = %config.listen_addr,
        data_dir = %config.data_dir.display(),
        twin_backend_url = ?config.twin_backend_url,
        health_timeout_seconds = config.health_timeout_seconds,
        shutdown_grace_seconds = config.shutdown_grace_seconds,
        "Gateway configuration loaded"
    );

    // Initialize RocksDB store
    tracing::info!(path = %config.data_dir.display(), "Opening RocksDB store");
    let store = Arc::new(RocksStore::open(&config.data_dir)?);

    match config.twin_backend_url.clone() {
        Some(url) => {
            tracing::info!(twin_backend_url = %url, "Device twin backend enabled");
            let twins = Arc::new(HttpTwinBackend::new(TwinBackendConfig::new(url))?);
            run(store, twins, config).await
        }
        None => {
            tracing::warn!(
                "No IOT_MANAGER_TWIN_BACKEND_URL set - device operations are unavailable"
            );
            run(store, Arc::new(UnconfiguredTwinBackend::new()), config).await
        }
    }
}

async fn run<T>(
    store: Arc<RocksStore>,
    twins: Arc<T>,
    config: GatewayConfig,
) -> Result<(), Box<dyn std::error::Error>>
where
    T: TwinBackend + 'static,
{
    let app = Arc::new(ManagerService::new(store, twins));
    let decoder = Arc::new(JwtIdentityDecoder::new());

    // Build gateway state and router
    let listen_addr = config.listen_addr.clone();
    let grace = config.shutdown_grace();
    let state = GatewayState::new(app, decoder, config);
    let router = create_router(state);
    tracing::info!("Router configured with all API endpoints");

    // Start HTTP server
    tracing::info!(listen_addr = %listen_addr, "Starting HTTP server");
    let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
    server::serve(listener, router, server::shutdown_signal(), grace).await;

    tracing::info!("IoT Manager Gateway stopped");
    Ok(())
}
