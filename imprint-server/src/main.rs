//! Imprint Server - REST API for the content fingerprint registry
//!
//! Exposes imprint-core over HTTP:
//! - POST /register - Register a content fingerprint
//! - POST /claim - Resolve an ownership claim
//! - POST /content - Either of the above, selected by `mode`

use std::net::SocketAddr;

use anyhow::{Context, Result};
use imprint_server::{create_router_with_config, Config};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "imprint_server=info,imprint_core=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    let addr = config.socket_addr();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        similarity_threshold = config.similarity_threshold,
        "Starting Imprint registry server"
    );

    let app = create_router_with_config(&config).context("Failed to build application")?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    info!("Listening on http://{}", addr);
    info!("API docs at http://{}/docs", addr);

    // Connect info feeds the per-IP rate limiter
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
