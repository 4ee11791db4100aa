//! Mail relay server.
//!
//! Serves `POST /email` and, on shutdown, waits for every accepted email to
//! finish dispatching before the process exits.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use tokio::{net::TcpListener, signal};
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use mailrelay::{router, AppState, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize structured JSON logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().flatten_event(true))
        .init();

    info!("mail_relay_starting");

    // Load configuration
    let config = Config::from_env();
    info!(
        port = config.port,
        auth_configured = config.auth_configured(),
        provider_url = %config.provider_url,
        provider_api_key_configured = config.provider_api_key.is_some(),
        dispatch_timeout_ms = config.dispatch_timeout.as_millis() as u64,
        "config_loaded"
    );

    if !config.auth_configured() {
        warn!("auth_secret_not_configured_all_requests_rejected");
    }

    let state = AppState::new(config.clone()).context("Failed to build application state")?;
    let deferred = state.deferred.clone();
    let app = router(state);

    // Bind to address
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!(address = %addr, "mail_relay_listening");

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    // Accepted emails must finish dispatching before exit
    info!(pending = deferred.len(), "deferred_tasks_draining");
    deferred.drain().await;

    info!("mail_relay_shutdown_complete");

    Ok(())
}

/// Create a future that completes when a shutdown signal is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!(signal = "SIGINT", "shutdown_signal_received"),
        _ = terminate => info!(signal = "SIGTERM", "shutdown_signal_received"),
    }

    info!("mail_relay_shutting_down");
}
