//! Intake server - form submission API.
//!
//! Boots the configuration, connects to MongoDB, wires the uploader and
//! mailer adapters, and serves the HTTP surface until SIGINT/SIGTERM.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use tokio::{net::TcpListener, signal};
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use intake::notify::SmtpMailer;
use intake::storage::CloudStorage;
use intake::store::RecordStore;
use intake::web::{router, AppState};
use intake::Config;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize structured JSON logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().flatten_event(true))
        .init();

    info!("server_starting");

    // Load configuration
    let config = Config::from_env();
    info!(
        port = config.port,
        db = %config.mongodb_db,
        storage_configured = config.storage.is_configured(),
        smtp_configured = config.smtp.is_configured(),
        frontend_url = ?config.frontend_url,
        "config_loaded"
    );

    if !config.storage.is_configured() {
        warn!("storage_credentials_missing_uploads_will_fail");
    }

    // Connect to MongoDB and make sure the lookup indexes exist
    let store = RecordStore::connect(&config.mongodb_uri, &config.mongodb_db)
        .await
        .context("Failed to connect to MongoDB")?;
    store
        .ensure_indexes()
        .await
        .context("Failed to create indexes")?;

    let storage = CloudStorage::new(config.storage.clone());

    let mailer = SmtpMailer::from_settings(&config.smtp).context("Invalid SMTP configuration")?;
    if mailer.is_none() {
        warn!("smtp_credentials_missing_email_disabled");
    }

    let port = config.port;
    let state = AppState::new(config, store, storage, mailer);
    let app = router(state);

    // Bind to address
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!(address = %addr, "server_listening");

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("server_shutdown_complete");

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
        _ = ctrl_c => info!("Received SIGINT"),
        _ = terminate => info!("Received SIGTERM"),
    }

    info!("server_shutting_down");
}
