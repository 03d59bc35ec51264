//! Server startup and shutdown logic.
//!
//! This module contains the `run_server` function which handles:
//! - Database pool initialization
//! - Migration running
//! - Application state creation
//! - Router creation
//! - Server binding and graceful shutdown

use crate::config::Config;
use crate::db::Repository;
use crate::error::{AppError, AppResult};
use crate::routes;
use crate::state::AppState;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// Run the web server with the given configuration.
///
/// # Errors
///
/// This function will return an error if:
/// - Database connection fails
/// - Migration fails
/// - Server binding fails
/// - Server runtime error occurs
pub async fn run_server(config: Config, should_migrate: bool) -> AppResult<()> {
    info!("Starting slugly server...");

    info!("Connecting to database {}...", config.database.describe());
    let repository = Repository::new(&config.database).await?;

    if should_migrate {
        info!("Running database migrations...");
        repository.run_migrations().await?;
        info!("Migrations completed successfully");
    }

    match &config.links.short_url {
        Some(short_url) => info!("Short URL base: {}", short_url),
        None => warn!("short_url is not set; shorten requests will fail"),
    }

    if config.links.default_url.is_none() {
        info!("default_url is not set; unmatched paths answer 404");
    }

    let state = Arc::new(AppState::new(Arc::new(repository), config.links.clone()));
    let app = routes::create_router(state);

    let addr = config.server.addr();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to bind to address {}: {}", addr, e)))?;

    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(create_shutdown_signal())
        .await
        .map_err(|e| AppError::Internal(format!("Server error: {}", e)))?;

    info!("Server shutdown complete");
    Ok(())
}

/// Create a future that resolves when a shutdown signal is received.
///
/// On Unix-like systems, this listens for both Ctrl+C (SIGINT) and SIGTERM.
/// On other platforms, it only listens for Ctrl+C.
///
/// # Panics
///
/// Panics if signal handler installation fails.
async fn create_shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(unix)]
    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    #[cfg(not(unix))]
    ctrl_c.await;

    info!("Shutdown signal received");
}
