//! HTTP server startup logic.

use std::time::Duration;

use axum::Router;
use axum_server::Handle;

use crate::config::{ConfigError, HttpServerConfig};

use super::shutdown;

/// Server startup error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid server address: {0}")]
    Address(#[from] ConfigError),

    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),
}

/// Start the HTTP server based on configuration.
///
/// This function blocks until the server shuts down.
pub async fn start_server(app: Router, config: &HttpServerConfig) -> Result<(), ServerError> {
    let addr = config.socket_addr()?;
    let handle = Handle::new();

    tracing::info!(%addr, "Starting HTTP server");

    shutdown::setup_shutdown_handler(
        handle.clone(),
        Duration::from_secs(config.shutdown_grace_seconds),
    );

    axum_server::bind(addr)
        .handle(handle)
        .serve(app.into_make_service())
        .await?;

    tracing::info!("HTTP server stopped");
    Ok(())
}
