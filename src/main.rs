//! deme-error: health and fault-injection HTTP service.
//!
//! This is the application entry point. It loads configuration from a TOML
//! file, initializes tracing, builds the Axum router, and starts the HTTP
//! server.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use deme_error::config::{AppConfig, LogFormat, DEFAULT_CONFIG_PATH, DEFAULT_LOG_FILTER};
use deme_error::create_router;
use deme_error::http::start_server;

/// deme-error: health check and fault-injection endpoints
#[derive(Parser, Debug)]
#[command(name = "deme-error", version, about)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Log level filter (e.g., "deme_error=debug,tower_http=info")
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Missing file is only tolerated for the built-in default path
    let explicit = args.config.is_some();
    let config_path = args
        .config
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = AppConfig::load_or_default(&config_path, explicit)?;

    // Initialize tracing with priority: CLI > env > default
    let log_filter = args
        .log_level
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

    let registry =
        tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::new(&log_filter));
    match config.logging.format {
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_current_span(true),
            )
            .init(),
    }

    tracing::info!(
        path = %config_path,
        host = %config.http.host,
        port = config.http.port,
        format = ?config.logging.format,
        "Loaded configuration"
    );

    let app = create_router();
    start_server(app, &config.http).await?;

    Ok(())
}
