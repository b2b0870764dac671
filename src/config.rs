//! Configuration loading and constants.
//!
//! Loads application configuration from TOML files and defines constants for
//! the fixed endpoint payloads, logging defaults, and default paths. `AppConfig`
//! is the root configuration struct containing all settings. Every section is
//! optional, so an empty file (or no file at all) yields a runnable service.

use serde::Deserialize;
use std::net::SocketAddr;
use std::path::Path;

// =============================================================================
// Endpoint Payloads
// =============================================================================

/// Body returned by the liveness probe
pub const HEALTH_BODY: &str = "ok";

/// Annotation attached to the deliberate fault ("intentional exception for test purposes").
/// Only ever written to logs, never to a response body.
pub const INTENTIONAL_FAULT_MESSAGE: &str = "테스트 목적의 의도적 예외";

// =============================================================================
// HTTP Server Defaults
// =============================================================================

/// Default bind host
pub const DEFAULT_HTTP_HOST: &str = "0.0.0.0";

/// Default bind port
pub const DEFAULT_HTTP_PORT: u16 = 8080;

/// Seconds to wait for in-flight requests after a shutdown signal
pub const DEFAULT_SHUTDOWN_GRACE_SECS: u64 = 30;

// =============================================================================
// Default Paths and Strings
// =============================================================================

/// Default configuration file path
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Default log filter when RUST_LOG is not set
pub const DEFAULT_LOG_FILTER: &str = "deme_error=debug,tower_http=debug";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub http: HttpServerConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpServerConfig {
    #[serde(default = "HttpServerConfig::default_host")]
    pub host: String,
    #[serde(default = "HttpServerConfig::default_port")]
    pub port: u16,
    /// Drain period for open connections on SIGTERM/SIGINT
    #[serde(default = "HttpServerConfig::default_shutdown_grace")]
    pub shutdown_grace_seconds: u64,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
            shutdown_grace_seconds: Self::default_shutdown_grace(),
        }
    }
}

impl HttpServerConfig {
    fn default_host() -> String {
        DEFAULT_HTTP_HOST.to_string()
    }

    fn default_port() -> u16 {
        DEFAULT_HTTP_PORT
    }

    fn default_shutdown_grace() -> u64 {
        DEFAULT_SHUTDOWN_GRACE_SECS
    }

    /// Resolve host and port into a bindable socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| {
                ConfigError::Validation(format!(
                    "Invalid http.host or http.port ({}:{}): {}",
                    self.host, self.port, e
                ))
            })
    }
}

/// Output format for log lines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per line, for log shippers
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
    /// Log format: "text" (human-readable, default) or "json" (structured)
    #[serde(default)]
    pub format: LogFormat,
}

impl AppConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration, falling back to defaults when the file is absent.
    ///
    /// The fallback only applies when `explicit` is false, i.e. the path is the
    /// built-in default rather than one the operator asked for.
    pub fn load_or_default<P: AsRef<Path>>(path: P, explicit: bool) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !explicit && !path.exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.http.shutdown_grace_seconds == 0 {
            return Err(ConfigError::Validation(
                "http.shutdown_grace_seconds must be greater than zero".to_string(),
            ));
        }
        self.http.socket_addr()?;
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Configuration error: {0}")]
    Validation(String),
}
