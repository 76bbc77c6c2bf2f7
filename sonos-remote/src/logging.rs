//! Logging setup for the remote
//!
//! The library only emits `tracing` events; binaries pick how they are
//! rendered by calling [`init_logging`] once at startup.

use tracing_subscriber::{fmt, EnvFilter, Registry};

/// Logging mode for different use cases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoggingMode {
    /// No output
    Silent,
    /// Compact output
    Development,
    /// Verbose diagnostics with source locations
    Debug,
}

impl LoggingMode {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "silent" => Some(LoggingMode::Silent),
            "development" | "dev" => Some(LoggingMode::Development),
            "debug" => Some(LoggingMode::Debug),
            _ => None,
        }
    }

    /// Mode named by `SONOS_REMOTE_LOG_MODE`
    ///
    /// "silent", "development" and "debug" are recognized; anything else,
    /// including an unset variable, yields `fallback`.
    pub fn from_env(fallback: LoggingMode) -> Self {
        std::env::var("SONOS_REMOTE_LOG_MODE")
            .ok()
            .and_then(|name| LoggingMode::from_name(&name))
            .unwrap_or(fallback)
    }
}

/// Logging configuration error
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Failed to initialize tracing subscriber: {0}")]
    TracingInit(String),

    #[error("Invalid log filter '{0}'")]
    InvalidFilter(String),
}

/// Initialize logging with the specified mode
///
/// # Environment Variables
///
/// - `SONOS_REMOTE_LOG_LEVEL`: Override the filter (error, warn, info, debug, trace,
///   or a full directive such as `sonos_remote=debug`)
/// - `RUST_LOG`: Used when `SONOS_REMOTE_LOG_LEVEL` is unset
pub fn init_logging(mode: LoggingMode) -> Result<(), LoggingError> {
    init_logging_with_filter(mode, None)
}

/// Initialize logging with an explicit filter directive
///
/// `filter` takes precedence over the environment variables.
pub fn init_logging_with_filter(
    mode: LoggingMode,
    filter: Option<&str>,
) -> Result<(), LoggingError> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    match mode {
        LoggingMode::Silent => Ok(()),
        LoggingMode::Development => {
            let filter = create_env_filter(filter, "info")?;

            Registry::default()
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(false)
                        .with_thread_ids(false)
                        .with_file(false)
                        .with_line_number(false)
                        .compact(),
                )
                .with(filter)
                .try_init()
                .map_err(|e| LoggingError::TracingInit(e.to_string()))
        }
        LoggingMode::Debug => {
            let filter = create_env_filter(filter, "debug")?;

            Registry::default()
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .pretty()
                        .with_thread_ids(true)
                        .with_file(true)
                        .with_line_number(true),
                )
                .with(filter)
                .try_init()
                .map_err(|e| LoggingError::TracingInit(e.to_string()))
        }
    }
}

fn create_env_filter(
    explicit: Option<&str>,
    default_level: &str,
) -> Result<EnvFilter, LoggingError> {
    let directive = match explicit {
        Some(directive) => directive.to_string(),
        None => std::env::var("SONOS_REMOTE_LOG_LEVEL")
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or_else(|_| default_level.to_string()),
    };

    EnvFilter::try_new(&directive).map_err(|_| LoggingError::InvalidFilter(directive))
}
