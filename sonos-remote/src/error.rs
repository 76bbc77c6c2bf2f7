use std::path::PathBuf;

use thiserror::Error;

use crate::logging::LoggingError;

/// Errors raised while loading or validating configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("No config directory available on this platform")]
    NoConfigDir,

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Startup errors for the remote
///
/// Runtime network failures never show up here; they are reported through
/// [`ControllerStatus`](crate::ControllerStatus).
#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Logging error: {0}")]
    Logging(#[from] LoggingError),
}
