//! Error types for APITest configuration

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using the configuration Error
pub type Result<T> = std::result::Result<T, Error>;

/// Configuration error types
///
/// Every variant is raised before the first request goes out.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Unknown environment '{0}' (expected one of: dev, test, prod)")]
    UnknownEnvironment(String),

    #[error("No base URI configured for environment '{environment}' (key '{key}' is missing or blank)")]
    MissingUrl { environment: String, key: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
