//! Error types for configuration loading.
//!
//! This module defines all errors that can occur while reading
//! `.content-factory/config.toml`, collecting secrets from the environment,
//! and validating the result.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read a configuration file from disk.
    #[error("Failed to read config file at {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to parse TOML configuration.
    #[error("Failed to parse TOML file at {path}: {source}")]
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// Invalid configuration values.
    #[error("Invalid configuration in {path}: {reason}")]
    InvalidConfig { path: PathBuf, reason: String },

    /// A required environment variable is not set.
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    /// No Drive folder was configured.
    #[error("No Google Drive folder configured; set [drive].folder in .content-factory/config.toml")]
    MissingDriveFolder,

    /// Neither an access token nor a complete refresh-token grant is available.
    #[error(
        "Google credentials incomplete: set GOOGLE_ACCESS_TOKEN, or GOOGLE_CLIENT_ID, \
         GOOGLE_CLIENT_SECRET and GOOGLE_REFRESH_TOKEN"
    )]
    MissingGoogleCredentials,
}

/// Type alias for Result with ConfigError.
pub type ConfigResult<T> = Result<T, ConfigError>;
