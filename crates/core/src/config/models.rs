//! Configuration models that aggregate all settings.
//!
//! This module provides the unified `AppConfig` structure that combines the
//! settings from `config.toml` with the secrets read from the environment.

use crate::config::error::{ConfigError, ConfigResult};
use cf_protocol::config_models::FactoryConfig;
use std::fmt;

/// OAuth material for the Drive store.
///
/// Either a pre-issued access token, or the client id/secret plus a refresh
/// token that is exchanged for an access token when the store initializes.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct GoogleCredentials {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub refresh_token: Option<String>,
    pub access_token: Option<String>,
}

impl GoogleCredentials {
    /// Whether the credentials can produce an access token.
    pub fn is_complete(&self) -> bool {
        self.access_token.is_some()
            || (self.client_id.is_some()
                && self.client_secret.is_some()
                && self.refresh_token.is_some())
    }
}

// Secrets never reach logs.
impl fmt::Debug for GoogleCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoogleCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "<redacted>"))
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Secrets read from the environment.
#[derive(Clone, Default)]
pub struct Secrets {
    pub openai_api_key: Option<String>,
    pub google: GoogleCredentials,
}

impl fmt::Debug for Secrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secrets")
            .field("openai_api_key", &self.openai_api_key.as_ref().map(|_| "<redacted>"))
            .field("google", &self.google)
            .finish()
    }
}

/// Unified application configuration.
///
/// # Example
///
/// ```rust,no_run
/// use cf_core::config::loader::load_config;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new(".")).await?;
/// println!("Requesting {} titles per topic", config.settings.generation.title_count);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// Settings from `.content-factory/config.toml`.
    pub settings: FactoryConfig,

    /// Secrets from the environment.
    pub secrets: Secrets,
}

impl AppConfig {
    /// Check that everything an online run needs is present.
    ///
    /// # Errors
    ///
    /// Returns the first missing piece: the OpenAI key, the Drive folder, or
    /// usable Google credentials.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.secrets.openai_api_key.is_none() {
            return Err(ConfigError::MissingEnvVar("OPENAI_API_KEY".to_string()));
        }
        if self.settings.drive.folder_id().is_empty() {
            return Err(ConfigError::MissingDriveFolder);
        }
        if !self.secrets.google.is_complete() {
            return Err(ConfigError::MissingGoogleCredentials);
        }
        Ok(())
    }
}
