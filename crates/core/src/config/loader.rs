//! Configuration loader for the `.content-factory/` directory.
//!
//! Settings come from `.content-factory/config.toml`; secrets come from the
//! process environment, after a `.env` file in the working directory has been
//! loaded with `dotenvy`.

use crate::config::error::ConfigError;
use crate::config::error::ConfigResult;
use crate::config::models::{AppConfig, GoogleCredentials, Secrets};
use cf_protocol::config_models::FactoryConfig;
use std::path::Path;

/// Name of the per-project configuration directory.
pub const CONFIG_DIR: &str = ".content-factory";

/// Loads settings and secrets for the project rooted at `root`.
///
/// # Arguments
///
/// * `root` - Root directory containing the `.content-factory/` folder
///
/// # Returns
///
/// An `AppConfig`. A missing directory or `config.toml` yields default
/// settings rather than an error.
///
/// # Errors
///
/// Returns `ConfigError` if `config.toml` exists but cannot be read, is not
/// valid TOML, or holds out-of-range values.
pub async fn load_config(root: &Path) -> ConfigResult<AppConfig> {
    let settings = load_settings(&root.join(CONFIG_DIR))?;

    dotenvy::dotenv().ok();
    let secrets = secrets_from_lookup(|key| std::env::var(key));

    Ok(AppConfig { settings, secrets })
}

/// Loads and validates `config.toml` from the given config directory.
pub fn load_settings(config_dir: &Path) -> ConfigResult<FactoryConfig> {
    let config_path = config_dir.join("config.toml");

    // If config.toml doesn't exist, return default
    if !config_path.exists() {
        return Ok(FactoryConfig::default());
    }

    let content =
        std::fs::read_to_string(&config_path).map_err(|source| ConfigError::FileRead {
            path: config_path.clone(),
            source,
        })?;

    let config: FactoryConfig =
        toml::from_str(&content).map_err(|source| ConfigError::TomlParse {
            path: config_path.clone(),
            source,
        })?;

    validate_settings(&config).map_err(|reason| ConfigError::InvalidConfig {
        path: config_path,
        reason,
    })?;

    Ok(config)
}

fn validate_settings(config: &FactoryConfig) -> Result<(), String> {
    if config.generation.title_count == 0 {
        return Err("generation.title_count must be at least 1".to_string());
    }
    if config.generation.images_per_prompt == 0 {
        return Err("generation.images_per_prompt must be at least 1".to_string());
    }
    if config.thumbnail.width == 0 || config.thumbnail.height == 0 {
        return Err("thumbnail width and height must be non-zero".to_string());
    }
    if !(1..=100).contains(&config.thumbnail.jpeg_quality) {
        return Err(format!(
            "thumbnail.jpeg_quality must be within 1-100, got {}",
            config.thumbnail.jpeg_quality
        ));
    }
    Ok(())
}

/// Build the secrets from an env-var lookup function.
///
/// Decoupled from the real environment so tests can use a plain map. Empty
/// values count as unset.
pub fn secrets_from_lookup<F>(lookup: F) -> Secrets
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let get = |var: &str| {
        lookup(var)
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    };

    Secrets {
        openai_api_key: get("OPENAI_API_KEY"),
        google: GoogleCredentials {
            client_id: get("GOOGLE_CLIENT_ID"),
            client_secret: get("GOOGLE_CLIENT_SECRET"),
            refresh_token: get("GOOGLE_REFRESH_TOKEN"),
            access_token: get("GOOGLE_ACCESS_TOKEN"),
        },
    }
}
