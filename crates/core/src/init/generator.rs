//! File generation for `.content-factory` initialization.

use super::error::{InitError, InitResult};
use super::templates::get_template;
use crate::config::loader::CONFIG_DIR;
use std::fs;
use std::path::{Path, PathBuf};

/// Options for initializing a .content-factory directory.
#[derive(Debug, Clone)]
pub struct InitOptions {
    /// Directory in which `.content-factory/` is created.
    pub target_dir: PathBuf,

    /// Overwrite existing files.
    pub force: bool,
}

impl Default for InitOptions {
    fn default() -> Self {
        Self {
            target_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            force: false,
        }
    }
}

/// Generate the `.content-factory` directory with its templates.
///
/// ```text
/// .content-factory/
/// ├── config.toml
/// └── .env.example
/// ```
///
/// # Errors
///
/// Fails if `.content-factory` already exists and `force` is not set, or if
/// any file system operation fails.
pub async fn generate_factory_structure(options: InitOptions) -> InitResult<()> {
    let factory_dir = options.target_dir.join(CONFIG_DIR);

    if factory_dir.exists() && !options.force {
        return Err(InitError::DirectoryExists(factory_dir));
    }

    fs::create_dir_all(&factory_dir).map_err(|source| InitError::DirectoryCreate {
        path: factory_dir.clone(),
        source,
    })?;

    write_template_file(&factory_dir, "config.toml", "config.toml")?;
    write_template_file(&factory_dir, "env.example", ".env.example")?;

    tracing::info!(path = %factory_dir.display(), "initialized content factory");
    Ok(())
}

fn write_template_file(factory_dir: &Path, template_path: &str, file_name: &str) -> InitResult<()> {
    let content = get_template(template_path)
        .ok_or_else(|| InitError::TemplateNotFound(template_path.to_string()))?;

    let target_path = factory_dir.join(file_name);
    fs::write(&target_path, content).map_err(|source| InitError::FileWrite {
        path: target_path,
        source,
    })
}
