//! Embedded template files for `.content-factory` initialization.
//!
//! Files under the workspace `templates/` directory are embedded into the
//! binary at compile time. With the `debug-embed` feature, debug builds read
//! them from the filesystem at runtime.

use rust_embed::RustEmbed;

/// Embedded template files from the workspace `templates/` directory.
#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/../../templates"]
pub struct TemplateAssets;

/// Get template file content by path, relative to the templates root.
///
/// # Example
/// ```
/// use cf_core::init::templates::get_template;
///
/// let config = get_template("config.toml").expect("config.toml should exist");
/// assert!(config.contains("[generation]"));
/// ```
pub fn get_template(path: &str) -> Option<String> {
    TemplateAssets::get(path).map(|file| String::from_utf8_lossy(file.data.as_ref()).to_string())
}
