//! Initialization module for creating `.content-factory` directories.
//!
//! `factory init` writes the default `config.toml` and an `.env.example`
//! listing the secrets the CLI reads from the environment.
//!
//! # Example
//!
//! ```no_run
//! use cf_core::init::{InitOptions, generate_factory_structure};
//! use std::path::PathBuf;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let options = InitOptions {
//!     target_dir: PathBuf::from("."),
//!     force: false,
//! };
//!
//! generate_factory_structure(options).await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod generator;
pub mod templates;

pub use error::{InitError, InitResult};
pub use generator::{generate_factory_structure, InitOptions};
pub use templates::get_template;
