//! Configuration loading and management.
//!
//! This module loads `.content-factory/config.toml` and the secrets kept in
//! the environment.

pub mod error;
pub mod loader;
pub mod models;
