//! # cf-protocol
//!
//! Shared data models for content-factory.
//!
//! This crate defines the structures exchanged between the pipeline core and
//! whatever renders its progress:
//! - Produced assets and their kinds
//! - The append-only run log
//! - Run state, generation stages and progress arithmetic
//! - Settings parsed from `.content-factory/config.toml`
//! - The event stream emitted while a run executes
//!
//! ## Modules
//!
//! - [`asset_models`]: Assets produced by a run
//! - [`log_models`]: Log entries and their status
//! - [`run_models`]: Run state, stages and progress
//! - [`config_models`]: Settings from config.toml
//! - [`ipc`]: Events sent from the core to a front end
//!
//! ## Design Principles
//!
//! - Minimal dependencies: Only serde, uuid and chrono
//! - Independent compilation: No dependencies on other content-factory crates

pub mod asset_models;
pub mod config_models;
pub mod ipc;
pub mod log_models;
pub mod run_models;

// Re-export all public types for convenience
pub use asset_models::*;
pub use config_models::*;
pub use ipc::*;
pub use log_models::*;
pub use run_models::*;
