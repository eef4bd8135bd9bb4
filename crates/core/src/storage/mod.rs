//! Remote storage layer.
//!
//! This module provides:
//! - The `AssetStore` trait the engine uploads through
//! - OAuth token exchange for Google
//! - A Google Drive adapter
//! - An in-memory store for offline runs

pub mod auth;
pub mod base;
pub mod drive;
pub mod memory;

pub use auth::{AccessToken, TokenExchange};
pub use base::{AssetStore, StorageError};
pub use drive::DriveStore;
pub use memory::MemoryStore;
