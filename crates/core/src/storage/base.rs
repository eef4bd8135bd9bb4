//! Base store trait and error type.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("Not signed in to Google Drive")]
    NotAuthenticated,
    #[error("Authentication failed: {0}")]
    Auth(String),
    #[error("Request failed: {0}")]
    Transport(String),
    #[error("Storage API error: {status} - {message}")]
    Api { status: u16, message: String },
    #[error("Response parsing error: {0}")]
    Parse(String),
}

/// Destination for produced assets.
///
/// Upload failures are never fatal to a run; the engine logs them and keeps
/// the asset without a remote location.
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Prepare the store, acquiring credentials if needed.
    ///
    /// Awaited once before a run is gated on [`AssetStore::is_authenticated`].
    /// Calling it again after success is cheap.
    async fn initialize(&self) -> Result<(), StorageError>;

    /// Whether uploads can be attempted.
    async fn is_authenticated(&self) -> bool;

    /// Upload a payload and return its remote URL.
    async fn upload(
        &self,
        data: &[u8],
        file_name: &str,
        mime_type: &str,
    ) -> Result<String, StorageError>;
}
