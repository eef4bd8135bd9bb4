//! In-memory store.
//!
//! Keeps uploads in a list and hands out `memory://` URLs. Used for offline
//! runs and tests; can be configured to be signed out or to reject uploads.

use crate::storage::base::{AssetStore, StorageError};
use async_trait::async_trait;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub name: String,
    pub mime_type: String,
    pub size: usize,
}

pub struct MemoryStore {
    authenticated: bool,
    fail_uploads: bool,
    files: Mutex<Vec<StoredFile>>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// A signed-in store that accepts every upload.
    pub fn new() -> Self {
        Self {
            authenticated: true,
            fail_uploads: false,
            files: Mutex::new(Vec::new()),
        }
    }

    /// A store that reports no signed-in session.
    pub fn signed_out() -> Self {
        Self {
            authenticated: false,
            ..Self::new()
        }
    }

    /// A signed-in store that rejects every upload.
    pub fn failing() -> Self {
        Self {
            fail_uploads: true,
            ..Self::new()
        }
    }

    /// Files accepted so far, in upload order.
    pub fn files(&self) -> Vec<StoredFile> {
        match self.files.lock() {
            Ok(files) => files.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[async_trait]
impl AssetStore for MemoryStore {
    async fn initialize(&self) -> Result<(), StorageError> {
        Ok(())
    }

    async fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    async fn upload(
        &self,
        data: &[u8],
        file_name: &str,
        mime_type: &str,
    ) -> Result<String, StorageError> {
        if !self.authenticated {
            return Err(StorageError::NotAuthenticated);
        }
        if self.fail_uploads {
            return Err(StorageError::Api {
                status: 503,
                message: "storage unavailable".to_string(),
            });
        }

        let file = StoredFile {
            name: file_name.to_string(),
            mime_type: mime_type.to_string(),
            size: data.len(),
        };
        match self.files.lock() {
            Ok(mut files) => files.push(file),
            Err(poisoned) => poisoned.into_inner().push(file),
        }
        Ok(format!("memory://{file_name}"))
    }
}
