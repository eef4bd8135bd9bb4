//! Google Drive store.
//!
//! Files are created with a single `multipart/related` request against the
//! Drive v3 upload endpoint, parented to the configured folder.

use crate::config::models::GoogleCredentials;
use crate::storage::auth::TokenExchange;
use crate::storage::base::{AssetStore, StorageError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

const DEFAULT_API_BASE: &str = "https://www.googleapis.com";
const BOUNDARY: &str = "content-factory-314159265358979323846";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FileMetadata<'a> {
    name: &'a str,
    mime_type: &'a str,
    parents: [&'a str; 1],
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatedFile {
    id: String,
    web_view_link: Option<String>,
}

#[derive(Deserialize)]
struct DriveErrorEnvelope {
    error: Option<DriveErrorBody>,
}

#[derive(Deserialize)]
struct DriveErrorBody {
    message: Option<String>,
}

pub struct DriveStore {
    client: reqwest::Client,
    api_base: String,
    folder_id: String,
    credentials: GoogleCredentials,
    auth: TokenExchange,
    token: RwLock<Option<String>>,
}

impl DriveStore {
    /// Create a store uploading into `folder_id`.
    ///
    /// No request is made until [`AssetStore::initialize`] is awaited.
    pub fn new(folder_id: impl Into<String>, credentials: GoogleCredentials) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: DEFAULT_API_BASE.to_string(),
            folder_id: folder_id.into(),
            credentials,
            auth: TokenExchange::default(),
            token: RwLock::new(None),
        }
    }

    /// Point the Drive API and the OAuth endpoints elsewhere.
    pub fn with_endpoints(
        mut self,
        api_base: impl Into<String>,
        oauth_base: impl Into<String>,
    ) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self.auth = TokenExchange::new(oauth_base);
        self
    }

    /// Revoke the held token and sign out.
    ///
    /// Succeeds without a request when no token is held.
    pub async fn revoke(&self) -> Result<(), StorageError> {
        let token = self.token.write().await.take();
        match token {
            Some(token) => {
                self.auth.revoke(&token).await?;
                tracing::info!("disconnected from Google Drive");
                Ok(())
            }
            None => Ok(()),
        }
    }

    fn multipart_body(
        &self,
        data: &[u8],
        file_name: &str,
        mime_type: &str,
    ) -> Result<Vec<u8>, StorageError> {
        let metadata = FileMetadata {
            name: file_name,
            mime_type,
            parents: [self.folder_id.as_str()],
        };
        let metadata =
            serde_json::to_string(&metadata).map_err(|e| StorageError::Parse(e.to_string()))?;

        let mut body = Vec::with_capacity(data.len() + metadata.len() + 256);
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Type: application/json; charset=UTF-8\r\n\r\n{metadata}\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(
            format!("--{BOUNDARY}\r\nContent-Type: {mime_type}\r\n\r\n").as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--").as_bytes());
        Ok(body)
    }
}

#[async_trait]
impl AssetStore for DriveStore {
    async fn initialize(&self) -> Result<(), StorageError> {
        if self.token.read().await.is_some() {
            return Ok(());
        }

        let access = self.auth.request_access_token(&self.credentials).await?;
        *self.token.write().await = Some(access.token);
        tracing::info!(folder = %self.folder_id, "connected to Google Drive");
        Ok(())
    }

    async fn is_authenticated(&self) -> bool {
        self.token.read().await.is_some()
    }

    async fn upload(
        &self,
        data: &[u8],
        file_name: &str,
        mime_type: &str,
    ) -> Result<String, StorageError> {
        let token = self
            .token
            .read()
            .await
            .clone()
            .ok_or(StorageError::NotAuthenticated)?;

        let body = self.multipart_body(data, file_name, mime_type)?;

        let response = self
            .client
            .post(format!("{}/upload/drive/v3/files", self.api_base))
            .query(&[("uploadType", "multipart"), ("fields", "id,webViewLink")])
            .bearer_auth(token)
            .header(
                reqwest::header::CONTENT_TYPE,
                format!("multipart/related; boundary={BOUNDARY}"),
            )
            .body(body)
            .send()
            .await
            .map_err(|e| StorageError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<DriveErrorEnvelope>()
                .await
                .ok()
                .and_then(|envelope| envelope.error)
                .and_then(|body| body.message)
                .unwrap_or_else(|| "Unknown upload error".to_string());
            return Err(StorageError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let file: CreatedFile = response
            .json()
            .await
            .map_err(|e| StorageError::Parse(e.to_string()))?;

        tracing::debug!(file_name, file_id = %file.id, "uploaded to Google Drive");
        Ok(file
            .web_view_link
            .unwrap_or_else(|| format!("https://drive.google.com/file/d/{}/view", file.id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multipart_body_layout() {
        let store = DriveStore::new("folder-1", GoogleCredentials::default());
        let body = store
            .multipart_body(b"payload", "a_script.txt", "text/plain")
            .unwrap();
        let text = String::from_utf8(body).unwrap();

        assert!(text.starts_with(&format!("--{BOUNDARY}\r\n")));
        assert!(text.contains(r#""name":"a_script.txt""#));
        assert!(text.contains(r#""mimeType":"text/plain""#));
        assert!(text.contains(r#""parents":["folder-1"]"#));
        assert!(text.contains("Content-Type: text/plain\r\n\r\npayload\r\n"));
        assert!(text.ends_with(&format!("--{BOUNDARY}--")));
    }

    #[tokio::test]
    async fn test_upload_without_token_is_not_authenticated() {
        let store = DriveStore::new("folder-1", GoogleCredentials::default());
        assert!(!store.is_authenticated().await);
        let result = store.upload(b"x", "x.txt", "text/plain").await;
        assert_eq!(result, Err(StorageError::NotAuthenticated));
    }

    #[tokio::test]
    async fn test_initialize_with_access_token_needs_no_request() {
        let credentials = GoogleCredentials {
            access_token: Some("ya29.preissued".to_string()),
            ..GoogleCredentials::default()
        };
        let store = DriveStore::new("folder-1", credentials)
            .with_endpoints("http://127.0.0.1:9", "http://127.0.0.1:9");
        store.initialize().await.unwrap();
        assert!(store.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_revoke_without_token_is_noop() {
        let store = DriveStore::new("folder-1", GoogleCredentials::default());
        assert!(store.revoke().await.is_ok());
    }
}
