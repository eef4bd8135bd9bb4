//! OAuth token exchange with Google.
//!
//! Credentials are exchanged for an access token as an explicit
//! request/response: the caller awaits either a token or a failure.

use crate::config::models::GoogleCredentials;
use crate::storage::base::StorageError;
use serde::Deserialize;

const DEFAULT_OAUTH_BASE: &str = "https://oauth2.googleapis.com";

/// A bearer token for Google APIs.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub token: String,
    pub expires_in: Option<u64>,
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &"<redacted>")
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    expires_in: Option<u64>,
    error: Option<String>,
    error_description: Option<String>,
}

/// Client for Google's OAuth token and revocation endpoints.
#[derive(Clone)]
pub struct TokenExchange {
    client: reqwest::Client,
    base_url: String,
}

impl Default for TokenExchange {
    fn default() -> Self {
        Self::new(DEFAULT_OAUTH_BASE)
    }
}

impl TokenExchange {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Request an access token for the given credentials.
    ///
    /// A pre-issued access token is returned as is; otherwise the refresh
    /// token is exchanged at `/token`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Auth`] when the credentials are incomplete or
    /// the grant is rejected.
    pub async fn request_access_token(
        &self,
        credentials: &GoogleCredentials,
    ) -> Result<AccessToken, StorageError> {
        if let Some(token) = &credentials.access_token {
            return Ok(AccessToken {
                token: token.clone(),
                expires_in: None,
            });
        }

        let (Some(client_id), Some(client_secret), Some(refresh_token)) = (
            credentials.client_id.as_deref(),
            credentials.client_secret.as_deref(),
            credentials.refresh_token.as_deref(),
        ) else {
            return Err(StorageError::Auth(
                "client id, client secret and refresh token are required".to_string(),
            ));
        };

        let params = [
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("refresh_token", refresh_token),
            ("grant_type", "refresh_token"),
        ];

        let response = self
            .client
            .post(format!("{}/token", self.base_url))
            .form(&params)
            .send()
            .await
            .map_err(|e| StorageError::Transport(e.to_string()))?;

        let status = response.status();
        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| StorageError::Parse(e.to_string()))?;

        match body.access_token {
            Some(token) if status.is_success() => {
                tracing::info!(expires_in = ?body.expires_in, "obtained Google access token");
                Ok(AccessToken {
                    token,
                    expires_in: body.expires_in,
                })
            }
            _ => {
                let reason = body
                    .error_description
                    .or(body.error)
                    .unwrap_or_else(|| format!("token endpoint returned {status}"));
                Err(StorageError::Auth(reason))
            }
        }
    }

    /// Revoke a token so it can no longer be used.
    pub async fn revoke(&self, token: &str) -> Result<(), StorageError> {
        let response = self
            .client
            .post(format!("{}/revoke", self.base_url))
            .form(&[("token", token)])
            .send()
            .await
            .map_err(|e| StorageError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(StorageError::Api {
                status: response.status().as_u16(),
                message: "token revocation rejected".to_string(),
            });
        }
        Ok(())
    }
}
