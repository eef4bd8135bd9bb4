//! Integration tests for `DriveStore` and the OAuth token exchange.
//!
//! Uses `wiremock` for both the OAuth endpoints and the Drive upload API.

use cf_core::config::models::GoogleCredentials;
use cf_core::storage::{AssetStore, DriveStore, StorageError, TokenExchange};
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn refresh_credentials() -> GoogleCredentials {
    GoogleCredentials {
        client_id: Some("client-id".to_string()),
        client_secret: Some("client-secret".to_string()),
        refresh_token: Some("refresh-token".to_string()),
        access_token: None,
    }
}

async fn mount_token_endpoint(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "ya29.test",
            "expires_in": 3599,
            "token_type": "Bearer"
        })))
        .expect(1)
        .mount(server)
        .await;
}

fn test_store(server: &MockServer) -> DriveStore {
    DriveStore::new("folder-123", refresh_credentials())
        .with_endpoints(server.uri(), server.uri())
}

#[tokio::test]
async fn initialize_exchanges_refresh_token_once() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server).await;

    let store = test_store(&server);
    assert!(!store.is_authenticated().await);

    store.initialize().await.unwrap();
    store.initialize().await.unwrap();

    assert!(store.is_authenticated().await);
}

#[tokio::test]
async fn rejected_grant_is_an_auth_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Token has been expired or revoked."
        })))
        .mount(&server)
        .await;

    let result = TokenExchange::new(server.uri())
        .request_access_token(&refresh_credentials())
        .await;

    let expected = "Token has been expired or revoked.";
    assert!(
        matches!(&result, Err(StorageError::Auth(reason)) if reason == expected),
        "got: {result:?}"
    );
}

#[tokio::test]
async fn upload_sends_multipart_and_returns_view_link() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server).await;

    Mock::given(method("POST"))
        .and(path("/upload/drive/v3/files"))
        .and(query_param("uploadType", "multipart"))
        .and(header("authorization", "Bearer ya29.test"))
        .and(body_string_contains("\"parents\":[\"folder-123\"]"))
        .and(body_string_contains("\"name\":\"coffee_titles.txt\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "file-1",
            "webViewLink": "https://drive.google.com/file/d/file-1/view?usp=drivesdk"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = test_store(&server);
    store.initialize().await.unwrap();
    let url = store
        .upload(b"T1\nT2", "coffee_titles.txt", "text/plain")
        .await
        .unwrap();

    assert_eq!(url, "https://drive.google.com/file/d/file-1/view?usp=drivesdk");
}

#[tokio::test]
async fn upload_without_view_link_falls_back_to_file_url() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server).await;

    Mock::given(method("POST"))
        .and(path("/upload/drive/v3/files"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "file-9" })))
        .mount(&server)
        .await;

    let store = test_store(&server);
    store.initialize().await.unwrap();
    let url = store.upload(b"x", "x.txt", "text/plain").await.unwrap();

    assert_eq!(url, "https://drive.google.com/file/d/file-9/view");
}

#[tokio::test]
async fn upload_rejection_carries_status() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server).await;

    Mock::given(method("POST"))
        .and(path("/upload/drive/v3/files"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": { "code": 403, "message": "Insufficient permissions" }
        })))
        .mount(&server)
        .await;

    let store = test_store(&server);
    store.initialize().await.unwrap();
    let result = store.upload(b"x", "x.txt", "text/plain").await;

    assert_eq!(
        result,
        Err(StorageError::Api {
            status: 403,
            message: "Insufficient permissions".to_string(),
        })
    );
}

#[tokio::test]
async fn revoke_signs_out() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server).await;

    Mock::given(method("POST"))
        .and(path("/revoke"))
        .and(body_string_contains("token=ya29.test"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let store = test_store(&server);
    store.initialize().await.unwrap();
    store.revoke().await.unwrap();

    assert!(!store.is_authenticated().await);
    assert_eq!(
        store.upload(b"x", "x.txt", "text/plain").await,
        Err(StorageError::NotAuthenticated)
    );
}
