//! Token refresh and session tests against the mock backend

mod common;

use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use bistro_client::filters::TableFilter;
use bistro_client::{ClientError, MemoryTokenStore, StoredTokens, TokenStore};
use common::{FRESH_TOKEN, REFRESH_TOKEN, STALE_TOKEN, TestServer};
use shared::error::ErrorCode;

fn stale_store() -> Arc<MemoryTokenStore> {
    Arc::new(MemoryTokenStore::with_tokens(STALE_TOKEN, REFRESH_TOKEN))
}

#[tokio::test]
async fn test_expired_token_is_refreshed_and_request_retried() {
    let server = TestServer::spawn().await;
    let store = stale_store();
    let client = server.client_with(store.clone());

    let tables = client.tables().list(&TableFilter::default()).await.unwrap();

    assert_eq!(tables.len(), 3);
    assert_eq!(server.refreshes(), 1);
    assert_eq!(server.backend.hits("GET /api/tables/"), 2);
    assert_eq!(store.access_token().as_deref(), Some(FRESH_TOKEN));
    assert_eq!(store.refresh_token().as_deref(), Some(REFRESH_TOKEN));
}

#[tokio::test]
async fn test_concurrent_401s_share_one_refresh() {
    let server = TestServer::spawn().await;
    let client = server.client_with(stale_store());
    let tables = client.tables();
    let filter = TableFilter::default();

    let (a, b, c) = tokio::join!(tables.list(&filter), tables.list(&filter), tables.list(&filter));

    assert!(a.is_ok() && b.is_ok() && c.is_ok());
    assert_eq!(server.refreshes(), 1);
    assert_eq!(server.backend.hits("GET /api/tables/"), 6);
}

#[tokio::test]
async fn test_failed_refresh_clears_tokens() {
    let server = TestServer::spawn().await;
    server.backend.refresh_ok.store(false, Ordering::SeqCst);
    let store = stale_store();
    let client = server.client_with(store.clone());

    let err = client.tables().list(&TableFilter::default()).await.unwrap_err();

    assert!(matches!(err, ClientError::SessionExpired));
    assert_eq!(store.load(), StoredTokens::default());
    assert_eq!(
        err.user_message(),
        "Phiên đăng nhập đã hết hạn. Vui lòng đăng nhập lại."
    );
}

#[tokio::test]
async fn test_missing_refresh_token_skips_refresh_call() {
    let server = TestServer::spawn().await;
    let store = Arc::new(MemoryTokenStore::new());
    store
        .save(&StoredTokens {
            access: Some(STALE_TOKEN.to_string()),
            refresh: None,
        })
        .unwrap();
    let client = server.client_with(store.clone());

    let err = client.tables().list(&TableFilter::default()).await.unwrap_err();

    assert!(matches!(err, ClientError::SessionExpired));
    assert_eq!(server.backend.hits("POST /api/auth/token/refresh/"), 0);
    assert!(store.access_token().is_none());
}

#[tokio::test]
async fn test_second_401_is_not_retried_again() {
    let server = TestServer::spawn().await;
    let (client, store) = server.client();

    let err = client.reservations().recent().await.unwrap_err();

    assert!(matches!(err, ClientError::Unauthorized(_)));
    assert_eq!(server.refreshes(), 1);
    assert_eq!(server.backend.hits("GET /api/reservations/"), 2);
    // The refresh itself worked, so the tokens stay
    assert_eq!(store.access_token().as_deref(), Some(FRESH_TOKEN));
}

#[tokio::test]
async fn test_login_stores_tokens_and_user() {
    let server = TestServer::spawn().await;
    let store = Arc::new(MemoryTokenStore::new());
    let client = server.client_with(store.clone());

    let user = client.session().login("admin", "secret").await.unwrap();

    assert_eq!(user.username, "admin");
    assert!(client.session().is_authenticated());
    assert_eq!(store.access_token().as_deref(), Some(FRESH_TOKEN));
    assert_eq!(store.refresh_token().as_deref(), Some(REFRESH_TOKEN));
    assert_eq!(server.backend.hits("GET /api/auth/me/"), 0);
    assert_eq!(
        client.avatar_url(),
        Some(format!("{}/media/avatars/admin.png", server.base_url))
    );
}

#[tokio::test]
async fn test_login_rejected_keeps_server_message() {
    let server = TestServer::spawn().await;
    let store = Arc::new(MemoryTokenStore::new());
    let client = server.client_with(store.clone());

    let err = client.session().login("admin", "wrong").await.unwrap_err();

    assert!(matches!(err, ClientError::Unauthorized(_)));
    // Anonymous requests never trigger a refresh
    assert_eq!(server.refreshes(), 0);
    assert!(!client.session().is_authenticated());
    assert!(store.access_token().is_none());
    assert_eq!(
        client.session().last_error().as_deref(),
        Some("Tên đăng nhập hoặc mật khẩu không đúng")
    );
}

#[tokio::test]
async fn test_login_without_user_falls_back_to_me() {
    let server = TestServer::spawn().await;
    let client = server.client_with(Arc::new(MemoryTokenStore::new()));

    let user = client.session().login("nouser", "secret").await.unwrap();

    assert_eq!(user.first_name, "Minh");
    assert_eq!(server.backend.hits("GET /api/auth/me/"), 1);
}

#[tokio::test]
async fn test_login_without_user_during_user_check() {
    let server = TestServer::spawn().await;
    *server.backend.me_delay.lock().unwrap() = Duration::from_millis(100);
    let (client, _store) = server.client();
    let session = client.session();

    let (check, login) = tokio::join!(session.current_user(), session.login("nouser", "secret"));

    assert!(check.is_ok());
    assert_eq!(login.unwrap().username, "admin");
    assert_eq!(server.backend.hits("GET /api/auth/me/"), 2);
    assert!(session.is_authenticated());
}

#[tokio::test]
async fn test_login_without_token_pair_fails() {
    let server = TestServer::spawn().await;
    let store = Arc::new(MemoryTokenStore::new());
    let client = server.client_with(store.clone());

    let err = client.session().login("halfway", "secret").await.unwrap_err();

    assert_eq!(err.code(), ErrorCode::TokenPairMissing);
    assert!(store.access_token().is_none());
}

#[tokio::test]
async fn test_concurrent_user_checks_send_one_request() {
    let server = TestServer::spawn().await;
    *server.backend.me_delay.lock().unwrap() = Duration::from_millis(100);
    let (client, _store) = server.client();
    let session = client.session();

    let (first, second) = tokio::join!(session.current_user(), session.current_user());

    assert_eq!(first.unwrap().map(|u| u.username).as_deref(), Some("admin"));
    // The overlapping call gets whatever was cached: nothing yet
    assert_eq!(second.unwrap(), None);
    assert_eq!(server.backend.hits("GET /api/auth/me/"), 1);
    assert!(!session.is_checking());
}

#[tokio::test]
async fn test_current_user_without_token() {
    let server = TestServer::spawn().await;
    let client = server.client_with(Arc::new(MemoryTokenStore::new()));

    let err = client.session().current_user().await.unwrap_err();

    assert!(matches!(err, ClientError::Unauthorized(ref m) if m == "No access token found"));
    assert_eq!(server.backend.hits("GET /api/auth/me/"), 0);
}

#[tokio::test]
async fn test_restore_session() {
    let server = TestServer::spawn().await;
    let (client, _store) = server.client();

    let user = client.session().restore().await;

    assert_eq!(user.map(|u| u.id), Some(1));
    assert!(client.session().is_authenticated());
}

#[tokio::test]
async fn test_restore_with_dead_session_clears_tokens() {
    let server = TestServer::spawn().await;
    server.backend.refresh_ok.store(false, Ordering::SeqCst);
    let store = stale_store();
    let client = server.client_with(store.clone());

    assert!(client.session().restore().await.is_none());
    assert_eq!(store.load(), StoredTokens::default());
    assert!(!client.session().is_authenticated());
}

#[tokio::test]
async fn test_logout_clears_everything() {
    let server = TestServer::spawn().await;
    let (client, store) = server.client();
    client.session().restore().await;

    client.session().logout().unwrap();

    assert!(client.session().user().is_none());
    assert_eq!(store.load(), StoredTokens::default());
}
