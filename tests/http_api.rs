//! `HttpIdentityApi` against a local fake of the token-auth backend.

mod common;

use axum::Router;
use axum::routing::post;
use common::{spawn, spawn_backend};
use dashauth::auth::UserProfile;
use dashauth::config::Timeouts;
use dashauth::store::USER_INFO_CACHE_KEY;
use dashauth::{AuthError, AuthFlow, HttpIdentityApi, IdentityApi, KeyValueStore, MemoryStore, SignInFormData};
use serde_json::json;

fn client(base_url: &str) -> HttpIdentityApi {
    HttpIdentityApi::new(base_url, Timeouts::default()).unwrap()
}

#[tokio::test]
async fn login_returns_auth_token() {
    let base = spawn_backend().await;
    let token = client(&base).login("ada@example.com", "hunter2").await.unwrap();
    assert_eq!(token, "tok-123");
}

#[tokio::test]
async fn login_rejected_surfaces_status_and_body() {
    let base = spawn_backend().await;
    let err = client(&base).login("ada@example.com", "wrong").await.unwrap_err();
    match err {
        AuthError::ApiResponse { status, body } => {
            assert_eq!(status, 400);
            assert!(body.contains("Unable to log in"));
        }
        other => panic!("expected ApiResponse, got {other:?}"),
    }
}

#[tokio::test]
async fn fetch_me_sends_token_header() {
    let base = spawn_backend().await;
    let profile = client(&base).fetch_me("tok-123").await.unwrap();
    assert_eq!(profile, UserProfile { id: 7, username: "ada".into() });
}

#[tokio::test]
async fn fetch_me_bad_token_is_unauthorized() {
    let base = spawn_backend().await;
    let err = client(&base).fetch_me("nope").await.unwrap_err();
    assert!(matches!(err, AuthError::ApiResponse { status: 401, .. }));
}

#[tokio::test]
async fn trailing_slash_in_base_url_is_trimmed() {
    let base = spawn_backend().await;
    let api = client(&format!("{base}/"));
    assert_eq!(api.base_url(), base);
    assert_eq!(api.login("ada@example.com", "hunter2").await.unwrap(), "tok-123");
}

#[tokio::test]
async fn malformed_token_body_is_decode_error() {
    let base = spawn(Router::new().route("/auth/token/login/", post(|| async { "not json" }))).await;
    let err = client(&base).login("ada@example.com", "hunter2").await.unwrap_err();
    assert!(matches!(err, AuthError::Decode(_)));
}

#[tokio::test]
async fn unreachable_backend_is_request_error() {
    // Bind then drop to get a port nothing listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(&format!("http://{addr}")).login("a", "b").await.unwrap_err();
    assert!(matches!(err, AuthError::ApiRequest(_)));
}

#[tokio::test]
async fn flow_sign_in_and_out_over_http() {
    let base = spawn_backend().await;
    let mut flow = AuthFlow::new(client(&base), MemoryStore::new()).unwrap();

    let user = flow
        .sign_in(&SignInFormData::new("ada@example.com", "hunter2"))
        .await
        .unwrap();
    assert_eq!(user.username, "ada");
    assert_eq!(user.user_id, 7);
    assert_eq!(user.email, "ada@example.com");
    assert_eq!(user.token, "tok-123");
    assert_eq!(
        flow.store().get(USER_INFO_CACHE_KEY),
        Some(json!({ "email": "ada@example.com", "username": "ada", "userId": 7, "token": "tok-123" }))
    );

    flow.sign_out().await.unwrap();
    assert!(flow.user().is_none());
    assert!(flow.store().is_empty());
}
