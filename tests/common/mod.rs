//! Local fake of the token-auth backend.

use axum::http::{HeaderMap, StatusCode, header::AUTHORIZATION};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};

async fn login(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body["username"] == "ada@example.com" && body["password"] == "hunter2" {
        (StatusCode::OK, Json(json!({ "auth_token": "tok-123" })))
    } else {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "non_field_errors": ["Unable to log in with provided credentials."] })),
        )
    }
}

async fn me(headers: HeaderMap) -> (StatusCode, Json<Value>) {
    match headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        Some("Token tok-123") => (
            StatusCode::OK,
            Json(json!({ "id": 7, "username": "ada", "email": "ada@example.com" })),
        ),
        _ => (StatusCode::UNAUTHORIZED, Json(json!({ "detail": "Invalid token." }))),
    }
}

#[allow(dead_code)]
pub async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

pub async fn spawn_backend() -> String {
    spawn(
        Router::new()
            .route("/auth/token/login/", post(login))
            .route("/auth/users/me", get(me)),
    )
    .await
}
