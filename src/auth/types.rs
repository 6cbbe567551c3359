//! Auth data model and error type.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::store::StoreError;

/// The signed-in user as cached in the session store.
///
/// Field names serialize in camelCase (`userId`) to match the cache entry
/// written by the dashboard frontend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub email: String,
    pub username: String,
    pub user_id: i64,
    pub token: String,
}

/// Credentials entered on the sign-in form. Never persisted.
#[derive(Clone, PartialEq, Eq)]
pub struct SignInFormData {
    pub email: String,
    pub password: String,
}

impl SignInFormData {
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self { email: email.into(), password: password.into() }
    }

    /// Both fields must be non-empty before any request goes out.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.email.is_empty() && !self.password.is_empty()
    }
}

impl fmt::Debug for SignInFormData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignInFormData")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Generic `{ code, message }` payload returned by sign-out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommonResponseData {
    pub code: i32,
    pub message: String,
}

impl CommonResponseData {
    #[must_use]
    pub fn success() -> Self {
        Self { code: 0, message: "success".to_owned() }
    }
}

/// Profile returned by `GET /auth/users/me`. Extra fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub auth_token: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Email or password was empty.
    #[error("sign in failed: email and password are required")]
    MissingCredentials,

    #[error("http client build failed: {0}")]
    HttpClientBuild(String),

    /// The request never produced a response (connect, timeout, body read).
    #[error("API request failed: {0}")]
    ApiRequest(String),

    /// The backend answered with a non-success status.
    #[error("API returned {status}: {body}")]
    ApiResponse { status: u16, body: String },

    /// The response body did not have the expected shape.
    #[error("unexpected response body: {0}")]
    Decode(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
