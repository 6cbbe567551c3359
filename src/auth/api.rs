//! Identity backend client.
//!
//! Token auth over two endpoints: `POST /auth/token/login/` trades
//! credentials for an opaque token, `GET /auth/users/me` returns the profile
//! for `Authorization: Token <token>`.

use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::types::{AuthError, LoginRequest, TokenResponse, UserProfile};
use crate::config::{Timeouts, normalize_base_url};

const LOGIN_PATH: &str = "/auth/token/login/";
const ME_PATH: &str = "/auth/users/me";

/// Seam between the auth flow and the network.
#[async_trait::async_trait]
pub trait IdentityApi: Send + Sync {
    /// Exchange credentials for an auth token.
    ///
    /// # Errors
    ///
    /// Returns an [`AuthError`] if the request fails, the backend rejects the
    /// credentials, or the body has no `auth_token`.
    async fn login(&self, username: &str, password: &str) -> Result<String, AuthError>;

    /// Fetch the profile of the token's owner.
    ///
    /// # Errors
    ///
    /// Returns an [`AuthError`] if the request fails, the token is rejected,
    /// or the body is malformed.
    async fn fetch_me(&self, token: &str) -> Result<UserProfile, AuthError>;
}

pub struct HttpIdentityApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpIdentityApi {
    /// # Errors
    ///
    /// Returns [`AuthError::HttpClientBuild`] if the HTTP client fails to build.
    pub fn new(base_url: &str, timeouts: Timeouts) -> Result<Self, AuthError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| AuthError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: normalize_base_url(base_url) })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, AuthError> {
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| AuthError::ApiRequest(e.to_string()))?;
        if !status.is_success() {
            return Err(AuthError::ApiResponse { status: status.as_u16(), body: text });
        }
        serde_json::from_str(&text).map_err(|e| AuthError::Decode(e.to_string()))
    }

    async fn post_json<T: DeserializeOwned>(&self, path: &str, body: &impl Serialize) -> Result<T, AuthError> {
        let response = self
            .http
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| AuthError::ApiRequest(e.to_string()))?;
        Self::read_json(response).await
    }
}

#[async_trait::async_trait]
impl IdentityApi for HttpIdentityApi {
    async fn login(&self, username: &str, password: &str) -> Result<String, AuthError> {
        let body = LoginRequest { username, password };
        let token: TokenResponse = self.post_json(LOGIN_PATH, &body).await?;
        Ok(token.auth_token)
    }

    async fn fetch_me(&self, token: &str) -> Result<UserProfile, AuthError> {
        let response = self
            .http
            .get(self.url(ME_PATH))
            .header(reqwest::header::AUTHORIZATION, format!("Token {token}"))
            .send()
            .await
            .map_err(|e| AuthError::ApiRequest(e.to_string()))?;
        Self::read_json(response).await
    }
}
