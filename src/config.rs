//! Runtime configuration parsed from environment variables.

use std::path::PathBuf;

use directories::ProjectDirs;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
const STORE_FILE_NAME: &str = "storage.json";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthConfig {
    pub base_url: String,
    pub store_path: PathBuf,
    pub timeouts: Timeouts,
}

impl AuthConfig {
    /// Build typed config from environment variables.
    ///
    /// All optional:
    /// - `DASHAUTH_BASE_URL`: identity backend, default `http://127.0.0.1:8000`
    /// - `DASHAUTH_STORE_PATH`: session store file, default in the user data dir
    /// - `DASHAUTH_REQUEST_TIMEOUT_SECS`: default 30
    /// - `DASHAUTH_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a timeout is set but is not a whole number.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = normalize_base_url(
            &std::env::var("DASHAUTH_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_owned()),
        );
        let store_path = std::env::var_os("DASHAUTH_STORE_PATH").map_or_else(default_store_path, PathBuf::from);
        let timeouts = Timeouts {
            request_secs: env_parse_u64("DASHAUTH_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?,
            connect_secs: env_parse_u64("DASHAUTH_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS)?,
        };
        Ok(Self { base_url, store_path, timeouts })
    }

    /// Replace the backend URL, keeping the same normalization as `from_env`.
    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = normalize_base_url(base_url);
        self
    }

    #[must_use]
    pub fn with_store_path(mut self, store_path: PathBuf) -> Self {
        self.store_path = store_path;
        self
    }
}

pub(crate) fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_owned()
}

fn env_parse_u64(key: &'static str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidValue { key, value: raw }),
        Err(_) => Ok(default),
    }
}

fn default_store_path() -> PathBuf {
    ProjectDirs::from("", "", "dashauth").map_or_else(
        || PathBuf::from(".dashauth").join(STORE_FILE_NAME),
        |dirs| dirs.data_dir().join(STORE_FILE_NAME),
    )
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
