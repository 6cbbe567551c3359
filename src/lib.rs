//! Dashboard session core: sign-in against a token-auth backend, a persistent
//! session cache, and the layout preferences that live beside it.

pub mod auth;
pub mod config;
pub mod prefs;
pub mod store;

pub use auth::{AuthError, AuthFlow, HttpIdentityApi, IdentityApi, SignInFormData, UserInfo};
pub use config::AuthConfig;
pub use prefs::{LayoutPrefs, ThemeMode};
pub use store::{FileStore, KeyValueStore, MemoryStore};
