//! Auth flow: sign in, sign out, and the cached session.
//!
//! DESIGN
//! ======
//! `AuthFlow` owns the in-memory user and the store it mirrors into. Every
//! mutation writes the store first and only then updates memory, so a failed
//! write leaves both sides as they were. After any completed call the cached
//! `USER_INFO` entry and `user()` agree.
//!
//! Sign-in is two sequential requests: credentials for a token, then the
//! token for the profile. There is no retry; the first error is returned.

pub mod api;
pub mod types;

pub use api::{HttpIdentityApi, IdentityApi};
pub use types::{AuthError, CommonResponseData, SignInFormData, UserInfo, UserProfile};

use crate::store::{self, KeyValueStore, StoreError, USER_INFO_CACHE_KEY};

pub struct AuthFlow<A, S> {
    api: A,
    store: S,
    user: Option<UserInfo>,
}

impl<A: IdentityApi, S: KeyValueStore> AuthFlow<A, S> {
    /// Restore the session from the store. An entry that does not decode is
    /// dropped so the cache matches the (empty) in-memory state.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if an undecodable entry cannot be removed.
    pub fn new(api: A, mut store: S) -> Result<Self, StoreError> {
        let user = store::load_json::<UserInfo, _>(&store, USER_INFO_CACHE_KEY);
        if user.is_none() && store.get(USER_INFO_CACHE_KEY).is_some() {
            store.remove(USER_INFO_CACHE_KEY)?;
            tracing::info!("dropped undecodable cached session");
        }
        if let Some(user) = &user {
            tracing::debug!(username = %user.username, "restored cached session");
        }
        Ok(Self { api, store, user })
    }

    /// The signed-in user, if any.
    #[must_use]
    pub fn user(&self) -> Option<&UserInfo> {
        self.user.as_ref()
    }

    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Give back the API client and store.
    pub fn into_parts(self) -> (A, S) {
        (self.api, self.store)
    }

    /// Sign in with `form` and cache the resulting user.
    ///
    /// The email doubles as the backend username. The returned user is the
    /// one built from the profile fetch, already written to the store.
    ///
    /// # Errors
    ///
    /// - [`AuthError::MissingCredentials`] if either field is empty; no
    ///   request is made.
    /// - Any API error from the token or profile request.
    /// - [`AuthError::Store`] if the session cannot be persisted.
    ///
    /// On error the previous session, if any, is left in place.
    pub async fn sign_in(&mut self, form: &SignInFormData) -> Result<UserInfo, AuthError> {
        if !form.is_complete() {
            return Err(AuthError::MissingCredentials);
        }

        let token = self.api.login(&form.email, &form.password).await?;
        let profile = self.api.fetch_me(&token).await?;
        let user = UserInfo {
            email: form.email.clone(),
            username: profile.username,
            user_id: profile.id,
            token,
        };

        store::save_json(&mut self.store, USER_INFO_CACHE_KEY, &user)?;
        self.user = Some(user.clone());
        tracing::info!(username = %user.username, user_id = user.user_id, "signed in");
        Ok(user)
    }

    /// Clear the session in memory and in the store.
    ///
    /// Local only; the backend token is not revoked.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Store`] if the cache entry cannot be removed; the
    /// session is kept in that case.
    #[allow(clippy::unused_async)]
    pub async fn sign_out(&mut self) -> Result<CommonResponseData, AuthError> {
        self.store.remove(USER_INFO_CACHE_KEY)?;
        if let Some(user) = self.user.take() {
            tracing::info!(username = %user.username, "signed out");
        }
        Ok(CommonResponseData::success())
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
