//! The signed-in identity: a bearer token and the user's profile.
//!
//! Both live under separate store keys. They are written and cleared as a
//! pair, but a failed write can leave only one of them behind; anything that
//! needs the profile goes through [`Session::current_user`], which demands
//! both.

use crate::config::AppConfig;
use crate::models::{LoginData, Role, SuccessEnvelope, UserProfile};
use crate::store::{KeyValueStore, StoreError};
use secrecy::SecretString;
use serde::Deserialize as _;
use serde_json::Value;
use std::sync::Arc;

pub struct Session {
    store: Arc<dyn KeyValueStore>,
    token_key: String,
    user_key: String,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token_key", &self.token_key)
            .field("user_key", &self.user_key)
            .finish_non_exhaustive()
    }
}

impl Session {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        token_key: impl Into<String>,
        user_key: impl Into<String>,
    ) -> Self {
        Self {
            store,
            token_key: token_key.into(),
            user_key: user_key.into(),
        }
    }

    /// Session over `store` using the configured key names.
    pub fn from_config(store: Arc<dyn KeyValueStore>, config: &AppConfig) -> Self {
        Self::new(store, config.token_key.clone(), config.user_key.clone())
    }

    fn read(&self, key: &str) -> Option<String> {
        self.store.get(key).unwrap_or_else(|e| {
            tracing::warn!(key, error = %e, "session store read failed");
            None
        })
    }

    /// # Errors
    /// Returns [`StoreError`] if the token cannot be persisted.
    pub fn save_token(&self, token: &str) -> Result<(), StoreError> {
        self.store.set(&self.token_key, token)
    }

    /// Stored bearer token, if any.
    #[must_use]
    pub fn token(&self) -> Option<SecretString> {
        self.read(&self.token_key)
            .filter(|t| !t.is_empty())
            .map(SecretString::from)
    }

    /// # Errors
    /// Returns [`StoreError`] if the removal cannot be persisted.
    pub fn remove_token(&self) -> Result<(), StoreError> {
        self.store.remove(&self.token_key)
    }

    /// # Errors
    /// Returns [`StoreError`] if the profile cannot be serialized or persisted.
    pub fn save_user(&self, user: &UserProfile) -> Result<(), StoreError> {
        let json = serde_json::to_string(user)?;
        self.store.set(&self.user_key, &json)
    }

    /// Stored profile, regardless of the token.
    ///
    /// Missing or unreadable data yields `None`; a corrupted entry is logged.
    #[must_use]
    pub fn user(&self) -> Option<UserProfile> {
        let raw = self.read(&self.user_key)?;
        serde_json::from_str(&raw)
            .inspect_err(|e| tracing::warn!(error = %e, "stored user profile is corrupted"))
            .ok()
    }

    /// # Errors
    /// Returns [`StoreError`] if the removal cannot be persisted.
    pub fn remove_user(&self) -> Result<(), StoreError> {
        self.store.remove(&self.user_key)
    }

    /// Profile of the authenticated user; `None` unless the token is present too.
    #[must_use]
    pub fn current_user(&self) -> Option<UserProfile> {
        if self.is_authenticated() {
            self.user()
        } else {
            None
        }
    }

    /// Replace the stored profile after a refresh.
    ///
    /// Returns `false` without writing when there is no token.
    ///
    /// # Errors
    /// Returns [`StoreError`] if the profile cannot be persisted.
    pub fn replace_user(&self, user: &UserProfile) -> Result<bool, StoreError> {
        if !self.is_authenticated() {
            return Ok(false);
        }
        self.save_user(user)?;
        tracing::debug!(user_id = user.id, "user profile replaced");
        Ok(true)
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Role of the authenticated user; a profile without a token has none.
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.current_user().map(|u| u.role)
    }

    #[must_use]
    pub fn has_role(&self, role: Role) -> bool {
        self.role() == Some(role)
    }

    #[must_use]
    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        self.role().is_some_and(|r| roles.contains(&r))
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin)
    }

    #[must_use]
    pub fn is_manager(&self) -> bool {
        self.has_role(Role::Manager)
    }

    #[must_use]
    pub fn is_customer(&self) -> bool {
        self.has_role(Role::Customer)
    }

    #[must_use]
    pub fn can_manage(&self) -> bool {
        self.has_any_role(&[Role::Admin, Role::Manager])
    }

    /// Remove token and profile. Safe to call repeatedly.
    ///
    /// Both removals are attempted even if the first fails.
    pub fn clear(&self) {
        if let Err(e) = self.remove_token() {
            tracing::warn!(error = %e, "failed to remove session token");
        }
        if let Err(e) = self.remove_user() {
            tracing::warn!(error = %e, "failed to remove session user");
        }
    }

    /// Persist token and profile from a login response.
    ///
    /// Only `{success: true, data: {token, user}}` with a valid profile is
    /// accepted; anything else returns `false` and leaves the session as it was.
    pub fn handle_login_response(&self, response: &Value) -> bool {
        let envelope = match SuccessEnvelope::<LoginData>::deserialize(response) {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::debug!(error = %e, "login response rejected");
                return false;
            }
        };
        let Some(data) = envelope.data.filter(|_| envelope.success) else {
            return false;
        };
        if data.token.is_empty() {
            return false;
        }

        let written = self
            .save_token(&data.token)
            .and_then(|()| self.save_user(&data.user));
        match written {
            Ok(()) => {
                tracing::info!(user_id = data.user.id, role = %data.user.role, "signed in");
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to persist session; clearing partial state");
                self.clear();
                false
            }
        }
    }
}
