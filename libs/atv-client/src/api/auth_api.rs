use super::{ApiClient, ApiError, RequestBody, RequestOverrides, decode_payload};
use crate::models::UserProfile;
use http::Method;
use secrecy::{ExposeSecret, SecretString};

/// Account endpoints: `/login`, `/logout`, `/profile`.
#[derive(Debug, Clone)]
pub struct AuthApi {
    api: ApiClient,
}

impl AuthApi {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Sign in and persist the session.
    ///
    /// Returns the stored profile. The request is sent without any stale
    /// token still in the store.
    ///
    /// # Errors
    /// The server's rejection as [`ApiError`]; a 2xx that is not a usable login
    /// envelope gives status 200 with the server message.
    #[tracing::instrument(skip_all)]
    pub async fn login(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<UserProfile, ApiError> {
        let body = serde_json::json!({
            "email": email,
            "password": password.expose_secret(),
        });
        let response = self
            .api
            .request(
                Method::POST,
                "/login",
                RequestBody::Json(body),
                RequestOverrides::default().skip_auth(),
            )
            .await?;

        if !self.api.session().handle_login_response(&response) {
            let message = response
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or(super::DEFAULT_ERROR_MESSAGE);
            let mut error = ApiError::new(200, message);
            error.response = Some(response);
            return Err(error);
        }

        self.api
            .session()
            .current_user()
            .ok_or_else(|| ApiError::new(200, super::INVALID_RESPONSE_MESSAGE))
    }

    /// `POST /logout`. Never navigates; a 401 still clears the session.
    ///
    /// # Errors
    /// See [`ApiClient::request`].
    pub async fn logout(&self) -> Result<(), ApiError> {
        self.api
            .request(
                Method::POST,
                "/logout",
                RequestBody::Json(serde_json::json!({})),
                RequestOverrides::default().stay_on_page(),
            )
            .await
            .map(drop)
    }

    /// Fetch `/profile` and replace the stored user with it.
    ///
    /// # Errors
    /// See [`ApiClient::request`]; a payload that is not a profile gives
    /// status 200.
    #[tracing::instrument(skip_all)]
    pub async fn refresh_profile(&self) -> Result<UserProfile, ApiError> {
        let profile: UserProfile = decode_payload(self.api.get("/profile", &()).await?)?;
        match self.api.session().replace_user(&profile) {
            Ok(true) => {}
            Ok(false) => tracing::debug!("signed out while refreshing profile"),
            Err(e) => tracing::warn!(error = %e, "failed to store refreshed profile"),
        }
        Ok(profile)
    }
}
