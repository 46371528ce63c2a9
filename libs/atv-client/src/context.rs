//! Application wiring.
//!
//! [`AppContext`] owns the frozen config, the session and the request layer,
//! plus the front end's navigation and dialog capabilities. Pages receive it
//! explicitly instead of reaching for globals.

use crate::api::{ApiClient, AuthApi};
use crate::auth::{AuthGate, Dialogs, Navigator, Prompt};
use crate::config::{AppConfig, ConfigError};
use crate::session::Session;
use crate::store::{KeyValueStore, MemoryStore};
use crate::ui::nav::{NavUser, NavVisibility};
use crate::ui::toast::Toast;
use atv_http::{HttpClient, HttpError};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ContextError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to build HTTP transport: {0}")]
    Http(#[from] HttpError),

    #[error("missing required capability: {0}")]
    Missing(&'static str),
}

#[derive(Clone)]
pub struct AppContext {
    config: Arc<AppConfig>,
    session: Arc<Session>,
    api: ApiClient,
    navigator: Arc<dyn Navigator>,
    dialogs: Option<Arc<dyn Dialogs>>,
    prompt: Arc<dyn Prompt>,
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("config", &self.config)
            .field("session", &self.session)
            .field("has_dialogs", &self.dialogs.is_some())
            .finish_non_exhaustive()
    }
}

impl AppContext {
    #[must_use]
    pub fn builder(config: AppConfig) -> AppContextBuilder {
        AppContextBuilder::new(config)
    }

    #[must_use]
    pub fn config(&self) -> &Arc<AppConfig> {
        &self.config
    }

    #[must_use]
    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    #[must_use]
    pub fn navigator(&self) -> &Arc<dyn Navigator> {
        &self.navigator
    }

    #[must_use]
    pub fn dialogs(&self) -> Option<&Arc<dyn Dialogs>> {
        self.dialogs.as_ref()
    }

    #[must_use]
    pub fn auth(&self) -> AuthGate {
        AuthGate::new(
            Arc::clone(&self.config),
            Arc::clone(&self.session),
            self.api.clone(),
            Arc::clone(&self.navigator),
            self.dialogs.clone(),
            Arc::clone(&self.prompt),
        )
    }

    #[must_use]
    pub fn auth_api(&self) -> AuthApi {
        AuthApi::new(self.api.clone())
    }

    #[must_use]
    pub fn nav_visibility(&self) -> NavVisibility {
        NavVisibility::from_session(&self.session)
    }

    #[must_use]
    pub fn nav_user(&self) -> Option<NavUser> {
        NavUser::from_session(&self.session, &self.config)
    }

    /// Show a toast when a dialog surface exists; log it otherwise.
    pub fn notify(&self, toast: Toast) {
        match &self.dialogs {
            Some(dialogs) => dialogs.toast(toast),
            None => {
                tracing::info!(
                    kind = toast.kind.as_str(),
                    message = %toast.message,
                    "notification"
                );
            }
        }
    }
}

/// Builder for [`AppContext`].
///
/// Navigator and prompt are required. The store defaults to a
/// [`MemoryStore`], the transport to one built from `config.http`.
#[must_use]
pub struct AppContextBuilder {
    config: AppConfig,
    store: Option<Arc<dyn KeyValueStore>>,
    navigator: Option<Arc<dyn Navigator>>,
    dialogs: Option<Arc<dyn Dialogs>>,
    prompt: Option<Arc<dyn Prompt>>,
    http: Option<HttpClient>,
}

impl AppContextBuilder {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            store: None,
            navigator: None,
            dialogs: None,
            prompt: None,
            http: None,
        }
    }

    pub fn store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    pub fn dialogs(mut self, dialogs: Arc<dyn Dialogs>) -> Self {
        self.dialogs = Some(dialogs);
        self
    }

    pub fn prompt(mut self, prompt: Arc<dyn Prompt>) -> Self {
        self.prompt = Some(prompt);
        self
    }

    /// Use a pre-built transport instead of one derived from `config.http`.
    pub fn http_client(mut self, http: HttpClient) -> Self {
        self.http = Some(http);
        self
    }

    /// Validate the config and wire everything together.
    ///
    /// # Errors
    /// Returns [`ContextError`] for invalid config, a missing navigator or
    /// prompt, or a transport that cannot be built.
    pub fn build(self) -> Result<AppContext, ContextError> {
        self.config.validate()?;
        let navigator = self.navigator.ok_or(ContextError::Missing("navigator"))?;
        let prompt = self.prompt.ok_or(ContextError::Missing("prompt"))?;

        let config = Arc::new(self.config);
        let store = self
            .store
            .unwrap_or_else(|| Arc::new(MemoryStore::new()));
        let session = Arc::new(Session::from_config(store, &config));

        let api = match self.http {
            Some(http) => ApiClient::with_http(
                http,
                Arc::clone(&config),
                Arc::clone(&session),
                Arc::clone(&navigator),
            ),
            None => ApiClient::new(
                Arc::clone(&config),
                Arc::clone(&session),
                Arc::clone(&navigator),
            )?,
        };

        tracing::debug!(api_base_url = %config.api_base_url, "application context ready");
        Ok(AppContext {
            config,
            session,
            api,
            navigator,
            dialogs: self.dialogs,
            prompt,
        })
    }
}
