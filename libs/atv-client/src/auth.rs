//! Page-level access control and the logout flow.
//!
//! The client never touches a window or a terminal directly. Navigation,
//! dialogs and the fallback yes/no prompt are capabilities handed in by the
//! front end.

use crate::api::{ApiClient, AuthApi};
use crate::config::AppConfig;
use crate::messages::{self, Area};
use crate::models::Role;
use crate::session::Session;
use crate::ui::toast::Toast;
use async_trait::async_trait;
use std::sync::Arc;

pub const PERMISSION_DENIED_MESSAGE: &str = "You do not have permission to access this page.";
pub const LOGOUT_CONFIRM_MESSAGE: &str = "Are you sure you want to logout?";

/// Where the user is and how to send them elsewhere.
pub trait Navigator: Send + Sync {
    /// Current location (path or URL); compared against the entry page.
    fn current_location(&self) -> String;

    fn navigate(&self, target: &str);
}

/// Rich dialog surface (modal confirm, blocking alert, toasts).
///
/// Optional: flows that use it degrade to [`Prompt`] or logging without it.
#[async_trait]
pub trait Dialogs: Send + Sync {
    /// Ask the user to confirm; resolves to `false` on cancel.
    async fn confirm(&self, message: &str) -> bool;

    fn alert(&self, message: &str);

    fn toast(&self, toast: Toast);
}

/// Minimal yes/no question, always available.
pub trait Prompt: Send + Sync {
    fn ask_yes_no(&self, message: &str) -> bool;
}

/// Outcome of [`AuthGate::logout`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoutOutcome {
    /// Session cleared and the user sent to the entry page
    LoggedOut,
    /// Confirmation declined; nothing changed
    Cancelled,
}

/// Guards for pages and the single logout flow.
#[derive(Clone)]
pub struct AuthGate {
    config: Arc<AppConfig>,
    session: Arc<Session>,
    api: ApiClient,
    navigator: Arc<dyn Navigator>,
    dialogs: Option<Arc<dyn Dialogs>>,
    prompt: Arc<dyn Prompt>,
}

impl AuthGate {
    pub fn new(
        config: Arc<AppConfig>,
        session: Arc<Session>,
        api: ApiClient,
        navigator: Arc<dyn Navigator>,
        dialogs: Option<Arc<dyn Dialogs>>,
        prompt: Arc<dyn Prompt>,
    ) -> Self {
        Self {
            config,
            session,
            api,
            navigator,
            dialogs,
            prompt,
        }
    }

    /// Send unauthenticated users to the entry page.
    pub fn require_auth(&self) -> bool {
        if self.session.is_authenticated() {
            return true;
        }
        tracing::debug!("not authenticated; redirecting to entry page");
        self.navigator.navigate(&self.config.entry_page);
        false
    }

    /// [`require_auth`](Self::require_auth) plus a role check.
    ///
    /// A signed-in user with the wrong role sees a blocking notice and lands
    /// on the landing page.
    pub fn require_role(&self, roles: &[Role]) -> bool {
        if !self.require_auth() {
            return false;
        }
        if self.session.has_any_role(roles) {
            return true;
        }

        tracing::info!(role = ?self.session.role(), allowed = ?roles, "role not permitted");
        match &self.dialogs {
            Some(dialogs) => dialogs.alert(PERMISSION_DENIED_MESSAGE),
            None => tracing::warn!("{PERMISSION_DENIED_MESSAGE}"),
        }
        self.navigator.navigate(&self.config.landing_page);
        false
    }

    /// Skip the entry page for users who are already signed in.
    pub fn redirect_if_authenticated(&self) -> bool {
        if !self.session.is_authenticated() {
            return false;
        }
        self.navigator.navigate(&self.config.landing_page);
        true
    }

    async fn confirm_logout(&self) -> bool {
        match &self.dialogs {
            Some(dialogs) => dialogs.confirm(LOGOUT_CONFIRM_MESSAGE).await,
            None => self.prompt.ask_yes_no(LOGOUT_CONFIRM_MESSAGE),
        }
    }

    /// Sign out, optionally after asking.
    ///
    /// Once confirmed the session is cleared and the user is sent to the entry
    /// page whether or not the server accepted `POST /logout`.
    #[tracing::instrument(skip_all, fields(confirm = show_confirmation))]
    pub async fn logout(&self, show_confirmation: bool) -> LogoutOutcome {
        if show_confirmation && !self.confirm_logout().await {
            tracing::debug!("logout cancelled");
            return LogoutOutcome::Cancelled;
        }

        if let Err(e) = AuthApi::new(self.api.clone()).logout().await {
            tracing::warn!(status = e.status, error = %e, "server-side logout failed");
        }

        self.session.clear();
        if let Some(dialogs) = &self.dialogs {
            let text = messages::lookup(Area::Auth, "logoutSuccess").unwrap_or_default();
            dialogs.toast(Toast::success(text));
        }
        self.navigator.navigate(&self.config.entry_page);
        tracing::info!("logged out");
        LogoutOutcome::LoggedOut
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }
}
