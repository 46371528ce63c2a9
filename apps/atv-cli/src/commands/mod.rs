use anyhow::{Context, Result};
use atv_client::messages::error_message;
use atv_client::{ApiError, AppConfig, AppContext, FileStore};
use std::sync::Arc;

use crate::console::{ConsoleDialogs, ConsoleNavigator, StdinPrompt};

pub mod config;
pub mod get;
pub mod login;
pub mod logout;
pub mod nav;
pub mod whoami;

/// Wire a context backed by the per-origin session file.
///
/// `location` is the virtual page the command runs on; it decides whether a
/// 401 redirects.
pub fn open_context(config: AppConfig, location: &str, assume_yes: bool) -> Result<AppContext> {
    let store =
        FileStore::for_origin(&config.api_base_url).context("failed to open session store")?;
    tracing::debug!(path = %store.path().display(), "session store");

    AppContext::builder(config)
        .store(Arc::new(store))
        .navigator(Arc::new(ConsoleNavigator::at(location)))
        .dialogs(Arc::new(ConsoleDialogs::new(assume_yes)))
        .prompt(Arc::new(StdinPrompt::new(assume_yes)))
        .build()
        .context("failed to build client")
}

/// User-facing failure for an API error.
pub fn api_failure(error: &ApiError) -> anyhow::Error {
    tracing::debug!(status = error.status, message = %error.message, "request failed");
    let mut lines = vec![error_message(error).into_owned()];
    lines.extend(error.errors.iter().flat_map(|field| {
        field
            .messages
            .iter()
            .map(move |message| format!("  {}: {message}", field.field))
    }));
    anyhow::anyhow!(lines.join("\n"))
}
