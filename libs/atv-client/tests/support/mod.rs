#![allow(dead_code)]

use atv_client::testing::{RecordingDialogs, RecordingNavigator, ScriptedPrompt};
use atv_client::{AppConfig, AppContext, MemoryStore};
use httpmock::MockServer;
use serde_json::{Value, json};
use std::sync::Arc;

pub struct Harness {
    pub ctx: AppContext,
    pub navigator: Arc<RecordingNavigator>,
    pub dialogs: Option<Arc<RecordingDialogs>>,
    pub prompt: Arc<ScriptedPrompt>,
}

pub fn config_for(server: &MockServer) -> AppConfig {
    let mut config = AppConfig {
        api_base_url: server.url("/api"),
        storage_url: server.url("/storage"),
        ..AppConfig::default()
    };
    config.http.allow_insecure_http = true;
    config
}

pub fn harness(config: AppConfig, location: &str, dialogs: Option<RecordingDialogs>) -> Harness {
    harness_with_prompt(config, location, dialogs, ScriptedPrompt::always(true))
}

pub fn harness_with_prompt(
    config: AppConfig,
    location: &str,
    dialogs: Option<RecordingDialogs>,
    prompt: ScriptedPrompt,
) -> Harness {
    let navigator = Arc::new(RecordingNavigator::at(location));
    let prompt = Arc::new(prompt);
    let dialogs = dialogs.map(Arc::new);

    let mut builder = AppContext::builder(config)
        .store(Arc::new(MemoryStore::new()))
        .navigator(navigator.clone())
        .prompt(prompt.clone());
    if let Some(dialogs) = &dialogs {
        builder = builder.dialogs(dialogs.clone());
    }

    Harness {
        ctx: builder.build().unwrap(),
        navigator,
        dialogs,
        prompt,
    }
}

pub fn user_json(role: &str) -> Value {
    json!({
        "id": 12,
        "first_name": "Ana",
        "last_name": "Reyes",
        "email": "ana@example.com",
        "role": role,
        "avatar": null
    })
}

pub fn sign_in(ctx: &AppContext, role: &str) {
    assert!(ctx.session().handle_login_response(&json!({
        "success": true,
        "data": {"token": "tok-123", "user": user_json(role)}
    })));
}
