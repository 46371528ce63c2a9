//! Terminal implementations of the navigation and dialog capabilities.

use async_trait::async_trait;
use atv_client::ui::{Toast, ToastKind};
use atv_client::{Dialogs, Navigator, Prompt};
use parking_lot::Mutex;
use std::io::{BufRead, Write};

/// Tracks a virtual page location; navigating prints where the browser would go.
pub struct ConsoleNavigator {
    location: Mutex<String>,
}

impl ConsoleNavigator {
    pub fn at(location: impl Into<String>) -> Self {
        Self {
            location: Mutex::new(location.into()),
        }
    }
}

impl Navigator for ConsoleNavigator {
    fn current_location(&self) -> String {
        self.location.lock().clone()
    }

    fn navigate(&self, target: &str) {
        tracing::info!(target, "navigate");
        eprintln!("-> {target}");
        *self.location.lock() = target.to_owned();
    }
}

/// Read one line from stdin and treat `y`/`yes` as consent.
fn read_yes_no(message: &str) -> bool {
    eprint!("{message} [y/N] ");
    if std::io::stderr().flush().is_err() {
        return false;
    }
    let mut line = String::new();
    match std::io::stdin().lock().read_line(&mut line) {
        Ok(_) => parse_answer(&line),
        Err(e) => {
            tracing::warn!(error = %e, "failed to read answer from stdin");
            false
        }
    }
}

fn parse_answer(line: &str) -> bool {
    matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Stdin prompt; `assume_yes` answers every question without reading.
pub struct StdinPrompt {
    assume_yes: bool,
}

impl StdinPrompt {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl Prompt for StdinPrompt {
    fn ask_yes_no(&self, message: &str) -> bool {
        self.assume_yes || read_yes_no(message)
    }
}

/// Dialogs rendered as stderr lines.
pub struct ConsoleDialogs {
    assume_yes: bool,
}

impl ConsoleDialogs {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

#[async_trait]
impl Dialogs for ConsoleDialogs {
    async fn confirm(&self, message: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        let message = message.to_owned();
        tokio::task::spawn_blocking(move || read_yes_no(&message))
            .await
            .unwrap_or(false)
    }

    fn alert(&self, message: &str) {
        eprintln!("! {message}");
    }

    fn toast(&self, toast: Toast) {
        eprintln!("{}", toast_line(&toast));
    }
}

fn toast_line(toast: &Toast) -> String {
    let tag = match toast.kind {
        ToastKind::Success => "ok",
        ToastKind::Error => "error",
        ToastKind::Warning => "warning",
        ToastKind::Info => "info",
    };
    format!("[{tag}] {}", toast.message)
}
