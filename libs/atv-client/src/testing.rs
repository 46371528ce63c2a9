//! Recording fakes for the front-end capabilities.

use crate::auth::{Dialogs, Navigator, Prompt};
use crate::ui::toast::Toast;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;

/// Navigator that records every target and moves its location there.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    location: Mutex<String>,
    visits: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    #[must_use]
    pub fn at(location: &str) -> Self {
        Self {
            location: Mutex::new(location.to_owned()),
            visits: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn visits(&self) -> Vec<String> {
        self.visits.lock().clone()
    }

    #[must_use]
    pub fn last_visit(&self) -> Option<String> {
        self.visits.lock().last().cloned()
    }
}

impl Navigator for RecordingNavigator {
    fn current_location(&self) -> String {
        self.location.lock().clone()
    }

    fn navigate(&self, target: &str) {
        *self.location.lock() = target.to_owned();
        self.visits.lock().push(target.to_owned());
    }
}

/// Dialogs that answer every confirm the same way and record everything.
#[derive(Debug, Default)]
pub struct RecordingDialogs {
    answer: bool,
    confirms: Mutex<Vec<String>>,
    alerts: Mutex<Vec<String>>,
    toasts: Mutex<Vec<Toast>>,
}

impl RecordingDialogs {
    #[must_use]
    pub fn answering(answer: bool) -> Self {
        Self {
            answer,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn confirms(&self) -> Vec<String> {
        self.confirms.lock().clone()
    }

    #[must_use]
    pub fn alerts(&self) -> Vec<String> {
        self.alerts.lock().clone()
    }

    #[must_use]
    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts.lock().clone()
    }
}

#[async_trait]
impl Dialogs for RecordingDialogs {
    async fn confirm(&self, message: &str) -> bool {
        self.confirms.lock().push(message.to_owned());
        self.answer
    }

    fn alert(&self, message: &str) {
        self.alerts.lock().push(message.to_owned());
    }

    fn toast(&self, toast: Toast) {
        self.toasts.lock().push(toast);
    }
}

/// Prompt that replays scripted answers, then a default.
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    answers: Mutex<VecDeque<bool>>,
    default: bool,
    asked: Mutex<Vec<String>>,
}

impl ScriptedPrompt {
    #[must_use]
    pub fn always(answer: bool) -> Self {
        Self {
            default: answer,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn script(answers: impl IntoIterator<Item = bool>, default: bool) -> Self {
        Self {
            answers: Mutex::new(answers.into_iter().collect()),
            default,
            asked: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn asked(&self) -> Vec<String> {
        self.asked.lock().clone()
    }
}

impl Prompt for ScriptedPrompt {
    fn ask_yes_no(&self, message: &str) -> bool {
        self.asked.lock().push(message.to_owned());
        self.answers.lock().pop_front().unwrap_or(self.default)
    }
}
