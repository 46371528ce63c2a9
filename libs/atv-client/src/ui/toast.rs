use super::escape_html;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// How long a toast stays visible
pub const TOAST_LIFETIME: Duration = Duration::from_secs(5);

static NEXT_TOAST_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToastKind {
    Info,
    Success,
    Error,
    Warning,
}

impl ToastKind {
    /// CSS suffix (`toast-<kind>`)
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ToastKind::Info => "info",
            ToastKind::Success => "success",
            ToastKind::Error => "error",
            ToastKind::Warning => "warning",
        }
    }
}

/// A transient notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: String,
    pub kind: ToastKind,
    pub message: String,
}

impl Toast {
    /// New toast with a process-unique id.
    pub fn new(kind: ToastKind, message: impl Into<String>) -> Self {
        let n = NEXT_TOAST_ID.fetch_add(1, Ordering::Relaxed);
        Self {
            id: format!("toast-{n}"),
            kind,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(ToastKind::Info, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(ToastKind::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(ToastKind::Error, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(ToastKind::Warning, message)
    }

    /// Markup for one toast; the message is escaped.
    #[must_use]
    pub fn render_html(&self) -> String {
        format!(
            r#"<div id="{id}" class="toast toast-{kind}"><span class="toast-message">{message}</span><button class="toast-close" data-dismiss="{id}">&times;</button></div>"#,
            id = self.id,
            kind = self.kind.as_str(),
            message = escape_html(&self.message),
        )
    }
}

/// Visible toasts, oldest first.
///
/// Time is passed in explicitly so callers drive expiry from their own clock.
#[derive(Debug)]
pub struct ToastQueue {
    lifetime: Duration,
    entries: Vec<(Toast, Instant)>,
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self::new(TOAST_LIFETIME)
    }
}

impl ToastQueue {
    #[must_use]
    pub fn new(lifetime: Duration) -> Self {
        Self {
            lifetime,
            entries: Vec::new(),
        }
    }

    pub fn push(&mut self, toast: Toast, now: Instant) {
        self.entries.push((toast, now));
    }

    /// Close a toast early. Returns `false` if it was already gone.
    pub fn dismiss(&mut self, id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(t, _)| t.id != id);
        self.entries.len() != before
    }

    /// Drop toasts older than the lifetime and return them.
    pub fn expire(&mut self, now: Instant) -> Vec<Toast> {
        let lifetime = self.lifetime;
        let (expired, alive): (Vec<_>, Vec<_>) = std::mem::take(&mut self.entries)
            .into_iter()
            .partition(|(_, shown)| now.saturating_duration_since(*shown) >= lifetime);
        self.entries = alive;
        expired.into_iter().map(|(t, _)| t).collect()
    }

    pub fn visible(&self) -> impl Iterator<Item = &Toast> {
        self.entries.iter().map(|(t, _)| t)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The `#toast-container` element with every visible toast.
    #[must_use]
    pub fn render_html(&self) -> String {
        let body: String = self.visible().map(Toast::render_html).collect();
        format!(r#"<div id="toast-container">{body}</div>"#)
    }
}
