//! Presentation helpers.
//!
//! Everything here is a pure function of its inputs: view models for the
//! navigation bar, toasts and the confirm modal, text formatting, and escaped
//! HTML fragments for badges and pagination.

pub mod badge;
pub mod debounce;
pub mod format;
pub mod modal;
pub mod nav;
pub mod pagination;
pub mod toast;

pub use badge::{Badge, role_badge, status_badge};
pub use debounce::Debouncer;
pub use format::{format_amount, format_currency, format_date, format_date_time};
pub use modal::{ConfirmModal, LOADING_OVERLAY_HTML};
pub use nav::{NavUser, NavVisibility};
pub use pagination::{PageControl, build_pagination, render_pagination};
pub use toast::{TOAST_LIFETIME, Toast, ToastKind, ToastQueue};

/// Escape text for use in HTML content and double-quoted attributes.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }
}
