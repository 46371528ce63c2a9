use super::escape_html;

/// Full-page spinner shown while a request is in flight
pub const LOADING_OVERLAY_HTML: &str =
    r#"<div class="loading-overlay"><div class="spinner"></div></div>"#;

/// Confirmation dialog view model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmModal {
    pub id: String,
    pub title: String,
    pub message: String,
    pub cancel_label: String,
    pub confirm_label: String,
}

impl ConfirmModal {
    pub fn new(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: "Confirm Action".to_owned(),
            message: message.into(),
            cancel_label: "Cancel".to_owned(),
            confirm_label: "Confirm".to_owned(),
        }
    }

    #[must_use]
    pub fn render_html(&self) -> String {
        let id = escape_html(&self.id);
        format!(
            concat!(
                r#"<div id="{id}" class="modal-overlay"><div class="modal">"#,
                r#"<div class="modal-header"><h3>{title}</h3></div>"#,
                r#"<div class="modal-body"><p>{message}</p></div>"#,
                r#"<div class="modal-footer">"#,
                r#"<button class="btn btn-secondary" id="{id}-cancel">{cancel}</button>"#,
                r#"<button class="btn btn-primary" id="{id}-confirm">{confirm}</button>"#,
                "</div></div></div>"
            ),
            id = id,
            title = escape_html(&self.title),
            message = escape_html(&self.message),
            cancel = escape_html(&self.cancel_label),
            confirm = escape_html(&self.confirm_label),
        )
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_confirm_modal_markup() {
        let modal = ConfirmModal::new("confirm-modal-1", "Delete <ATV #3>?");
        let html = modal.render_html();
        assert!(html.starts_with(r#"<div id="confirm-modal-1" class="modal-overlay">"#));
        assert!(html.contains("<h3>Confirm Action</h3>"));
        assert!(html.contains("Delete &lt;ATV #3&gt;?"));
        assert!(html.contains(r#"id="confirm-modal-1-cancel">Cancel</button>"#));
        assert!(html.contains(r#"id="confirm-modal-1-confirm">Confirm</button>"#));
    }
}
