//! Inline validation errors on forms.

use crate::models::ValidationErrors;
use crate::ui::escape_html;
use std::collections::BTreeMap;

/// Something that can decorate form fields with error messages.
pub trait FormSurface {
    fn has_field(&self, form_id: &str, field: &str) -> bool;

    fn mark_invalid(&mut self, form_id: &str, field: &str, message: &str);

    /// Remove every decoration from the form.
    fn clear_errors(&mut self, form_id: &str);
}

/// Show the first message of each field on `form_id`.
///
/// Previous decorations are cleared first, so applying the same errors twice
/// gives the same result. Fields the form does not have are skipped.
/// Returns the number of fields decorated.
pub fn show_validation_errors<S: FormSurface + ?Sized>(
    surface: &mut S,
    errors: &ValidationErrors,
    form_id: &str,
) -> usize {
    surface.clear_errors(form_id);
    let mut applied = 0;
    for entry in errors {
        let Some(message) = entry.messages.first() else {
            continue;
        };
        if surface.has_field(form_id, &entry.field) {
            surface.mark_invalid(form_id, &entry.field, message);
            applied += 1;
        } else {
            tracing::debug!(form_id, field = %entry.field, "no such field on form");
        }
    }
    applied
}

pub fn clear_validation_errors<S: FormSurface + ?Sized>(surface: &mut S, form_id: &str) {
    surface.clear_errors(form_id);
}

/// In-memory form model: a fixed set of field names plus current errors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HtmlForm {
    id: String,
    fields: Vec<String>,
    invalid: BTreeMap<String, String>,
}

impl HtmlForm {
    pub fn new<I, S>(id: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            fields: fields.into_iter().map(Into::into).collect(),
            invalid: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn is_invalid(&self, field: &str) -> bool {
        self.invalid.contains_key(field)
    }

    #[must_use]
    pub fn error(&self, field: &str) -> Option<&str> {
        self.invalid.get(field).map(String::as_str)
    }

    /// `<span class="error-message">` placed after an invalid input.
    #[must_use]
    pub fn error_html(&self, field: &str) -> Option<String> {
        self.error(field)
            .map(|m| format!(r#"<span class="error-message">{}</span>"#, escape_html(m)))
    }

    pub fn invalid_fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.invalid.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl FormSurface for HtmlForm {
    fn has_field(&self, form_id: &str, field: &str) -> bool {
        form_id == self.id && self.fields.iter().any(|f| f == field)
    }

    fn mark_invalid(&mut self, form_id: &str, field: &str, message: &str) {
        if form_id == self.id {
            self.invalid.insert(field.to_owned(), message.to_owned());
        }
    }

    fn clear_errors(&mut self, form_id: &str) {
        if form_id == self.id {
            self.invalid.clear();
        }
    }
}
