use crate::models::{ErrorEnvelope, ValidationErrors};
use serde_json::Value;
use thiserror::Error;

/// Message used when the server gives none
pub const DEFAULT_ERROR_MESSAGE: &str = "An error occurred";

/// Broad error classes the UI reacts to differently
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No response (status 0) or a server failure (5xx)
    Network,
    /// 401; the session has already been cleared
    Authentication,
    /// 403
    Authorization,
    /// 404
    NotFound,
    /// 422 with field-level messages
    Validation,
    Other,
}

/// Normalized failure of a backend call.
///
/// Every rejection of the request layer has this shape, whether the server
/// answered with an error envelope or no response arrived at all (`status` 0).
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message} (HTTP {status})")]
pub struct ApiError {
    pub status: u16,
    pub message: String,
    pub errors: ValidationErrors,
    /// Machine-readable code from the error envelope
    pub code: Option<String>,
    /// Raw response body, when it was JSON
    pub response: Option<Value>,
}

impl ApiError {
    /// Error with a status and message only.
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            errors: ValidationErrors::default(),
            code: None,
            response: None,
        }
    }

    /// No response was received.
    #[must_use]
    pub fn network() -> Self {
        Self::new(0, DEFAULT_ERROR_MESSAGE)
    }

    /// Build from a non-2xx response body.
    ///
    /// A missing or non-JSON body still produces an error with the default
    /// message; `response` is only set for JSON bodies.
    #[must_use]
    pub fn from_response(status: u16, body: &[u8]) -> Self {
        let response: Option<Value> = serde_json::from_slice(body).ok();
        // Decoded from the raw bytes: `Value` objects do not keep field order.
        let envelope = serde_json::from_slice::<ErrorEnvelope>(body).unwrap_or_default();

        Self {
            status,
            message: envelope
                .message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| DEFAULT_ERROR_MESSAGE.to_owned()),
            errors: envelope.errors,
            code: envelope.code,
            response,
        }
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self.status {
            0 | 500.. => ErrorKind::Network,
            401 => ErrorKind::Authentication,
            403 => ErrorKind::Authorization,
            404 => ErrorKind::NotFound,
            422 => ErrorKind::Validation,
            _ => ErrorKind::Other,
        }
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }

    #[must_use]
    pub fn has_field_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// One human-readable string for an error.
///
/// Prefers the first field-level message, then the top-level message, then
/// `fallback`.
#[must_use]
pub fn handle_error(error: &ApiError, fallback: &str) -> String {
    if let Some(first) = error.errors.first_message() {
        return first.to_owned();
    }
    if error.message.is_empty() {
        fallback.to_owned()
    } else {
        error.message.clone()
    }
}
