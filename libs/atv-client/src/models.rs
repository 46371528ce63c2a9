//! Wire models for the rental backend.
//!
//! The backend wraps every payload in an envelope: `{success, data, message?}`
//! on success and `{message, errors?, code?}` on failure. Both shapes are
//! decoded here so the rest of the crate never pokes at untyped JSON.

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Account role as sent by the backend (`"admin"`, `"manager"`, `"customer"`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
    Customer,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Manager, Role::Customer];

    /// Wire value
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::Customer => "customer",
        }
    }

    /// Capitalized label for display
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Manager => "Manager",
            Role::Customer => "Customer",
        }
    }

    /// Admins and managers may manage fleet and rentals.
    #[must_use]
    pub fn can_manage(self) -> bool {
        matches!(self, Role::Admin | Role::Manager)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role '{0}'")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownRole(s.to_owned()))
    }
}

/// Profile of the signed-in user.
///
/// Replaced wholesale on login or profile refresh. Fields the client does not
/// model are kept in `extra` so a stored profile round-trips unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserProfile {
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Successful response envelope `{success, data, message?}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuccessEnvelope<T> {
    #[serde(default)]
    pub success: bool,
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Error response envelope `{message, errors?, code?}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub errors: ValidationErrors,
    /// Machine-readable error code, when the backend provides one
    #[serde(default)]
    pub code: Option<String>,
}

/// `data` of a successful login
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginData {
    pub token: String,
    pub user: UserProfile,
}

/// Paging descriptor supplied by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub current_page: u32,
    pub last_page: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
}

impl Pagination {
    #[must_use]
    pub fn new(current_page: u32, last_page: u32) -> Self {
        Self {
            current_page,
            last_page,
            per_page: None,
            total: None,
        }
    }
}

/// Laravel-style page: `data` next to `current_page`, `last_page`, ...
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    #[serde(flatten)]
    pub pagination: Pagination,
}

/// Messages reported for one form field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub messages: Vec<String>,
}

/// Field-level validation messages in the order the server sent them.
///
/// Accepts `{"field": "msg"}` and `{"field": ["msg", ...]}` alike.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append messages for `field`, merging with an existing entry.
    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        let field = field.into();
        let message = message.into();
        match self.0.iter_mut().find(|e| e.field == field) {
            Some(entry) => entry.messages.push(message),
            None => self.0.push(FieldError {
                field,
                messages: vec![message],
            }),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Messages for one field
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.messages.as_slice())
    }

    /// First message of the first field that has one
    #[must_use]
    pub fn first_message(&self) -> Option<&str> {
        self.0
            .iter()
            .find_map(|e| e.messages.first())
            .map(String::as_str)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldError> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a FieldError;
    type IntoIter = std::slice::Iter<'a, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Serialize for ValidationErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for entry in &self.0 {
            map.serialize_entry(&entry.field, &entry.messages)?;
        }
        map.end()
    }
}

/// One field's value: a single message or a list of them
#[derive(Deserialize)]
#[serde(untagged)]
enum FieldMessages {
    One(String),
    Many(Vec<String>),
    Other(Value),
}

impl FieldMessages {
    fn into_vec(self) -> Vec<String> {
        match self {
            FieldMessages::One(msg) => vec![msg],
            FieldMessages::Many(msgs) => msgs,
            FieldMessages::Other(Value::Null) => Vec::new(),
            FieldMessages::Other(other) => vec![other.to_string()],
        }
    }
}

struct ValidationErrorsVisitor;

impl<'de> Visitor<'de> for ValidationErrorsVisitor {
    type Value = ValidationErrors;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of field names to messages")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut out = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((field, messages)) = access.next_entry::<String, FieldMessages>()? {
            out.push(FieldError {
                field,
                messages: messages.into_vec(),
            });
        }
        Ok(ValidationErrors(out))
    }

    // Some endpoints send `errors: []` when there are none.
    fn visit_seq<A: de::SeqAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        while access.next_element::<de::IgnoredAny>()?.is_some() {}
        Ok(ValidationErrors::default())
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(ValidationErrors::default())
    }
}

impl<'de> Deserialize<'de> for ValidationErrors {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ValidationErrorsVisitor)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use serde_json::json;

    fn profile_json() -> Value {
        json!({
            "id": 7,
            "first_name": "Ana",
            "last_name": "Reyes",
            "email": "ana@example.com",
            "role": "manager",
            "avatar": null,
            "phone": "555-0100"
        })
    }

    #[test]
    fn test_profile_keeps_unknown_fields() {
        let profile: UserProfile = serde_json::from_value(profile_json()).unwrap();
        assert_eq!(profile.role, Role::Manager);
        assert_eq!(profile.full_name(), "Ana Reyes");
        assert_eq!(profile.extra.get("phone"), Some(&json!("555-0100")));

        let back = serde_json::to_value(&profile).unwrap();
        assert_eq!(back["phone"], "555-0100");
        assert_eq!(back["role"], "manager");
    }

    #[test]
    fn test_role_parse_and_label() {
        assert_eq!("ADMIN".parse::<Role>().unwrap(), Role::Admin);
        assert!("owner".parse::<Role>().is_err());
        assert_eq!(Role::Customer.to_string(), "Customer");
        assert!(Role::Manager.can_manage());
        assert!(!Role::Customer.can_manage());
    }

    #[test]
    fn test_validation_errors_keep_server_order() {
        let errors: ValidationErrors = serde_json::from_str(
            r#"{"password": ["too short", "needs a digit"], "email": "taken", "age": 5}"#,
        )
        .unwrap();

        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, ["password", "email", "age"]);
        assert_eq!(errors.first_message(), Some("too short"));
        assert_eq!(errors.get("email").unwrap(), ["taken"]);
        assert_eq!(errors.get("age").unwrap(), ["5"]);
    }

    #[test]
    fn test_validation_errors_accept_empty_shapes() {
        let envelope: ErrorEnvelope =
            serde_json::from_value(json!({"message": "x", "errors": []})).unwrap();
        assert!(envelope.errors.is_empty());

        let envelope: ErrorEnvelope =
            serde_json::from_value(json!({"message": "x", "errors": null})).unwrap();
        assert!(envelope.errors.is_empty());

        let envelope: ErrorEnvelope = serde_json::from_value(json!({})).unwrap();
        assert_eq!(envelope, ErrorEnvelope::default());
    }

    #[test]
    fn test_paginated_reads_laravel_shape() {
        let page: Paginated<Value> = serde_json::from_value(json!({
            "data": [{"id": 1}, {"id": 2}],
            "current_page": 2,
            "last_page": 4,
            "per_page": 12,
            "total": 40,
            "next_page_url": "https://host/api/atvs?page=3"
        }))
        .unwrap();
        assert_eq!(page.data.len(), 2);
        assert_eq!(page.pagination.current_page, 2);
        assert_eq!(page.pagination.total, Some(40));
    }
}
