//! Client settings.
//!
//! [`AppConfig`] is loaded once, validated, wrapped in an `Arc` and never
//! mutated afterwards. Every field has a default so partial YAML/env layers
//! are accepted.

use atv_http::{HttpClientConfig, TransportSecurity};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use url::Url;

pub const DEFAULT_API_BASE_URL: &str = "https://atvrental.muccs.site/api";
pub const DEFAULT_STORAGE_URL: &str = "https://atvrental.muccs.site/storage";
pub const DEFAULT_PLACEHOLDER_IMAGE: &str = "images/default.jpg";

/// Configuration validation failures
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("{field}: '{url}' is not a valid absolute URL: {reason}")]
    InvalidUrl {
        field: &'static str,
        url: String,
        reason: String,
    },

    #[error("{field}: '{url}' uses plain http but http.allow_insecure_http is false")]
    InsecureUrl { field: &'static str, url: String },

    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("token_key and user_key must differ (both are '{0}')")]
    DuplicateStorageKey(String),

    #[error("default_per_page must be greater than zero")]
    ZeroPerPage,
}

/// Transport settings for the request layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HttpSettings {
    /// Per-request timeout; requests run to completion when unset.
    #[serde(with = "humantime_serde")]
    pub request_timeout: Option<Duration>,
    pub user_agent: String,
    pub max_body_size: usize,
    /// Permit `http://` origins (local development and mock servers).
    pub allow_insecure_http: bool,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            request_timeout: None,
            user_agent: concat!("atv-client/", env!("CARGO_PKG_VERSION")).to_owned(),
            max_body_size: atv_http::DEFAULT_MAX_BODY_SIZE,
            allow_insecure_http: false,
        }
    }
}

impl HttpSettings {
    /// Transport configuration derived from these settings.
    #[must_use]
    pub fn client_config(&self) -> HttpClientConfig {
        HttpClientConfig {
            request_timeout: self.request_timeout,
            max_body_size: self.max_body_size,
            user_agent: self.user_agent.clone(),
            transport: if self.allow_insecure_http {
                TransportSecurity::AllowInsecureHttp
            } else {
                TransportSecurity::TlsOnly
            },
            ..HttpClientConfig::default()
        }
    }
}

/// Process-wide client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Origin every API path is appended to
    pub api_base_url: String,
    /// Origin for uploaded images
    pub storage_url: String,
    pub app_name: String,
    pub default_per_page: u32,
    /// Store key holding the bearer token
    pub token_key: String,
    /// Store key holding the serialized user profile
    pub user_key: String,
    pub default_avatar: String,
    pub default_atv_image: String,
    /// Public entry page; target of every forced re-authentication
    pub entry_page: String,
    /// Authenticated landing page
    pub landing_page: String,
    pub http: HttpSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_owned(),
            storage_url: DEFAULT_STORAGE_URL.to_owned(),
            app_name: "ATV Rental System".to_owned(),
            default_per_page: 12,
            token_key: "authtoken".to_owned(),
            user_key: "authuser".to_owned(),
            default_avatar: DEFAULT_PLACEHOLDER_IMAGE.to_owned(),
            default_atv_image: DEFAULT_PLACEHOLDER_IMAGE.to_owned(),
            entry_page: "index.html".to_owned(),
            landing_page: "dashboard.html".to_owned(),
            http: HttpSettings::default(),
        }
    }
}

impl AppConfig {
    /// Check URLs, storage keys and pagination size.
    ///
    /// # Errors
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.check_origin("api_base_url", &self.api_base_url)?;
        self.check_origin("storage_url", &self.storage_url)?;

        for (field, value) in [
            ("token_key", &self.token_key),
            ("user_key", &self.user_key),
            ("entry_page", &self.entry_page),
            ("landing_page", &self.landing_page),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Empty(field));
            }
        }
        if self.token_key == self.user_key {
            return Err(ConfigError::DuplicateStorageKey(self.token_key.clone()));
        }
        if self.default_per_page == 0 {
            return Err(ConfigError::ZeroPerPage);
        }
        Ok(())
    }

    fn check_origin(&self, field: &'static str, value: &str) -> Result<(), ConfigError> {
        let url = Url::parse(value).map_err(|e| ConfigError::InvalidUrl {
            field,
            url: value.to_owned(),
            reason: e.to_string(),
        })?;
        match url.scheme() {
            "https" => Ok(()),
            "http" if self.http.allow_insecure_http => Ok(()),
            "http" => Err(ConfigError::InsecureUrl {
                field,
                url: value.to_owned(),
            }),
            other => Err(ConfigError::InvalidUrl {
                field,
                url: value.to_owned(),
                reason: format!("unsupported scheme '{other}'"),
            }),
        }
    }

    /// Absolute URL for an API path (`/atvs` becomes `<api_base_url>/atvs`).
    #[must_use]
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{path}", self.api_base_url)
    }

    /// Resolve a stored image path against `storage_url`.
    ///
    /// Absolute URLs pass through; a missing path yields the ATV placeholder.
    #[must_use]
    pub fn asset_url(&self, path: Option<&str>) -> String {
        self.resolve_asset(path, &self.default_atv_image)
    }

    /// Like [`asset_url`](Self::asset_url) with the avatar placeholder.
    #[must_use]
    pub fn avatar_url(&self, path: Option<&str>) -> String {
        self.resolve_asset(path, &self.default_avatar)
    }

    fn resolve_asset(&self, path: Option<&str>, placeholder: &str) -> String {
        match path.map(str::trim) {
            None | Some("") => placeholder.to_owned(),
            Some(p) if p.starts_with("http://") || p.starts_with("https://") => p.to_owned(),
            Some(p) => format!(
                "{}/{}",
                self.storage_url.trim_end_matches('/'),
                p.trim_start_matches('/')
            ),
        }
    }

    /// True when `location` names the public entry page.
    ///
    /// Substring match, so `/app/index.html?next=x` counts.
    #[must_use]
    pub fn is_entry_page(&self, location: &str) -> bool {
        location.contains(&self.entry_page)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_deployment() {
        let config = AppConfig::default();
        assert_eq!(config.api_base_url, "https://atvrental.muccs.site/api");
        assert_eq!(config.default_per_page, 12);
        assert_eq!(config.token_key, "authtoken");
        assert_eq!(config.user_key, "authuser");
        assert_eq!(config.http.request_timeout, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = AppConfig {
            api_base_url: "not a url".to_owned(),
            ..AppConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidUrl {
                field: "api_base_url",
                ..
            })
        ));

        config.api_base_url = "http://localhost:8000/api".to_owned();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InsecureUrl { .. })
        ));
        config.http.allow_insecure_http = true;
        assert!(config.validate().is_ok());

        config.user_key = config.token_key.clone();
        assert_eq!(
            config.validate(),
            Err(ConfigError::DuplicateStorageKey("authtoken".to_owned()))
        );

        config.user_key = "authuser".to_owned();
        config.default_per_page = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroPerPage));
    }

    #[test]
    fn test_asset_url_resolution() {
        let config = AppConfig::default();
        assert_eq!(
            config.asset_url(Some("atvs/1.jpg")),
            "https://atvrental.muccs.site/storage/atvs/1.jpg"
        );
        assert_eq!(
            config.asset_url(Some("/atvs/1.jpg")),
            "https://atvrental.muccs.site/storage/atvs/1.jpg"
        );
        assert_eq!(
            config.avatar_url(Some("https://cdn.example.com/a.png")),
            "https://cdn.example.com/a.png"
        );
        assert_eq!(config.avatar_url(None), "images/default.jpg");
        assert_eq!(config.asset_url(Some("  ")), "images/default.jpg");
    }

    #[test]
    fn test_partial_yaml_like_layer_keeps_defaults() {
        let config: AppConfig = serde_json::from_value(serde_json::json!({
            "api_base_url": "https://staging.example.com/api",
            "http": { "request_timeout": "30s" }
        }))
        .unwrap();
        assert_eq!(config.api_base_url, "https://staging.example.com/api");
        assert_eq!(config.http.request_timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.landing_page, "dashboard.html");
    }

    #[test]
    fn test_entry_page_detection() {
        let config = AppConfig::default();
        assert!(config.is_entry_page("/index.html"));
        assert!(config.is_entry_page("https://host/app/index.html?next=rentals"));
        assert!(!config.is_entry_page("/dashboard.html"));
    }
}
