use std::time::Duration;

/// Default User-Agent string for HTTP requests
pub const DEFAULT_USER_AGENT: &str = concat!("atv-http/", env!("CARGO_PKG_VERSION"));

/// Default maximum response body size (10 MiB)
pub const DEFAULT_MAX_BODY_SIZE: usize = 10 * 1024 * 1024;

/// TLS root certificate configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[non_exhaustive]
pub enum TlsRootConfig {
    /// Use Mozilla's root certificates (webpki-roots, no OS dependency)
    #[default]
    WebPki,
    /// Use OS native root certificate store
    Native,
}

/// Transport security configuration
///
/// Controls whether the client enforces TLS or allows insecure HTTP.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[non_exhaustive]
pub enum TransportSecurity {
    /// Require TLS for all connections (HTTPS only) - default and recommended
    #[default]
    TlsOnly,
    /// Allow insecure HTTP connections (local development and mock servers)
    AllowInsecureHttp,
}

/// Overall HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Per-request timeout (default: none)
    ///
    /// A request runs to completion or failure unless a timeout is set here.
    pub request_timeout: Option<Duration>,

    /// Maximum response body size in bytes (default: 10 MiB)
    pub max_body_size: usize,

    /// User-Agent header value
    pub user_agent: String,

    /// Default `Accept` header value applied when the caller sets none
    pub default_accept: Option<String>,

    /// Transport security mode (default: `TlsOnly`)
    pub transport: TransportSecurity,

    /// TLS root certificate strategy (default: `WebPki`)
    pub tls_roots: TlsRootConfig,

    /// Timeout for idle connections in the pool (default: 90 seconds)
    pub pool_idle_timeout: Option<Duration>,

    /// Maximum idle connections kept per host (default: 8)
    pub pool_max_idle_per_host: usize,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            request_timeout: None,
            max_body_size: DEFAULT_MAX_BODY_SIZE,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            default_accept: Some("application/json".to_owned()),
            transport: TransportSecurity::TlsOnly,
            tls_roots: TlsRootConfig::WebPki,
            pool_idle_timeout: Some(Duration::from_secs(90)),
            pool_max_idle_per_host: 8,
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_have_no_timeout() {
        let config = HttpClientConfig::default();
        assert_eq!(config.request_timeout, None);
        assert_eq!(config.transport, TransportSecurity::TlsOnly);
        assert_eq!(config.default_accept.as_deref(), Some("application/json"));
        assert!(config.user_agent.starts_with("atv-http/"));
    }
}
