use crate::client::{HttpClient, HttpService};
use crate::config::{HttpClientConfig, TlsRootConfig, TransportSecurity};
use crate::error::HttpError;
use crate::layers::DefaultHeadersLayer;
use crate::response::ResponseBody;
use crate::tls::build_https_connector;
use bytes::Bytes;
use http::Response;
use http_body_util::{BodyExt, Full};
use hyper_util::client::legacy::Client;
use hyper_util::rt::{TokioExecutor, TokioTimer};
use std::time::Duration;
use tower::{ServiceBuilder, ServiceExt};
use tower_http::decompression::DecompressionLayer;

/// Builder for constructing an [`HttpClient`] with a layered tower middleware stack.
#[derive(Debug, Clone, Default)]
pub struct HttpClientBuilder {
    config: HttpClientConfig,
}

impl HttpClientBuilder {
    /// Create a new builder with default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder with a specific configuration
    #[must_use]
    pub fn with_config(config: HttpClientConfig) -> Self {
        Self { config }
    }

    /// Set the per-request timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = Some(timeout);
        self
    }

    /// Set the user agent string
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Set the maximum response body size
    #[must_use]
    pub fn max_body_size(mut self, size: usize) -> Self {
        self.config.max_body_size = size;
        self
    }

    /// Set the TLS root certificate strategy
    #[must_use]
    pub fn tls_roots(mut self, roots: TlsRootConfig) -> Self {
        self.config.tls_roots = roots;
        self
    }

    /// Set transport security mode
    ///
    /// Use `TransportSecurity::AllowInsecureHttp` only for local servers.
    #[must_use]
    pub fn transport(mut self, transport: TransportSecurity) -> Self {
        self.config.transport = transport;
        self
    }

    /// Allow insecure HTTP connections
    ///
    /// Equivalent to `.transport(TransportSecurity::AllowInsecureHttp)`.
    /// Only available in debug builds or with the `allow-insecure-http` feature.
    #[must_use]
    #[cfg(any(debug_assertions, feature = "allow-insecure-http"))]
    pub fn allow_insecure_http(mut self) -> Self {
        tracing::warn!(
            target: "atv_http::security",
            "allow_insecure_http() called - HTTP traffic will NOT be encrypted"
        );
        self.config.transport = TransportSecurity::AllowInsecureHttp;
        self
    }

    /// Build the HTTP client with all configured layers
    ///
    /// # Errors
    /// Returns an error if TLS initialization fails or a default header is invalid
    pub fn build(self) -> Result<HttpClient, HttpError> {
        if self.config.transport == TransportSecurity::AllowInsecureHttp {
            tracing::warn!(
                "insecure HTTP enabled (TransportSecurity::AllowInsecureHttp); \
                 use only against local servers"
            );
        }

        let https = build_https_connector(self.config.tls_roots, self.config.transport)?;

        let mut client_builder = Client::builder(TokioExecutor::new());
        // pool_idle_timeout is ignored without a timer
        client_builder
            .pool_timer(TokioTimer::new())
            .pool_max_idle_per_host(self.config.pool_max_idle_per_host);
        if let Some(idle_timeout) = self.config.pool_idle_timeout {
            client_builder.pool_idle_timeout(idle_timeout);
        }
        let hyper_client = client_builder.build::<_, Full<Bytes>>(https);

        let headers_layer = DefaultHeadersLayer::try_new(
            &self.config.user_agent,
            self.config.default_accept.as_deref(),
        )?;

        // Request flow: DefaultHeaders -> Decompression -> hyper client.
        // Every HTTP status comes back as Ok(Response); Err is transport only.
        let service = ServiceBuilder::new()
            .layer(headers_layer)
            .layer(DecompressionLayer::new())
            .service(hyper_client)
            .map_response(map_decompression_response)
            .map_err(HttpError::from);

        let service: HttpService = HttpService::new(service);

        Ok(HttpClient {
            service,
            max_body_size: self.config.max_body_size,
            transport_security: self.config.transport,
            request_timeout: self.config.request_timeout,
        })
    }
}

/// Box the decompression body into [`ResponseBody`].
fn map_decompression_response<B>(response: Response<B>) -> Response<ResponseBody>
where
    B: hyper::body::Body<Data = Bytes> + Send + Sync + 'static,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let (parts, body) = response.into_parts();
    let boxed_body: ResponseBody = body.map_err(Into::into).boxed();
    Response::from_parts(parts, boxed_body)
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_build_default_client() {
        let client = HttpClientBuilder::new().build().unwrap();
        assert_eq!(client.max_body_size(), crate::config::DEFAULT_MAX_BODY_SIZE);
        assert_eq!(client.transport_security, TransportSecurity::TlsOnly);
        assert_eq!(client.request_timeout, None);
    }

    #[test]
    fn test_builder_overrides() {
        let client = HttpClientBuilder::new()
            .timeout(Duration::from_secs(3))
            .max_body_size(1024)
            .transport(TransportSecurity::AllowInsecureHttp)
            .build()
            .unwrap();
        assert_eq!(client.request_timeout, Some(Duration::from_secs(3)));
        assert_eq!(client.max_body_size(), 1024);
        assert_eq!(
            client.transport_security,
            TransportSecurity::AllowInsecureHttp
        );
    }

    #[test]
    fn test_invalid_user_agent_fails_build() {
        let result = HttpClientBuilder::new().user_agent("bad\nagent").build();
        assert!(matches!(result, Err(HttpError::InvalidHeaderValue(_))));
    }
}
