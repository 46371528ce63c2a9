use crate::builder::HttpClientBuilder;
use crate::config::TransportSecurity;
use crate::error::HttpError;
use crate::request::RequestBuilder;
use crate::response::ResponseBody;
use bytes::Bytes;
use http::{Method, Request, Response};
use http_body_util::Full;
use std::time::Duration;
use tower::util::BoxCloneSyncService;

/// Type-erased service stack every request goes through
pub type HttpService = BoxCloneSyncService<Request<Full<Bytes>>, Response<ResponseBody>, HttpError>;

/// HTTP client over a tower middleware stack
///
/// The stack injects default headers and transparently decompresses
/// responses. Use [`HttpClientBuilder`] to construct instances with custom
/// configuration.
///
/// `HttpClient` is `Clone + Send + Sync`; clones share the connection pool.
///
/// ```ignore
/// let client = HttpClient::builder().build()?;
/// let profile: Profile = client
///     .get("https://api.example.com/profile")
///     .bearer_auth(&token)
///     .send()
///     .await?
///     .json()
///     .await?;
/// ```
#[derive(Clone)]
pub struct HttpClient {
    pub(crate) service: HttpService,
    pub(crate) max_body_size: usize,
    pub(crate) transport_security: TransportSecurity,
    pub(crate) request_timeout: Option<Duration>,
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("max_body_size", &self.max_body_size)
            .field("transport_security", &self.transport_security)
            .field("request_timeout", &self.request_timeout)
            .finish_non_exhaustive()
    }
}

impl HttpClient {
    /// Create a new HTTP client with default configuration
    ///
    /// # Errors
    /// Returns an error if TLS initialization fails
    pub fn new() -> Result<Self, HttpError> {
        HttpClientBuilder::new().build()
    }

    /// Create a builder for configuring the HTTP client
    #[must_use]
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::new()
    }

    /// Start a request with an arbitrary method.
    ///
    /// The URL must be absolute (scheme and host); relative URLs are rejected
    /// at send time with [`HttpError::InvalidUrl`].
    pub fn request(&self, method: Method, url: &str) -> RequestBuilder {
        RequestBuilder::new(
            self.service.clone(),
            self.max_body_size,
            method,
            url.to_owned(),
            self.transport_security,
            self.request_timeout,
        )
    }

    pub fn get(&self, url: &str) -> RequestBuilder {
        self.request(Method::GET, url)
    }

    pub fn post(&self, url: &str) -> RequestBuilder {
        self.request(Method::POST, url)
    }

    pub fn put(&self, url: &str) -> RequestBuilder {
        self.request(Method::PUT, url)
    }

    pub fn delete(&self, url: &str) -> RequestBuilder {
        self.request(Method::DELETE, url)
    }

    /// Maximum response body size applied by the body readers.
    #[must_use]
    pub fn max_body_size(&self) -> usize {
        self.max_body_size
    }
}
