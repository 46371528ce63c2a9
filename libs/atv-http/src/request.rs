use crate::client::HttpService;
use crate::config::TransportSecurity;
use crate::error::{HttpError, UrlProblem};
use crate::multipart::Form;
use crate::response::HttpResponse;
use bytes::Bytes;
use http::Request;
use http::header::{AUTHORIZATION, CONTENT_TYPE, HeaderName, HeaderValue};
use http_body_util::Full;
use serde::Serialize;
use std::time::Duration;
use tower::ServiceExt;

/// Body type for the request builder
#[derive(Clone, Debug)]
enum BodyKind {
    Empty,
    /// Serialized JSON
    Json(Bytes),
    /// Encoded `multipart/form-data` plus its content type
    Multipart { body: Bytes, content_type: String },
}

/// HTTP request builder with fluent API
///
/// Created by [`HttpClient::get`](crate::HttpClient::get),
/// [`HttpClient::post`](crate::HttpClient::post), etc. Errors raised while
/// building (bad header, unserializable query) are deferred to
/// [`send()`](RequestBuilder::send).
///
/// ```ignore
/// let resp = client
///     .get("https://api.example.com/atvs")
///     .bearer_auth(&token)
///     .query(&[("page", "2"), ("per_page", "12")])
///     .send()
///     .await?;
/// ```
#[must_use = "RequestBuilder does nothing until .send() is called"]
pub struct RequestBuilder {
    service: HttpService,
    max_body_size: usize,
    method: http::Method,
    url: String,
    query: Option<String>,
    headers: Vec<(HeaderName, HeaderValue)>,
    body: BodyKind,
    timeout: Option<Duration>,
    error: Option<HttpError>,
    transport_security: TransportSecurity,
}

impl RequestBuilder {
    pub(crate) fn new(
        service: HttpService,
        max_body_size: usize,
        method: http::Method,
        url: String,
        transport_security: TransportSecurity,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            service,
            max_body_size,
            method,
            url,
            query: None,
            headers: Vec::new(),
            body: BodyKind::Empty,
            timeout,
            error: None,
            transport_security,
        }
    }

    /// Add a single header to the request
    pub fn header(mut self, name: &str, value: &str) -> Self {
        if self.error.is_some() {
            return self;
        }

        match (HeaderName::try_from(name), HeaderValue::try_from(value)) {
            (Ok(name), Ok(value)) => self.headers.push((name, value)),
            (Err(e), _) => self.error = Some(HttpError::InvalidHeaderName(e)),
            (_, Err(e)) => self.error = Some(HttpError::InvalidHeaderValue(e)),
        }
        self
    }

    /// Add multiple headers to the request
    pub fn headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (name, value) in headers {
            if self.error.is_some() {
                break;
            }
            self = self.header(name.as_ref(), value.as_ref());
        }
        self
    }

    /// Set `Authorization: Bearer <token>`.
    ///
    /// The header value is marked sensitive so it never shows up in debug output.
    pub fn bearer_auth(mut self, token: &str) -> Self {
        if self.error.is_some() {
            return self;
        }

        match HeaderValue::try_from(format!("Bearer {token}")) {
            Ok(mut value) => {
                value.set_sensitive(true);
                self.headers.push((AUTHORIZATION, value));
            }
            Err(e) => self.error = Some(HttpError::InvalidHeaderValue(e)),
        }
        self
    }

    /// Append query parameters serialized with `serde_urlencoded`.
    ///
    /// Calling this twice joins both sets with `&`.
    pub fn query<T: Serialize + ?Sized>(mut self, params: &T) -> Self {
        if self.error.is_some() {
            return self;
        }

        match serde_urlencoded::to_string(params) {
            Ok(encoded) if encoded.is_empty() => {}
            Ok(encoded) => {
                self.query = Some(match self.query.take() {
                    Some(existing) => format!("{existing}&{encoded}"),
                    None => encoded,
                });
            }
            Err(e) => self.error = Some(HttpError::UrlEncode(e)),
        }
        self
    }

    /// Override the client-wide request timeout for this request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set request body as JSON
    ///
    /// Content-Type defaults to `application/json` unless a header was provided.
    ///
    /// # Errors
    ///
    /// Returns `Err(HttpError::Json)` if serialization fails.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, HttpError> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }

        let json_bytes = serde_json::to_vec(body)?;
        self.body = BodyKind::Json(Bytes::from(json_bytes));
        Ok(self)
    }

    /// Set request body as `multipart/form-data`.
    ///
    /// Content-Type carries the form's boundary; a caller-supplied
    /// Content-Type header still wins.
    pub fn multipart(mut self, form: &Form) -> Self {
        self.body = BodyKind::Multipart {
            body: form.encode(),
            content_type: form.content_type(),
        };
        self
    }

    /// Validate URL and scheme against transport security configuration.
    fn validate_url(&self) -> Result<http::Uri, HttpError> {
        let full = match &self.query {
            Some(query) if self.url.contains('?') => format!("{}&{query}", self.url),
            Some(query) => format!("{}?{query}", self.url),
            None => self.url.clone(),
        };

        let uri: http::Uri = full
            .parse()
            .map_err(|e: http::uri::InvalidUri| {
                HttpError::invalid_url(full.as_str(), UrlProblem::Malformed(e.to_string()))
            })?;

        if uri.authority().is_none() {
            return Err(HttpError::invalid_url(full, UrlProblem::NoHost));
        }

        let problem = match (uri.scheme_str(), self.transport_security) {
            (Some("https"), _) | (Some("http"), TransportSecurity::AllowInsecureHttp) => {
                return Ok(uri);
            }
            (Some("http"), TransportSecurity::TlsOnly) => UrlProblem::InsecureScheme,
            (Some(other), _) => UrlProblem::UnsupportedScheme(other.to_owned()),
            (None, _) => UrlProblem::NoScheme,
        };
        Err(HttpError::invalid_url(full, problem))
    }

    /// Send the request and return the response
    ///
    /// Non-2xx statuses are returned as a normal [`HttpResponse`]; use its
    /// checked readers to turn them into errors.
    ///
    /// # Errors
    ///
    /// Returns `HttpError` if:
    /// - Request building failed (invalid headers, URL, query)
    /// - URL scheme is invalid for the transport security mode
    /// - Network/transport error
    /// - The request timeout elapsed
    pub async fn send(mut self) -> Result<HttpResponse, HttpError> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }

        let uri = self.validate_url()?;
        let mut builder = Request::builder().method(self.method).uri(uri);

        let has_content_type = self.headers.iter().any(|(name, _)| name == CONTENT_TYPE);
        if !has_content_type {
            match &self.body {
                BodyKind::Json(_) => builder = builder.header(CONTENT_TYPE, "application/json"),
                BodyKind::Multipart { content_type, .. } => {
                    builder = builder.header(CONTENT_TYPE, content_type.as_str());
                }
                BodyKind::Empty => {}
            }
        }

        for (name, value) in self.headers {
            builder = builder.header(name, value);
        }

        let body_bytes = match self.body {
            BodyKind::Empty => Bytes::new(),
            BodyKind::Json(b) => b,
            BodyKind::Multipart { body, .. } => body,
        };

        let request = builder.body(Full::new(body_bytes))?;
        let call = self.service.oneshot(request);

        let inner = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| HttpError::Timeout(limit))??,
            None => call.await?,
        };

        Ok(HttpResponse {
            inner,
            max_body_size: self.max_body_size,
        })
    }
}
