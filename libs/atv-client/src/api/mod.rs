//! Request layer for the rental backend.
//!
//! Every call goes through [`ApiClient::request`]: it resolves the URL, attaches
//! the bearer token, normalizes every failure into an [`ApiError`] and reacts
//! to 401 by clearing the session and sending the user to the entry page.

mod auth_api;
mod error;
pub mod forms;

pub use auth_api::AuthApi;
pub use error::{ApiError, DEFAULT_ERROR_MESSAGE, ErrorKind, handle_error};
pub use forms::{FormSurface, clear_validation_errors, show_validation_errors};

use crate::auth::Navigator;
use crate::config::AppConfig;
use crate::models::SuccessEnvelope;
use crate::session::Session;
use atv_http::{Form, HttpClient, HttpClientBuilder, HttpError, RequestBuilder};
use http::Method;
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

/// Message for a 2xx body that is not JSON or not the expected shape
pub const INVALID_RESPONSE_MESSAGE: &str = "Invalid JSON response";

/// Payload of a request
#[derive(Debug, Clone, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    /// Sent as `application/json`
    Json(Value),
    /// Sent as-is; the transport sets the `multipart/form-data` boundary
    Multipart(Form),
}

/// Per-call adjustments merged over the layer's defaults.
///
/// Headers given here replace defaults of the same name, so a caller can
/// override `Accept` or supply its own `Authorization`.
#[derive(Debug, Clone, Default)]
pub struct RequestOverrides {
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    /// Do not attach the stored bearer token
    pub skip_auth: bool,
    /// On 401 clear the session but leave navigation to the caller
    pub stay_on_page: bool,
}

impl RequestOverrides {
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Add query pairs from any flat serializable value (struct, map, pairs).
    ///
    /// # Errors
    /// Returns the encoder error for nested or otherwise unencodable values.
    pub fn with_query<T: Serialize + ?Sized>(
        mut self,
        params: &T,
    ) -> Result<Self, serde_urlencoded::ser::Error> {
        let encoded = serde_urlencoded::to_string(params)?;
        // Decoding our own output cannot fail; an empty result means no params.
        let pairs: Vec<(String, String)> =
            serde_urlencoded::from_str(&encoded).unwrap_or_default();
        self.query.extend(pairs);
        Ok(self)
    }

    #[must_use]
    pub fn skip_auth(mut self) -> Self {
        self.skip_auth = true;
        self
    }

    #[must_use]
    pub fn stay_on_page(mut self) -> Self {
        self.stay_on_page = true;
        self
    }

    fn has_header(&self, name: &str) -> bool {
        self.headers.iter().any(|(k, _)| k.eq_ignore_ascii_case(name))
    }
}

/// Authenticated JSON client bound to the configured API origin.
#[derive(Clone)]
pub struct ApiClient {
    http: HttpClient,
    config: Arc<AppConfig>,
    session: Arc<Session>,
    navigator: Arc<dyn Navigator>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("api_base_url", &self.config.api_base_url)
            .field("http", &self.http)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Build the transport from `config.http`.
    ///
    /// # Errors
    /// Returns [`HttpError`] if TLS initialization fails.
    pub fn new(
        config: Arc<AppConfig>,
        session: Arc<Session>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, HttpError> {
        let http = HttpClientBuilder::with_config(config.http.client_config()).build()?;
        Ok(Self::with_http(http, config, session, navigator))
    }

    /// Use an already built transport.
    pub fn with_http(
        http: HttpClient,
        config: Arc<AppConfig>,
        session: Arc<Session>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            http,
            config,
            session,
            navigator,
        }
    }

    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Issue one call and return its JSON payload.
    ///
    /// A 2xx with an empty body yields `Value::Null`.
    ///
    /// # Errors
    /// Every failure is an [`ApiError`]: status 0 when no response arrived,
    /// otherwise the HTTP status with the server's error envelope. On 401 the
    /// session is already cleared (and the navigator redirected unless
    /// [`RequestOverrides::stay_on_page`] is set) when this returns.
    #[tracing::instrument(skip_all, fields(method = %method, path = %path))]
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
        overrides: RequestOverrides,
    ) -> Result<Value, ApiError> {
        let url = self.config.api_url(path);
        let builder = self.prepare(self.http.request(method, &url), body, &overrides)?;

        tracing::debug!("sending request");
        let response = builder.send().await.map_err(|e| {
            tracing::warn!(error = %e, "request failed without a response");
            ApiError::network()
        })?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| {
            tracing::warn!(status = status.as_u16(), error = %e, "failed to read response body");
            ApiError::network()
        })?;

        if status.is_success() {
            if bytes.iter().all(u8::is_ascii_whitespace) {
                return Ok(Value::Null);
            }
            return serde_json::from_slice(&bytes).map_err(|e| {
                tracing::warn!(status = status.as_u16(), error = %e, "response body is not JSON");
                ApiError::new(status.as_u16(), INVALID_RESPONSE_MESSAGE)
            });
        }

        let error = ApiError::from_response(status.as_u16(), &bytes);
        tracing::debug!(status = error.status, message = %error.message, "request rejected");
        if error.is_unauthorized() {
            if overrides.stay_on_page {
                self.session.clear();
            } else {
                self.handle_unauthorized();
            }
        }
        Err(error)
    }

    fn prepare(
        &self,
        mut builder: RequestBuilder,
        body: RequestBody,
        overrides: &RequestOverrides,
    ) -> Result<RequestBuilder, ApiError> {
        if !overrides.has_header("accept") {
            builder = builder.header("accept", "application/json");
        }
        if !overrides.skip_auth
            && !overrides.has_header("authorization")
            && let Some(token) = self.session.token()
        {
            builder = builder.bearer_auth(token.expose_secret());
        }
        builder = builder.headers(overrides.headers.iter().map(|(k, v)| (k, v)));

        if !overrides.query.is_empty() {
            builder = builder.query(&overrides.query);
        }

        match body {
            RequestBody::Empty => Ok(builder),
            RequestBody::Json(value) => builder.json(&value).map_err(|e| {
                tracing::warn!(error = %e, "failed to encode request body");
                ApiError::network()
            }),
            RequestBody::Multipart(form) => Ok(builder.multipart(&form)),
        }
    }

    /// Clear the session and leave the page unless it is the entry page.
    fn handle_unauthorized(&self) {
        self.session.clear();
        let location = self.navigator.current_location();
        if self.config.is_entry_page(&location) {
            tracing::debug!(location, "unauthorized on entry page; staying");
        } else {
            tracing::info!(location, "session rejected; returning to entry page");
            self.navigator.navigate(&self.config.entry_page);
        }
    }

    /// `GET path?params`; no `?` is added when `params` encodes to nothing.
    ///
    /// # Errors
    /// See [`request`](Self::request). Unencodable params give status 0.
    pub async fn get<P: Serialize + ?Sized>(
        &self,
        path: &str,
        params: &P,
    ) -> Result<Value, ApiError> {
        let overrides = RequestOverrides::default()
            .with_query(params)
            .map_err(|e| ApiError::new(0, format!("invalid query parameters: {e}")))?;
        self.request(Method::GET, path, RequestBody::Empty, overrides)
            .await
    }

    /// # Errors
    /// See [`request`](Self::request).
    pub async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Value, ApiError> {
        let body = json_body(body)?;
        self.request(Method::POST, path, body, RequestOverrides::default())
            .await
    }

    /// # Errors
    /// See [`request`](Self::request).
    pub async fn put<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Value, ApiError> {
        let body = json_body(body)?;
        self.request(Method::PUT, path, body, RequestOverrides::default())
            .await
    }

    /// # Errors
    /// See [`request`](Self::request).
    pub async fn delete(&self, path: &str) -> Result<Value, ApiError> {
        self.request(
            Method::DELETE,
            path,
            RequestBody::Empty,
            RequestOverrides::default(),
        )
        .await
    }

    /// `POST` a multipart form (file uploads).
    ///
    /// # Errors
    /// See [`request`](Self::request).
    pub async fn upload(&self, path: &str, form: Form) -> Result<Value, ApiError> {
        self.request(
            Method::POST,
            path,
            RequestBody::Multipart(form),
            RequestOverrides::default(),
        )
        .await
    }

    /// Typed [`get`](Self::get); see [`decode_payload`].
    ///
    /// # Errors
    /// See [`request`](Self::request) and [`decode_payload`].
    pub async fn get_json<T, P>(&self, path: &str, params: &P) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        P: Serialize + ?Sized,
    {
        decode_payload(self.get(path, params).await?)
    }

    /// Typed [`post`](Self::post); see [`decode_payload`].
    ///
    /// # Errors
    /// See [`request`](Self::request) and [`decode_payload`].
    pub async fn post_json<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        decode_payload(self.post(path, body).await?)
    }
}

fn json_body<B: Serialize + ?Sized>(body: &B) -> Result<RequestBody, ApiError> {
    serde_json::to_value(body)
        .map(RequestBody::Json)
        .map_err(|e| ApiError::new(0, format!("invalid request body: {e}")))
}

/// Decode a 2xx payload into `T`.
///
/// Objects carrying a `success` key are treated as the success envelope and
/// `data` is decoded; anything else is decoded as-is.
///
/// # Errors
/// `success: false` yields an [`ApiError`] with the envelope's message; a
/// shape mismatch yields [`INVALID_RESPONSE_MESSAGE`]. Both use status 200.
pub fn decode_payload<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    let invalid = |e: serde_json::Error| {
        tracing::warn!(error = %e, "unexpected response shape");
        ApiError::new(200, INVALID_RESPONSE_MESSAGE)
    };

    if !value.as_object().is_some_and(|o| o.contains_key("success")) {
        return serde_json::from_value(value).map_err(invalid);
    }

    let envelope: SuccessEnvelope<T> = serde_json::from_value(value.clone()).map_err(invalid)?;
    match envelope.data {
        Some(data) if envelope.success => Ok(data),
        _ => {
            let mut error = ApiError::new(
                200,
                envelope
                    .message
                    .unwrap_or_else(|| DEFAULT_ERROR_MESSAGE.to_owned()),
            );
            error.response = Some(value);
            Err(error)
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, serde::Deserialize, PartialEq)]
    struct Atv {
        id: u64,
        name: String,
    }

    #[test]
    fn test_with_query_flattens_struct_and_pairs() {
        #[derive(Serialize)]
        struct Filter<'a> {
            status: &'a str,
            page: u32,
            search: Option<&'a str>,
        }

        let overrides = RequestOverrides::default()
            .with_query(&Filter {
                status: "available",
                page: 2,
                search: None,
            })
            .unwrap()
            .with_query(&[("q", "quad bike")])
            .unwrap();
        assert_eq!(
            overrides.query,
            [
                ("status".to_owned(), "available".to_owned()),
                ("page".to_owned(), "2".to_owned()),
                ("q".to_owned(), "quad bike".to_owned()),
            ]
        );

        let empty = RequestOverrides::default().with_query(&()).unwrap();
        assert!(empty.query.is_empty());
    }

    #[test]
    fn test_header_override_is_case_insensitive() {
        let overrides = RequestOverrides::default().header("ACCEPT", "text/csv");
        assert!(overrides.has_header("accept"));
        assert!(!overrides.has_header("authorization"));
    }

    #[test]
    fn test_decode_payload_envelope_and_bare() {
        let atv: Atv =
            decode_payload(json!({"success": true, "data": {"id": 1, "name": "Raptor"}})).unwrap();
        assert_eq!(atv.name, "Raptor");

        let list: Vec<Atv> = decode_payload(json!([{"id": 2, "name": "Grizzly"}])).unwrap();
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_decode_payload_rejections() {
        let err = decode_payload::<Atv>(json!({"success": false, "message": "ATV not found."}))
            .unwrap_err();
        assert_eq!(err.status, 200);
        assert_eq!(err.message, "ATV not found.");
        assert!(err.response.is_some());

        let err = decode_payload::<Atv>(json!({"success": true, "data": {"id": "x"}})).unwrap_err();
        assert_eq!(err.message, INVALID_RESPONSE_MESSAGE);
    }
}
