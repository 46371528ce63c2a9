use crate::error::HttpError;
use bytes::Bytes;
use http::{HeaderMap, Response, StatusCode};
use http_body_util::BodyExt;
use serde::de::DeserializeOwned;

/// Maximum body preview kept in `HttpError::HttpStatus` (8 KiB).
pub const ERROR_BODY_PREVIEW_LIMIT: usize = 8 * 1024;

/// Boxed response body after the decompression layer.
pub type ResponseBody =
    http_body_util::combinators::BoxBody<Bytes, Box<dyn std::error::Error + Send + Sync>>;

/// HTTP response wrapper with size-limited body readers
///
/// - `resp.error_for_status()?` - check status without reading the body
/// - `resp.bytes().await?` - raw bytes, any status
/// - `resp.json::<T>().await?` - JSON with status check
#[derive(Debug)]
pub struct HttpResponse {
    pub(crate) inner: Response<ResponseBody>,
    pub(crate) max_body_size: usize,
}

impl HttpResponse {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.inner.status()
    }

    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        self.inner.headers()
    }

    /// `Content-Type` header value, if present and valid UTF-8.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.inner
            .headers()
            .get(http::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
    }

    /// Check status and return an error for non-2xx responses.
    ///
    /// Does not read the body; the error carries an empty preview.
    ///
    /// # Errors
    ///
    /// Returns `HttpError::HttpStatus` if the response status is not 2xx.
    pub fn error_for_status(self) -> Result<Self, HttpError> {
        if self.inner.status().is_success() {
            return Ok(self);
        }
        Err(HttpError::HttpStatus {
            status: self.inner.status(),
            body_preview: String::new(),
            content_type: self.content_type().map(str::to_owned),
        })
    }

    /// Read the whole body regardless of status.
    ///
    /// # Errors
    /// Returns `HttpError::BodyTooLarge` if the body exceeds `max_body_size`.
    pub async fn bytes(self) -> Result<Bytes, HttpError> {
        read_body_limited(self.inner, self.max_body_size).await
    }

    /// Read the whole body, failing on non-2xx status.
    ///
    /// # Errors
    /// Returns `HttpError::HttpStatus` (with a body preview) if status is not 2xx.
    /// Returns `HttpError::BodyTooLarge` if the body exceeds `max_body_size`.
    pub async fn checked_bytes(self) -> Result<Bytes, HttpError> {
        let status = self.inner.status();
        if status.is_success() {
            return read_body_limited(self.inner, self.max_body_size).await;
        }

        let content_type = self.content_type().map(str::to_owned);
        let preview_limit = self.max_body_size.min(ERROR_BODY_PREVIEW_LIMIT);
        let body_preview = match read_body_limited(self.inner, preview_limit).await {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(HttpError::BodyTooLarge { .. }) => "<body too large for preview>".to_owned(),
            Err(e) => return Err(e),
        };
        Err(HttpError::HttpStatus {
            status,
            body_preview,
            content_type,
        })
    }

    /// Parse the body as JSON, failing on non-2xx status.
    ///
    /// # Errors
    /// Same as [`checked_bytes`](Self::checked_bytes), plus `HttpError::Json`.
    pub async fn json<T: DeserializeOwned>(self) -> Result<T, HttpError> {
        let body = self.checked_bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

async fn read_body_limited(
    response: Response<ResponseBody>,
    limit: usize,
) -> Result<Bytes, HttpError> {
    let mut body = std::pin::pin!(response.into_body());
    let mut collected = Vec::new();

    while let Some(frame) = body.frame().await {
        let frame = frame.map_err(HttpError::Transport)?;
        if let Some(chunk) = frame.data_ref() {
            if collected.len() + chunk.len() > limit {
                return Err(HttpError::BodyTooLarge {
                    limit,
                    actual: collected.len() + chunk.len(),
                });
            }
            collected.extend_from_slice(chunk);
        }
    }

    Ok(Bytes::from(collected))
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use http_body_util::Full;

    fn response(status: StatusCode, body: &'static str, limit: usize) -> HttpResponse {
        let body: ResponseBody = Full::new(Bytes::from_static(body.as_bytes()))
            .map_err(|never| match never {})
            .boxed();
        let inner = Response::builder()
            .status(status)
            .header(http::header::CONTENT_TYPE, "application/json")
            .body(body)
            .unwrap();
        HttpResponse {
            inner,
            max_body_size: limit,
        }
    }

    #[tokio::test]
    async fn test_json_success() {
        let value: serde_json::Value = response(StatusCode::OK, r#"{"a":1}"#, 1024)
            .json()
            .await
            .unwrap();
        assert_eq!(value["a"], 1);
    }

    #[tokio::test]
    async fn test_checked_bytes_error_keeps_preview() {
        let err = response(StatusCode::NOT_FOUND, r#"{"message":"gone"}"#, 1024)
            .checked_bytes()
            .await
            .unwrap_err();
        match err {
            HttpError::HttpStatus {
                status,
                body_preview,
                content_type,
            } => {
                assert_eq!(status, StatusCode::NOT_FOUND);
                assert!(body_preview.contains("gone"));
                assert_eq!(content_type.as_deref(), Some("application/json"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_body_limit_enforced() {
        let result = response(StatusCode::OK, "0123456789", 4).bytes().await;
        assert!(matches!(
            result,
            Err(HttpError::BodyTooLarge { limit: 4, .. })
        ));
    }

    #[tokio::test]
    async fn test_error_for_status_does_not_read_body() {
        let resp = response(StatusCode::OK, "{}", 16).error_for_status().unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(
            response(StatusCode::UNAUTHORIZED, "{}", 16)
                .error_for_status()
                .is_err()
        );
    }
}
