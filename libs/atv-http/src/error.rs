use std::time::Duration;
use thiserror::Error;

/// What is wrong with a request URL
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum UrlProblem {
    #[error("malformed: {0}")]
    Malformed(String),

    #[error("no host")]
    NoHost,

    #[error("no scheme")]
    NoScheme,

    /// `http://` while the transport only allows TLS
    #[error("plain http is disabled; use https or allow insecure http")]
    InsecureScheme,

    #[error("unsupported scheme '{0}'")]
    UnsupportedScheme(String),
}

/// Transport-level failures
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum HttpError {
    #[error("invalid URL '{url}': {problem}")]
    InvalidUrl { url: String, problem: UrlProblem },

    #[error("failed to build request: {0}")]
    RequestBuild(#[from] http::Error),

    #[error("invalid header name: {0}")]
    InvalidHeaderName(#[from] http::header::InvalidHeaderName),

    #[error("invalid header value: {0}")]
    InvalidHeaderValue(#[from] http::header::InvalidHeaderValue),

    #[error("JSON body could not be encoded or decoded: {0}")]
    Json(#[from] serde_json::Error),

    #[error("query could not be encoded: {0}")]
    UrlEncode(#[from] serde_urlencoded::ser::Error),

    #[error("no response within {0:?}")]
    Timeout(Duration),

    /// Connection refused, reset, DNS failure and the like
    #[error("connection failed: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("TLS setup failed: {0}")]
    Tls(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("response body exceeds {limit} bytes (read {actual})")]
    BodyTooLarge { limit: usize, actual: usize },

    /// Non-2xx status from [`checked_bytes`](crate::HttpResponse::checked_bytes)
    /// and friends; the preview is capped.
    #[error("HTTP {status}: {body_preview}")]
    HttpStatus {
        status: http::StatusCode,
        body_preview: String,
        content_type: Option<String>,
    },
}

impl HttpError {
    pub(crate) fn invalid_url(url: impl Into<String>, problem: UrlProblem) -> Self {
        HttpError::InvalidUrl {
            url: url.into(),
            problem,
        }
    }

    #[must_use]
    pub fn status(&self) -> Option<http::StatusCode> {
        if let HttpError::HttpStatus { status, .. } = self {
            Some(*status)
        } else {
            None
        }
    }

    /// No response arrived at all; the request layer reports these as
    /// network errors.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            HttpError::Transport(_) | HttpError::Tls(_) | HttpError::Timeout(_)
        )
    }
}

impl From<hyper::Error> for HttpError {
    fn from(err: hyper::Error) -> Self {
        HttpError::Transport(Box::new(err))
    }
}

impl From<hyper_util::client::legacy::Error> for HttpError {
    fn from(err: hyper_util::client::legacy::Error) -> Self {
        HttpError::Transport(Box::new(err))
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_transport_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = HttpError::Transport(Box::new(io));

        let source = err.source().unwrap().downcast_ref::<std::io::Error>().unwrap();
        assert_eq!(source.kind(), std::io::ErrorKind::ConnectionRefused);
        assert!(err.is_transport());
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_status_error() {
        let err = HttpError::HttpStatus {
            status: http::StatusCode::UNPROCESSABLE_ENTITY,
            body_preview: "{}".to_owned(),
            content_type: Some("application/json".to_owned()),
        };
        assert_eq!(err.status(), Some(http::StatusCode::UNPROCESSABLE_ENTITY));
        assert!(!err.is_transport());
    }

    #[test]
    fn test_url_problem_message() {
        let err = HttpError::invalid_url("http://api.local/atvs", UrlProblem::InsecureScheme);
        assert_eq!(
            err.to_string(),
            "invalid URL 'http://api.local/atvs': plain http is disabled; use https or allow insecure http"
        );
    }
}
