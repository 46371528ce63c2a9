use crate::error::HttpError;
use http::header::{ACCEPT, HeaderName, USER_AGENT};
use http::{HeaderValue, Request, Response};
use std::task::{Context, Poll};
use tower::{Layer, Service};

/// Tower layer that fills in default request headers.
///
/// Headers already present on the request are left untouched, so callers can
/// override `Accept` or `User-Agent` per request.
#[derive(Clone)]
pub struct DefaultHeadersLayer {
    headers: Vec<(HeaderName, HeaderValue)>,
}

impl DefaultHeadersLayer {
    /// Create a layer that injects `User-Agent` and, when given, `Accept`.
    ///
    /// # Errors
    /// Returns `HttpError::InvalidHeaderValue` if either value is not a valid header value
    pub fn try_new(user_agent: &str, accept: Option<&str>) -> Result<Self, HttpError> {
        let mut headers = vec![(USER_AGENT, HeaderValue::from_str(user_agent)?)];
        if let Some(accept) = accept {
            headers.push((ACCEPT, HeaderValue::from_str(accept)?));
        }
        Ok(Self { headers })
    }
}

impl<S> Layer<S> for DefaultHeadersLayer {
    type Service = DefaultHeadersService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        DefaultHeadersService {
            inner,
            headers: self.headers.clone(),
        }
    }
}

/// Service produced by [`DefaultHeadersLayer`]
#[derive(Clone)]
pub struct DefaultHeadersService<S> {
    inner: S,
    headers: Vec<(HeaderName, HeaderValue)>,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for DefaultHeadersService<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<ReqBody>) -> Self::Future {
        for (name, value) in &self.headers {
            if !req.headers().contains_key(name) {
                req.headers_mut().insert(name.clone(), value.clone());
            }
        }
        self.inner.call(req)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use bytes::Bytes;
    use http::{Method, StatusCode};
    use http_body_util::Full;
    use tower::ServiceExt;

    /// Echoes the request headers it saw back through the response.
    #[derive(Clone)]
    struct EchoHeaders;

    impl Service<Request<Full<Bytes>>> for EchoHeaders {
        type Response = Response<http::HeaderMap>;
        type Error = std::convert::Infallible;
        type Future = std::future::Ready<Result<Self::Response, Self::Error>>;

        fn poll_ready(&mut self, _: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
            Poll::Ready(Ok(()))
        }

        fn call(&mut self, req: Request<Full<Bytes>>) -> Self::Future {
            let mut resp = Response::new(req.headers().clone());
            *resp.status_mut() = StatusCode::OK;
            std::future::ready(Ok(resp))
        }
    }

    fn request(accept: Option<&str>) -> Request<Full<Bytes>> {
        let mut builder = Request::builder()
            .method(Method::GET)
            .uri("http://example.com");
        if let Some(accept) = accept {
            builder = builder.header(ACCEPT, accept);
        }
        builder.body(Full::new(Bytes::new())).unwrap()
    }

    #[tokio::test]
    async fn test_defaults_added() {
        let layer = DefaultHeadersLayer::try_new("atv/1.0", Some("application/json")).unwrap();
        let resp = layer.layer(EchoHeaders).oneshot(request(None)).await.unwrap();

        let headers = resp.into_body();
        assert_eq!(headers.get(USER_AGENT).unwrap(), "atv/1.0");
        assert_eq!(headers.get(ACCEPT).unwrap(), "application/json");
    }

    #[tokio::test]
    async fn test_caller_header_not_overwritten() {
        let layer = DefaultHeadersLayer::try_new("atv/1.0", Some("application/json")).unwrap();
        let resp = layer
            .layer(EchoHeaders)
            .oneshot(request(Some("text/html")))
            .await
            .unwrap();

        assert_eq!(resp.into_body().get(ACCEPT).unwrap(), "text/html");
    }

    #[test]
    fn test_invalid_user_agent_rejected() {
        assert!(DefaultHeadersLayer::try_new("bad\x00agent", None).is_err());
    }
}
