//! Request tracking middleware.
//!
//! [`MetricsLayer`] wraps the router and, for every request:
//!
//! - takes `X-Request-ID` from the request or generates a UUID v7
//! - opens a `request` span carrying the ID, method and path
//! - records `http_requests_total` and `http_request_duration_seconds`
//! - echoes the ID back in the `X-Request-ID` response header
//!
//! Because the rides endpoints answer errors with 200, the status bucket
//! alone says little; `rides_request_failed_total` covers that side.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;

use http::{HeaderMap, HeaderName, HeaderValue, Request, Response};
use pin_project_lite::pin_project;
use tower::{Layer, Service};
use tracing::{info_span, Span};
use uuid::Uuid;

pub static REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Correlation ID for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

impl RequestId {
    /// Generate a time-sortable UUID v7 ID.
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RequestId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Use the caller's `X-Request-ID` when it is present and printable,
/// otherwise generate a new one.
pub fn extract_or_generate_request_id(headers: &HeaderMap) -> RequestId {
    headers
        .get(&REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(RequestId::from)
        .unwrap_or_else(RequestId::generate)
}

/// Path label for metrics.
///
/// Ride lookups collapse to `/rides/:id` so arbitrary identifiers cannot
/// blow up label cardinality.
pub fn metric_path(path: &str) -> &'static str {
    let path = path.split('?').next().unwrap_or(path);
    match path.trim_end_matches('/') {
        "" => "/",
        "/rides" => "/rides",
        p if p.starts_with("/rides/") => "/rides/:id",
        "/health" => "/health",
        "/health/live" => "/health/live",
        "/health/ready" => "/health/ready",
        "/metrics" => "/metrics",
        p if p.starts_with("/documentation") || p.starts_with("/api-docs") => "/documentation",
        _ => "other",
    }
}

fn status_bucket(status: u16) -> &'static str {
    match status {
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        500..=599 => "5xx",
        _ => "other",
    }
}

/// Tower layer for request IDs, request spans and HTTP metrics.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsLayer;

impl<S> Layer<S> for MetricsLayer {
    type Service = MetricsMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MetricsMiddleware { inner }
    }
}

#[derive(Debug, Clone)]
pub struct MetricsMiddleware<S> {
    inner: S,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for MetricsMiddleware<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send,
    ReqBody: http_body::Body + Send + 'static,
    ResBody: http_body::Body + Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = MetricsFuture<S::Future>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<ReqBody>) -> Self::Future {
        let start = Instant::now();
        let method = req.method().to_string();
        let path = metric_path(req.uri().path());

        let request_id = extract_or_generate_request_id(req.headers());
        req.extensions_mut().insert(request_id.clone());

        let span = info_span!(
            "request",
            request_id = %request_id,
            method = %method,
            path = path,
        );
        span.in_scope(|| tracing::debug!("handling request"));

        MetricsFuture {
            inner: self.inner.call(req),
            start,
            method,
            path,
            request_id,
            span,
        }
    }
}

pin_project! {
    /// Future that records metrics and stamps the request ID on completion.
    pub struct MetricsFuture<F> {
        #[pin]
        inner: F,
        start: Instant,
        method: String,
        path: &'static str,
        request_id: RequestId,
        span: Span,
    }
}

impl<F, ResBody, E> Future for MetricsFuture<F>
where
    F: Future<Output = Result<Response<ResBody>, E>>,
    ResBody: http_body::Body,
{
    type Output = F::Output;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let _enter = this.span.enter();

        let mut result = match this.inner.poll(cx) {
            Poll::Pending => return Poll::Pending,
            Poll::Ready(result) => result,
        };

        let duration_secs = this.start.elapsed().as_secs_f64();
        let status = match &mut result {
            Ok(response) => {
                if let Ok(value) = HeaderValue::from_str(this.request_id.as_str()) {
                    response.headers_mut().insert(REQUEST_ID_HEADER.clone(), value);
                }
                let status = response.status().as_u16();
                tracing::info!(status, latency_ms = duration_secs * 1000.0, "request completed");
                status_bucket(status)
            }
            Err(_) => {
                tracing::error!(latency_ms = duration_secs * 1000.0, "request failed");
                "5xx"
            }
        };

        metrics::counter!(
            "http_requests_total",
            "method" => this.method.clone(),
            "path" => *this.path,
            "status" => status
        )
        .increment(1);
        metrics::histogram!(
            "http_request_duration_seconds",
            "method" => this.method.clone(),
            "path" => *this.path
        )
        .record(duration_secs);

        Poll::Ready(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use std::convert::Infallible;
    use tower::{service_fn, ServiceExt};

    #[test]
    fn test_request_id_generate_is_unique_uuid() {
        let id1 = RequestId::generate();
        let id2 = RequestId::generate();
        assert_ne!(id1, id2);
        assert!(Uuid::parse_str(id1.as_str()).is_ok());
    }

    #[test]
    fn test_extract_request_id_from_header() {
        let mut headers = HeaderMap::new();
        headers.insert("X-Request-ID", HeaderValue::from_static("trip-42"));
        assert_eq!(extract_or_generate_request_id(&headers).as_str(), "trip-42");
    }

    #[test]
    fn test_extract_request_id_generates_when_blank() {
        let mut headers = HeaderMap::new();
        headers.insert("x-request-id", HeaderValue::from_static("  "));
        assert_eq!(extract_or_generate_request_id(&headers).as_str().len(), 36);
    }

    #[test]
    fn test_metric_path_collapses_ride_ids() {
        assert_eq!(metric_path("/rides"), "/rides");
        assert_eq!(metric_path("/rides?page=2&limit=5"), "/rides");
        assert_eq!(metric_path("/rides/17"), "/rides/:id");
        assert_eq!(metric_path("/rides/1'%20OR%201=1"), "/rides/:id");
        assert_eq!(metric_path("/health/"), "/health");
        assert_eq!(metric_path("/documentation/index.html"), "/documentation");
        assert_eq!(metric_path("/wp-login.php"), "other");
    }

    #[test]
    fn test_status_bucket() {
        assert_eq!(status_bucket(200), "2xx");
        assert_eq!(status_bucket(301), "3xx");
        assert_eq!(status_bucket(404), "4xx");
        assert_eq!(status_bucket(503), "5xx");
        assert_eq!(status_bucket(99), "other");
    }

    #[tokio::test]
    async fn test_layer_echoes_request_id() {
        let service = MetricsLayer.layer(service_fn(|req: Request<Body>| async move {
            assert!(req.extensions().get::<RequestId>().is_some());
            Ok::<_, Infallible>(Response::new(Body::empty()))
        }));

        let request = Request::builder()
            .uri("/rides/3")
            .header("x-request-id", "abc-123")
            .body(Body::empty())
            .unwrap();
        let response = service.oneshot(request).await.unwrap();

        assert_eq!(response.headers()[&REQUEST_ID_HEADER], "abc-123");
    }
}
