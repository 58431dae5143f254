//! HTTP middleware for Freightlane services.
//!
//! [`MetricsLayer`] wraps the router and, for every request:
//!
//! - takes `X-Request-ID` from the request or generates a UUID v7
//! - stores it as a [`RequestId`] request extension and echoes it on the response
//! - runs the handler inside a `request` span carrying the id
//! - records `http_requests_total`, `http_request_duration_seconds`,
//!   `http_request_size_bytes` and `http_response_size_bytes`

use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;

use axum::extract::FromRequestParts;
use axum::http::{request::Parts, HeaderMap, HeaderName, HeaderValue, Request, Response};
use pin_project_lite::pin_project;
use tower::{Layer, Service};
use tracing::{info_span, Span};
use uuid::Uuid;

/// Correlation header read from requests and set on responses.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request correlation id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

impl RequestId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Fresh time-sortable UUID v7.
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

/// Handlers can take `RequestId` directly. Outside [`MetricsLayer`] it falls
/// back to the header or a fresh id.
impl<S> FromRequestParts<S> for RequestId
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<RequestId>()
            .cloned()
            .unwrap_or_else(|| extract_or_generate_request_id(&parts.headers)))
    }
}

/// `X-Request-ID` when present and non-empty, otherwise a new UUID v7.
pub fn extract_or_generate_request_id(headers: &HeaderMap) -> RequestId {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(RequestId::from)
        .unwrap_or_else(RequestId::generate)
}

/// Strip the query string so metric labels stay low-cardinality.
pub fn normalize_path(path: &str) -> &str {
    path.split('?').next().unwrap_or(path)
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

fn content_length(headers: &HeaderMap) -> Option<f64> {
    headers
        .get(http::header::CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .parse()
        .ok()
}

// =============================================================================
// MetricsLayer
// =============================================================================

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
        let labels = RequestLabels {
            method: req.method().to_string(),
            path: normalize_path(req.uri().path()).to_string(),
        };

        if let Some(size) = content_length(req.headers()) {
            metrics::histogram!(
                "http_request_size_bytes",
                "method" => labels.method.clone(),
                "path" => labels.path.clone()
            )
            .record(size);
        }

        let request_id = extract_or_generate_request_id(req.headers());
        req.extensions_mut().insert(request_id.clone());

        let span = info_span!(
            "request",
            request_id = %request_id,
            method = %labels.method,
            path = %labels.path,
        );
        span.in_scope(|| tracing::debug!("handling request"));

        let inner = span.in_scope(|| self.inner.call(req));
        MetricsFuture {
            inner,
            start: Instant::now(),
            labels,
            request_id,
            span,
        }
    }
}

#[derive(Debug)]
struct RequestLabels {
    method: String,
    path: String,
}

impl RequestLabels {
    fn record(&self, status: &'static str, elapsed_secs: f64) {
        metrics::counter!(
            "http_requests_total",
            "method" => self.method.clone(),
            "path" => self.path.clone(),
            "status" => status
        )
        .increment(1);

        metrics::histogram!(
            "http_request_duration_seconds",
            "method" => self.method.clone(),
            "path" => self.path.clone()
        )
        .record(elapsed_secs);
    }
}

pin_project! {
    /// Records metrics and stamps the correlation header once the handler finishes.
    pub struct MetricsFuture<F> {
        #[pin]
        inner: F,
        start: Instant,
        labels: RequestLabels,
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

        let result = match this.inner.poll(cx) {
            Poll::Pending => return Poll::Pending,
            Poll::Ready(result) => result,
        };
        let elapsed = this.start.elapsed().as_secs_f64();

        let result = match result {
            Ok(mut response) => {
                let status = response.status().as_u16();
                this.labels.record(status_bucket(status), elapsed);

                if let Some(size) = content_length(response.headers()) {
                    metrics::histogram!(
                        "http_response_size_bytes",
                        "method" => this.labels.method.clone(),
                        "path" => this.labels.path.clone()
                    )
                    .record(size);
                }

                if let Ok(value) = HeaderValue::from_str(this.request_id.as_str()) {
                    response
                        .headers_mut()
                        .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
                }

                tracing::info!(status, latency_ms = elapsed * 1000.0, "request completed");
                Ok(response)
            }
            Err(err) => {
                this.labels.record("5xx", elapsed);
                tracing::error!(latency_ms = elapsed * 1000.0, "request failed");
                Err(err)
            }
        };

        Poll::Ready(result)
    }
}
