//! HTTP middleware for the gateway service.
//!
//! - [`RequestId`]: correlation ID taken from `X-Request-ID` or generated (UUID v7)
//! - [`MetricsLayer`]: per-request span, HTTP metrics and request ID echo
//!
//! The layer stores the [`RequestId`] in the request extensions so handlers can
//! log it, and copies it to the `x-request-id` response header.
//!
//! Recorded metrics:
//! - `http_requests_total`: counter by method, endpoint, status bucket
//! - `http_request_duration_seconds`: histogram by method, endpoint

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;

use axum::http::{HeaderMap, HeaderValue, Request, Response};
use pin_project_lite::pin_project;
use quantaroute_lib::OPERATIONS;
use tower::{Layer, Service};
use tracing::{info_span, Span};
use uuid::Uuid;

/// Header carrying the correlation ID in both directions.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

impl RequestId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a new time-sortable UUID v7 request ID.
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

/// Take a non-empty `X-Request-ID` header or generate a new ID.
pub fn extract_or_generate_request_id(headers: &HeaderMap) -> RequestId {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.trim().is_empty())
        .map(RequestId::new)
        .unwrap_or_else(RequestId::generate)
}

/// Bounded metric label for a request path.
///
/// Known `/api/<endpoint>` paths keep their endpoint, any other `/api` path
/// collapses to `/api/unknown`, and paths outside the API collapse to `other`
/// unless they are one of the service's own routes.
pub fn endpoint_label(path: &str) -> String {
    let path = path.split('?').next().unwrap_or(path);

    match path.strip_prefix("/api") {
        Some("") | Some("/") => "/api".to_string(),
        Some(rest) if rest.starts_with('/') => {
            let segment = rest.trim_start_matches('/').split('/').next().unwrap_or("");
            if OPERATIONS.iter().any(|spec| spec.endpoint == segment) {
                format!("/api/{}", segment)
            } else {
                "/api/unknown".to_string()
            }
        }
        _ => match path {
            "/metrics" | "/health/live" | "/health/ready" => path.to_string(),
            _ => "other".to_string(),
        },
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

#[derive(Debug, Clone)]
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
        let endpoint = endpoint_label(req.uri().path());

        let request_id = extract_or_generate_request_id(req.headers());
        req.extensions_mut().insert(request_id.clone());

        let span = info_span!(
            "request",
            request_id = %request_id,
            method = %method,
            endpoint = %endpoint,
        );
        {
            let _enter = span.enter();
            tracing::debug!("handling request");
        }

        let future = self.inner.call(req);

        MetricsFuture {
            inner: future,
            start,
            method,
            endpoint,
            request_id,
            span,
        }
    }
}

pin_project! {
    /// Future wrapper that records metrics on completion.
    pub struct MetricsFuture<F> {
        #[pin]
        inner: F,
        start: Instant,
        method: String,
        endpoint: String,
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

        let duration_secs = this.start.elapsed().as_secs_f64();
        let status_label = match &result {
            Ok(response) => status_bucket(response.status().as_u16()),
            Err(_) => "5xx",
        };

        metrics::counter!(
            "http_requests_total",
            "method" => this.method.clone(),
            "endpoint" => this.endpoint.clone(),
            "status" => status_label
        )
        .increment(1);
        metrics::histogram!(
            "http_request_duration_seconds",
            "method" => this.method.clone(),
            "endpoint" => this.endpoint.clone()
        )
        .record(duration_secs);

        match result {
            Ok(mut response) => {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = duration_secs * 1000.0,
                    "request completed"
                );
                if let Ok(value) = HeaderValue::from_str(this.request_id.as_str()) {
                    response.headers_mut().insert(REQUEST_ID_HEADER, value);
                }
                Poll::Ready(Ok(response))
            }
            Err(e) => {
                tracing::error!(latency_ms = duration_secs * 1000.0, "request failed");
                Poll::Ready(Err(e))
            }
        }
    }
}
