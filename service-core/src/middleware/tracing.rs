use crate::observability::{extract_parent_context, extract_traceparent};
use axum::http::HeaderValue;
use axum::{extract::Request, middleware::Next, response::Response};
use tracing_opentelemetry::OpenTelemetrySpanExt;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Span for one HTTP request, for `TraceLayer::make_span_with`.
///
/// A caller's `traceparent` becomes the span's parent, so server spans join
/// the caller's trace when OTLP export is enabled.
pub fn make_request_span(request: &Request) -> ::tracing::Span {
    let span = ::tracing::info_span!(
        "http_request",
        method = %request.method(),
        uri = %request.uri(),
        traceparent = ::tracing::field::Empty,
    );

    if let Some(traceparent) = extract_traceparent(request.headers()) {
        span.record("traceparent", traceparent.as_str());
        span.set_parent(extract_parent_context(request.headers()));
    }

    span
}

/// Echo the caller's `x-request-id`, or mint one, on both request and response.
pub async fn request_id_middleware(mut req: Request, next: Next) -> Response {
    let request_id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    if let Ok(header_value) = HeaderValue::from_str(&request_id) {
        req.headers_mut().insert(REQUEST_ID_HEADER, header_value);
    }

    let mut response = next.run(req).await;

    if let Ok(header_value) = HeaderValue::from_str(&request_id) {
        response
            .headers_mut()
            .insert(REQUEST_ID_HEADER, header_value);
    }

    response
}
