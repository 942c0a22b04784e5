use axum::extract::Request;
use axum::http::{HeaderName, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;
use std::time::Instant;
use tracing::info;

/// Response header carrying the handling time in milliseconds.
pub static REQUEST_MILLISECONDS: HeaderName = HeaderName::from_static("x-request-milliseconds");

/// Logs how long each request took and reports it in a response header.
pub async fn request_timing(request: Request, next: Next) -> Response {
    let started = Instant::now();
    let mut response = next.run(request).await;
    let elapsed_ms = started.elapsed().as_secs_f64() * 1_000.0;

    info!(elapsed_ms, "Request took {}ms", elapsed_ms as u64);
    if let Ok(value) = HeaderValue::from_str(&format!("{elapsed_ms:.3}")) {
        response
            .headers_mut()
            .insert(REQUEST_MILLISECONDS.clone(), value);
    }
    response
}
