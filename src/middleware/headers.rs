use std::time::Instant;

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};

use super::trace::RouteLabel;

pub const API_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Stamps every response with its processing time in milliseconds and the
/// API version, and tags it with the matched route for HTTP metrics.
pub async fn api_headers(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let route = RouteLabel::of(&request);
    let mut response = next.run(request).await;
    response.extensions_mut().insert(route);
    let elapsed_ms = start.elapsed().as_millis() as u64;

    let headers = response.headers_mut();
    headers.insert("x-process-time", HeaderValue::from(elapsed_ms));
    headers.insert("x-api-version", HeaderValue::from_static(API_VERSION));
    response
}
