use std::time::Duration;

use axum::extract::MatchedPath;
use axum::http::{Request, Response};
use opentelemetry::KeyValue;
use tower_http::trace::{MakeSpan, OnResponse};
use tracing::Span;

use crate::telemetry::{HTTP_REQUEST_DURATION, HTTP_REQUESTS_TOTAL};

pub const X_REQUEST_ID: &str = "x-request-id";

/// Route label for requests that matched no route, so metric cardinality
/// stays bounded.
pub const UNMATCHED_ROUTE: &str = "unmatched";

/// Matched route template, carried on the response so [`HttpOnResponse`]
/// can label metrics with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteLabel(pub String);

impl RouteLabel {
    pub fn of<B>(request: &Request<B>) -> Self {
        let route = request
            .extensions()
            .get::<MatchedPath>()
            .map(MatchedPath::as_str)
            .unwrap_or(UNMATCHED_ROUTE);
        Self(route.to_string())
    }
}

#[derive(Clone)]
pub struct HttpMakeSpan;

impl<B> MakeSpan<B> for HttpMakeSpan {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        let method = request.method().as_str();
        let uri = request.uri();
        let path = uri.path();

        let route = request
            .extensions()
            .get::<MatchedPath>()
            .map(MatchedPath::as_str)
            .unwrap_or(path);

        let request_id = request
            .headers()
            .get(X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");

        tracing::info_span!(
            "HTTP request",
            otel.name = %format!("{} {}", method, route),
            http.method = %method,
            http.route = %route,
            http.target = %uri,
            http.scheme = "http",
            http.flavor = ?request.version(),
            http.user_agent = request.headers()
                .get("user-agent")
                .and_then(|v| v.to_str().ok())
                .unwrap_or(""),
            http.request_id = %request_id,
            http.response.status_code = tracing::field::Empty,
            otel.status_code = tracing::field::Empty,
        )
    }
}

#[derive(Clone)]
pub struct HttpOnResponse;

impl<B> OnResponse<B> for HttpOnResponse {
    fn on_response(self, response: &Response<B>, latency: Duration, span: &Span) {
        let status = response.status().as_u16();

        span.record("http.response.status_code", status as i64);

        if status >= 500 {
            span.record("otel.status_code", "ERROR");
        } else {
            span.record("otel.status_code", "OK");
        }

        let latency_ms = latency.as_secs_f64() * 1000.0;
        let route = response
            .extensions()
            .get::<RouteLabel>()
            .map(|label| label.0.as_str())
            .unwrap_or(UNMATCHED_ROUTE);

        let attrs = [
            KeyValue::new("http.route", route.to_string()),
            KeyValue::new("http.status_code", status.to_string()),
            KeyValue::new("http.status_class", format!("{}xx", status / 100)),
        ];
        HTTP_REQUESTS_TOTAL.add(1, &attrs);
        HTTP_REQUEST_DURATION.record(latency_ms, &attrs);

        tracing::info!(
            http.route = route,
            http.response.status_code = status,
            latency_ms = latency_ms,
            "Request finished"
        );
    }
}
