pub mod extract;
pub mod generation;
pub mod health;

use std::time::Duration;

use axum::{
    Router,
    http::{HeaderName, HeaderValue, StatusCode},
    middleware::from_fn,
    routing::{get, post},
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::AppState;
use crate::config::Config;
use crate::middleware::{HttpMakeSpan, HttpOnResponse, X_REQUEST_ID, api_headers};

/// Headroom over the LLM timeout so the vendor call fails first.
const REQUEST_TIMEOUT_HEADROOM: Duration = Duration::from_secs(30);

fn cors_layer(config: &Config) -> CorsLayer {
    let origin = if config.allows_any_origin() {
        AllowOrigin::from(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(%origin, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

pub fn create_router(state: AppState) -> Router {
    let request_id = HeaderName::from_static(X_REQUEST_ID);
    let timeout = state.config.llm.timeout + REQUEST_TIMEOUT_HEADROOM;
    let cors = cors_layer(&state.config);

    Router::new()
        .route("/", get(health::root))
        .route("/api/health", get(health::health))
        .route("/api/content/generate", post(generation::generate_content))
        .route("/api/product/generate", post(generation::generate_product))
        .route("/api/seo/optimize", post(generation::optimize_seo))
        .route("/api/image/analyze", post(generation::analyze_image))
        .route("/api/brand/train", post(generation::train_brand))
        .layer(from_fn(api_headers))
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(HttpMakeSpan)
                .on_response(HttpOnResponse),
        )
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        ))
        .layer(cors)
        .with_state(state)
}
