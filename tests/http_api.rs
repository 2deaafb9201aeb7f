use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use tower::ServiceExt;

use content_gateway::llm::LlmSettings;
use content_gateway::middleware::RouteLabel;
use content_gateway::{AppState, Config, routes};

const SECRET: &str = "test-secret";

fn config(app_secret: Option<&str>) -> Config {
    Config {
        port: 0,
        environment: "test".to_string(),
        app_secret: app_secret.map(str::to_string),
        allowed_origins: vec!["*".to_string()],
        llm: LlmSettings::default(),
        otel_service_name: "content-gateway-test".to_string(),
        otel_exporter_endpoint: "http://localhost:4317".to_string(),
    }
}

fn app(app_secret: Option<&str>) -> Router {
    routes::create_router(AppState::new(config(app_secret)))
}

fn post(uri: &str, token: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn valid_content() -> String {
    json!({"topic": "Growing tomatoes on a balcony", "keywords": ["tomatoes"]}).to_string()
}

#[tokio::test]
async fn health_reports_provider_and_version() {
    let response = app(Some(SECRET))
        .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-process-time"));
    assert_eq!(
        response.headers()["x-api-version"],
        env!("CARGO_PKG_VERSION")
    );

    let body = json_body(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["provider"], "openai");
    assert_eq!(body["provider_status"], "unavailable");
}

#[tokio::test]
async fn health_reports_configured_provider() {
    let mut config = config(None);
    config.llm.openai_api_key = Some("sk-test".to_string());
    let response = routes::create_router(AppState::new(config))
        .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let body = json_body(response).await;
    assert_eq!(body["provider_status"], "configured");
}

#[tokio::test]
async fn responses_carry_matched_route_template() {
    let response = app(Some(SECRET))
        .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(
        response.extensions().get::<RouteLabel>(),
        Some(&RouteLabel("/api/health".to_string()))
    );

    let response = app(Some(SECRET))
        .oneshot(post("/api/brand/train", None, "{}"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.extensions().get::<RouteLabel>(),
        Some(&RouteLabel("/api/brand/train".to_string()))
    );
}

#[tokio::test]
async fn root_points_at_health() {
    let response = app(None)
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body["health"], "/api/health");
}

#[tokio::test]
async fn missing_token_is_unauthorized() {
    let response = app(Some(SECRET))
        .oneshot(post("/api/content/generate", None, &valid_content()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn wrong_token_is_unauthorized() {
    let response = app(Some(SECRET))
        .oneshot(post("/api/seo/optimize", Some("nope"), "{}"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unset_secret_is_configuration_error() {
    let response = app(None)
        .oneshot(post("/api/content/generate", Some("anything"), &valid_content()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "CONFIGURATION_ERROR");
    assert_eq!(body["error"]["message"], "Server authentication not configured");
}

#[tokio::test]
async fn invalid_request_is_validation_error() {
    let short_topic = json!({"topic": "abc"}).to_string();
    let response = app(Some(SECRET))
        .oneshot(post("/api/content/generate", Some(SECRET), &short_topic))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let too_few_samples = json!({"samples": [{"title": "a", "body": "b"}]}).to_string();
    let response = app(Some(SECRET))
        .oneshot(post("/api/brand/train", Some(SECRET), &too_few_samples))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn malformed_json_is_validation_error() {
    let response = app(Some(SECRET))
        .oneshot(post("/api/image/analyze", Some(SECRET), "{not json"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn provider_misconfiguration_becomes_failure_envelope() {
    let response = app(Some(SECRET))
        .oneshot(post("/api/content/generate", Some(SECRET), &valid_content()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    assert!(body["data"].is_null());
    assert_eq!(body["error"]["code"], "GENERATION_FAILED");
    let message = body["error"]["message"].as_str().unwrap();
    assert!(message.starts_with("Failed to generate content"));
    assert!(message.contains("OPENAI_API_KEY"));
    assert_eq!(body["metadata"]["model"], "");
    assert_eq!(body["metadata"]["tokens_used"], 0);
    assert_eq!(body["metadata"]["cached"], false);
}

#[tokio::test]
async fn failure_codes_follow_use_case() {
    let cases = [
        (
            "/api/seo/optimize",
            json!({"content_html": "<p>Hi</p>"}),
            "OPTIMIZATION_FAILED",
        ),
        (
            "/api/image/analyze",
            json!({"image_url": "https://cdn.example.com/a.png"}),
            "ANALYSIS_FAILED",
        ),
        (
            "/api/product/generate",
            json!({"name": "Kettle", "category": "Kitchen"}),
            "GENERATION_FAILED",
        ),
    ];

    for (uri, body, code) in cases {
        let response = app(Some(SECRET))
            .oneshot(post(uri, Some(SECRET), &body.to_string()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], code, "{uri}");
    }
}
