use axum::{Json, extract::State};
use serde_json::{Value, json};

use crate::AppState;
use crate::llm;
use crate::middleware::API_VERSION;

pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let provider_status = match llm::check(&state.config.llm, None) {
        Ok(_) => "configured",
        Err(err) => {
            tracing::warn!(error = %err, "Configured provider cannot be resolved");
            "unavailable"
        }
    };

    Json(json!({
        "status": "healthy",
        "version": API_VERSION,
        "provider": state.config.llm.provider,
        "provider_status": provider_status,
        "uptime_seconds": state.started_at.elapsed().as_secs(),
    }))
}

pub async fn root() -> Json<Value> {
    Json(json!({
        "name": "Content Gateway API",
        "version": API_VERSION,
        "health": "/api/health",
    }))
}
