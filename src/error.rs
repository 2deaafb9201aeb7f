use std::fmt::Display;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use opentelemetry::trace::TraceContextExt;
use thiserror::Error;
use tracing::Span;
use tracing_opentelemetry::OpenTelemetrySpanExt;

use crate::models::ApiResponse;

/// Failures of the provider/prompt/parser core.
///
/// The variants keep configuration problems, vendor failures, formatting
/// violations and structural violations apart so the caller can tell "the
/// vendor is down" from "the vendor ignored the instructions".
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Unknown provider: {name}. Supported providers: {supported}")]
    UnknownProvider { name: String, supported: String },

    #[error("Configuration error: {0}")]
    MissingCredential(String),

    #[error("{provider} generation failed: {message}")]
    Generation { provider: String, message: String },

    #[error("Invalid JSON response from LLM: {0}")]
    InvalidResponseFormat(String),

    #[error("Invalid response structure: {0}")]
    MalformedResponse(String),
}

impl LlmError {
    pub fn generation(provider: &str, err: impl Display) -> Self {
        LlmError::Generation {
            provider: provider.to_string(),
            message: err.to_string(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        LlmError::MalformedResponse(message.into())
    }

    /// Short label used for the `error.type` span attribute and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            LlmError::UnknownProvider { .. } => "unknown_provider",
            LlmError::MissingCredential(_) => "configuration_error",
            LlmError::Generation { message, .. } => classify_generation_error(message),
            LlmError::InvalidResponseFormat(_) => "format_error",
            LlmError::MalformedResponse(_) => "malformed_response",
        }
    }
}

fn classify_generation_error(message: &str) -> &'static str {
    let msg = message.to_lowercase();
    if msg.contains("rate limit") || msg.contains("429") {
        "rate_limit"
    } else if msg.contains("timeout") || msg.contains("timed out") || msg.contains("deadline") {
        "timeout"
    } else if msg.contains("401")
        || msg.contains("403")
        || msg.contains("auth")
        || msg.contains("api key")
    {
        "auth_error"
    } else if msg.contains("400") || msg.contains("422") || msg.contains("invalid") {
        "invalid_request"
    } else if msg.contains("500")
        || msg.contains("502")
        || msg.contains("503")
        || msg.contains("server")
    {
        "server_error"
    } else if msg.contains("connect")
        || msg.contains("dns")
        || msg.contains("network")
        || msg.contains("reset")
    {
        "network_error"
    } else {
        "unknown_error"
    }
}

/// Errors raised by the HTTP surface before a generation service runs.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::Configuration(_) => "CONFIGURATION_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Configuration(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

pub(crate) fn current_trace_id() -> Option<String> {
    let span = Span::current();
    let context = span.context();
    let span_ref = context.span();
    let span_context = span_ref.span_context();

    if span_context.is_valid() {
        Some(span_context.trace_id().to_string())
    } else {
        None
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::Validation(msg) => {
                tracing::warn!(error = %msg, "Request validation failed");
                msg.clone()
            }
            AppError::Unauthorized(msg) => {
                tracing::warn!(error = %msg, "Unauthorized request");
                msg.clone()
            }
            AppError::Configuration(msg) => {
                tracing::error!(error = %msg, "Configuration error");
                "Server authentication not configured".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                "An internal error occurred".to_string()
            }
        };

        let body = ApiResponse::<()>::failure(self.code(), message, None);
        (status, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
