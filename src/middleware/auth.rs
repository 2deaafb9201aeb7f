use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::{AppState, error::AppError};

/// Proof that the request carried the shared `APP_SECRET` as a bearer token.
pub struct BearerAuth;

impl FromRequestParts<AppState> for BearerAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_token(parts)?;
        verify_token(token, state.config.app_secret.as_deref())?;
        tracing::debug!("Token verified");
        Ok(BearerAuth)
    }
}

fn extract_token(parts: &Parts) -> Result<&str, AppError> {
    let auth_header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".to_string()))?;

    auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("Invalid Authorization header format".to_string()))
}

fn verify_token(token: &str, secret: Option<&str>) -> Result<(), AppError> {
    let secret = secret
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::Configuration("APP_SECRET not configured".to_string()))?;

    if token != secret {
        return Err(AppError::Unauthorized(
            "Invalid authentication token".to_string(),
        ));
    }
    Ok(())
}
