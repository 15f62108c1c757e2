//! Admin authentication: credential login, session tokens, and the bearer
//! middleware guarding `/api/admin`.
//!
//! Credentials are compared in constant time to mitigate timing attacks.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;

use crate::api::AppJson;
use crate::db::Repository;
use crate::errors::{AppError, ErrorResponse};
use crate::models::LoginRequest;
use crate::AppState;

/// Login response; the dashboard reads `token` at the top level.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub success: bool,
    pub token: String,
    pub expires_in_hours: i64,
}

/// POST /api/admin/login - Exchange admin credentials for a session token.
pub async fn login(
    State(state): State<AppState>,
    AppJson(request): AppJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let (Some(email), Some(password)) = (&state.config.admin_email, &state.config.admin_password)
    else {
        tracing::warn!("Admin login attempted but no admin credentials are configured");
        return Err(AppError::Unauthorized("Admin login is disabled".to_string()));
    };

    let email_ok = constant_time_compare(
        &request.email.trim().to_lowercase(),
        &email.trim().to_lowercase(),
    );
    let password_ok = constant_time_compare(&request.password, password);

    // Evaluate both comparisons regardless of the first result
    if !(email_ok & password_ok) {
        tracing::warn!("Rejected admin login for {}", request.email.trim());
        return Err(AppError::Unauthorized("Invalid email or password".to_string()));
    }

    let ttl = state.config.session_ttl_hours;
    let token = state.repo.create_session(email, ttl).await?;
    tracing::info!("Admin session opened for {}", email);

    Ok(Json(LoginResponse {
        success: true,
        token,
        expires_in_hours: ttl,
    }))
}

/// POST /api/admin/logout - Close the presented session.
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, AppError> {
    if let Some(token) = bearer_token(&headers) {
        state.repo.delete_session(&token).await?;
    }
    Ok(Json(serde_json::json!({ "success": true })))
}

/// Session authentication layer; takes the repository holding sessions.
pub async fn session_auth_layer(repo: Arc<Repository>, request: Request, next: Next) -> Response {
    let Some(token) = bearer_token(request.headers()) else {
        return unauthorized_response("Missing session token");
    };

    match repo.session_valid(&token).await {
        Ok(true) => next.run(request).await,
        Ok(false) => unauthorized_response("Session expired or invalid"),
        Err(e) => e.into_response(),
    }
}

/// Token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Perform constant-time string comparison.
fn constant_time_compare(a: &str, b: &str) -> bool {
    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    a_bytes.ct_eq(b_bytes).into()
}

/// Create an unauthorized response.
fn unauthorized_response(message: &str) -> Response {
    let body = ErrorResponse::new(&AppError::Unauthorized(message.to_string()));
    (StatusCode::UNAUTHORIZED, Json(body)).into_response()
}
