use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState};
use crate::services::{AccessError, SessionUser};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub id: i32,
    pub username: String,
    pub role: String,
}

/// Login failure body. Carries enough structure for the UI to render a
/// precise message (kind + counters) without revealing which credential
/// field was wrong.
#[derive(Serialize)]
pub struct LoginFailure {
    pub success: bool,
    pub error: String,
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_attempts: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lock_seconds: Option<u64>,
}

// ============================================================================
// Helpers
// ============================================================================

/// Resolve the acting identity from the engine session and refresh its
/// inactivity deadline. Mutating routes call this first.
pub async fn require_user(state: &Arc<AppState>) -> Result<SessionUser, ApiError> {
    let user = state
        .shared
        .access_service
        .current_user()
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::Unauthorized("Not logged in".to_string()))?;

    state.shared.access_service.touch_activity().await;
    Ok(user)
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /auth/login
/// Authenticate with username and password, signing into the terminal session.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> impl IntoResponse {
    match state
        .shared
        .access_service
        .login(&payload.username, &payload.password)
        .await
    {
        Ok(user) => Json(ApiResponse::success(LoginResponse {
            id: user.id,
            username: user.username,
            role: user.role.to_string(),
        }))
        .into_response(),
        Err(err) => login_failure(&err).into_response(),
    }
}

fn login_failure(err: &AccessError) -> (StatusCode, Json<LoginFailure>) {
    let (status, kind, remaining_attempts, lock_seconds) = match err {
        AccessError::InvalidCredentials { remaining_attempts } => (
            StatusCode::UNAUTHORIZED,
            "invalid-credentials",
            Some(*remaining_attempts),
            None,
        ),
        AccessError::AccountLocked { remaining_seconds } => (
            StatusCode::LOCKED,
            "account-locked",
            None,
            Some(*remaining_seconds),
        ),
        AccessError::Validation(_) => (StatusCode::BAD_REQUEST, "validation", None, None),
        AccessError::Database(_) | AccessError::Internal(_) => {
            tracing::error!(error = %err, "Login failed on a backend error");
            (StatusCode::INTERNAL_SERVER_ERROR, "internal", None, None)
        }
        AccessError::SessionExpired | AccessError::InsufficientPermission { .. } => {
            (StatusCode::UNAUTHORIZED, "unauthorized", None, None)
        }
    };

    (
        status,
        Json(LoginFailure {
            success: false,
            error: err.to_string(),
            kind,
            remaining_attempts,
            lock_seconds,
        }),
    )
}

/// POST /auth/logout
/// Sign out the terminal session.
pub async fn logout(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    state.shared.access_service.logout().await?;
    Ok((StatusCode::OK, "Logged out"))
}

/// GET /auth/me
/// Current session user, observing lazy inactivity expiry.
pub async fn get_current_user(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    let user = require_user(&state).await?;

    Ok(Json(ApiResponse::success(LoginResponse {
        id: user.id,
        username: user.username,
        role: user.role.to_string(),
    })))
}
