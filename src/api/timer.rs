use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::auth::require_user;
use super::{ApiError, ApiResponse, AppState};
use crate::services::TimerStatus;

#[derive(Deserialize)]
pub struct SetEnabledRequest {
    pub enabled: bool,
}

#[derive(Deserialize)]
pub struct BlockRequest {
    pub minutes: u64,
}

#[derive(Serialize)]
pub struct ClearResponse {
    pub cleared: bool,
}

/// GET /timer
/// Status poll; readable without a session so the UI can show the
/// cooldown on the lock screen.
pub async fn get_status(
    State(state): State<Arc<AppState>>,
) -> Json<ApiResponse<TimerStatus>> {
    Json(ApiResponse::success(
        state.shared.access_service.timer_status().await,
    ))
}

/// PUT /timer/enabled (admin)
pub async fn set_enabled(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SetEnabledRequest>,
) -> Result<Json<ApiResponse<TimerStatus>>, ApiError> {
    require_user(&state).await?;

    state
        .shared
        .access_service
        .set_timer_enabled(payload.enabled)
        .await?;

    Ok(Json(ApiResponse::success(
        state.shared.access_service.timer_status().await,
    )))
}

/// POST /timer/block (admin or seller)
pub async fn block(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<BlockRequest>,
) -> Result<Json<ApiResponse<TimerStatus>>, ApiError> {
    require_user(&state).await?;

    state.shared.access_service.block_for(payload.minutes).await?;

    Ok(Json(ApiResponse::success(
        state.shared.access_service.timer_status().await,
    )))
}

/// POST /timer/clear (admin)
pub async fn clear(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<ClearResponse>>, ApiError> {
    require_user(&state).await?;

    let cleared = state.shared.access_service.clear_block().await?;
    Ok(Json(ApiResponse::success(ClearResponse { cleared })))
}
