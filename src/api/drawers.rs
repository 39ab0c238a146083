use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::auth::require_user;
use super::{ApiError, ApiResponse, AppState};
use crate::db::{DrawerHistoryRow, DrawerRow};

#[derive(Serialize)]
pub struct DrawerStateResponse {
    pub drawer_id: String,
    pub is_open: bool,
}

#[derive(Deserialize)]
pub struct SetStateRequest {
    pub open: bool,
}

#[derive(Serialize)]
pub struct SetStateResponse {
    pub drawer_id: String,
    pub is_open: bool,
    pub no_change: bool,
    pub audit_recorded: bool,
}

#[derive(Deserialize)]
pub struct HistoryQuery {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_page_size")]
    pub page_size: u64,
}

const fn default_page() -> u64 {
    1
}

const fn default_page_size() -> u64 {
    20
}

#[derive(Serialize)]
pub struct HistoryResponse {
    pub items: Vec<DrawerHistoryRow>,
    pub total: u64,
}

/// GET /drawers
pub async fn list_drawers(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<DrawerRow>>>, ApiError> {
    require_user(&state).await?;

    let drawers = state.shared.drawer_service.list().await?;
    Ok(Json(ApiResponse::success(drawers)))
}

/// GET /drawers/{id}
pub async fn get_drawer_state(
    State(state): State<Arc<AppState>>,
    Path(drawer_id): Path<String>,
) -> Result<Json<ApiResponse<DrawerStateResponse>>, ApiError> {
    require_user(&state).await?;

    let is_open = state.shared.drawer_service.state(&drawer_id).await?;
    Ok(Json(ApiResponse::success(DrawerStateResponse {
        drawer_id,
        is_open,
    })))
}

/// PUT /drawers/{id}/state
/// Role-gated transition acting as the signed-in user.
pub async fn set_drawer_state(
    State(state): State<Arc<AppState>>,
    Path(drawer_id): Path<String>,
    Json(payload): Json<SetStateRequest>,
) -> Result<Json<ApiResponse<SetStateResponse>>, ApiError> {
    let user = require_user(&state).await?;

    let outcome = state
        .shared
        .drawer_service
        .set_state(&drawer_id, payload.open, user.role, user.id)
        .await?;

    Ok(Json(ApiResponse::success(SetStateResponse {
        drawer_id: outcome.drawer_id,
        is_open: outcome.is_open,
        no_change: outcome.no_change,
        audit_recorded: outcome.audit_recorded,
    })))
}

/// GET /drawers/{id}/history?page=&page_size=
pub async fn get_drawer_history(
    State(state): State<Arc<AppState>>,
    Path(drawer_id): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<ApiResponse<HistoryResponse>>, ApiError> {
    require_user(&state).await?;

    if query.page == 0 {
        return Err(ApiError::ValidationError("page starts at 1".to_string()));
    }

    let page = state
        .shared
        .drawer_service
        .history(&drawer_id, query.page, query.page_size.clamp(1, 200))
        .await?;

    Ok(Json(ApiResponse::success(HistoryResponse {
        items: page.items,
        total: page.total,
    })))
}
