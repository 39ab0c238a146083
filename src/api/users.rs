use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::auth::require_user;
use super::types::MessageResponse;
use super::{ApiError, ApiResponse, AppState};
use crate::domain::Role;
use crate::services::UserInfo;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub role: Role,
}

#[derive(Deserialize)]
pub struct ChangePasswordRequest {
    pub new_password: String,
}

#[derive(Deserialize)]
pub struct SetActiveRequest {
    pub active: bool,
}

/// POST /users (admin)
pub async fn register_user(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<ApiResponse<UserInfo>>, ApiError> {
    let actor = require_user(&state).await?;

    let user = state
        .shared
        .user_admin_service
        .register_user(
            actor.role,
            actor.id,
            &payload.username,
            &payload.password,
            payload.role,
        )
        .await?;

    Ok(Json(ApiResponse::success(user)))
}

/// GET /users/{id} (admin)
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i32>,
) -> Result<Json<ApiResponse<UserInfo>>, ApiError> {
    let actor = require_user(&state).await?;

    let user = state
        .shared
        .user_admin_service
        .get_user(actor.role, user_id)
        .await?;

    Ok(Json(ApiResponse::success(user)))
}

/// DELETE /users/{id} (admin; technician and last-admin protected)
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i32>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let actor = require_user(&state).await?;

    state
        .shared
        .user_admin_service
        .delete_user(actor.role, actor.id, user_id)
        .await?;

    Ok(Json(ApiResponse::success(MessageResponse {
        message: "User deleted".to_string(),
    })))
}

/// PUT /users/{id}/password (admin or self; never technician)
pub async fn change_password(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i32>,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let actor = require_user(&state).await?;

    state
        .shared
        .user_admin_service
        .change_password(actor.role, actor.id, user_id, &payload.new_password)
        .await?;

    Ok(Json(ApiResponse::success(MessageResponse {
        message: "Password changed".to_string(),
    })))
}

/// PUT /users/{id}/active (admin)
pub async fn set_active(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i32>,
    Json(payload): Json<SetActiveRequest>,
) -> Result<Json<ApiResponse<UserInfo>>, ApiError> {
    let actor = require_user(&state).await?;

    let user = state
        .shared
        .user_admin_service
        .set_active(actor.role, actor.id, user_id, payload.active)
        .await?;

    Ok(Json(ApiResponse::success(user)))
}
