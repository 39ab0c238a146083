use axum::{Json, extract::State};
use std::sync::Arc;

use super::types::SystemStatus;
use super::{ApiResponse, AppState};

/// GET /system/status
pub async fn get_status(State(state): State<Arc<AppState>>) -> Json<ApiResponse<SystemStatus>> {
    let database_ok = state.shared.store.ping().await.is_ok();

    Json(ApiResponse::success(SystemStatus {
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime: state.start_time.elapsed().as_secs(),
        database_ok,
    }))
}
