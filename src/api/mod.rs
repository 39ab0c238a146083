use axum::{
    Router,
    http::HeaderValue,
    routing::{delete, get, post, put},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::state::SharedState;

pub mod auth;
mod drawers;
mod error;
mod system;
mod timer;
mod types;
mod users;

pub use error::ApiError;
pub use types::*;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub start_time: std::time::Instant,
}

impl AppState {
    #[must_use]
    pub fn store(&self) -> &crate::db::Store {
        &self.shared.store
    }
}

pub async fn create_app_state(shared: Arc<SharedState>) -> Arc<AppState> {
    Arc::new(AppState {
        shared,
        start_time: std::time::Instant::now(),
    })
}

pub async fn create_app_state_from_config(config: Config) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(create_app_state(shared).await)
}

pub async fn router(state: Arc<AppState>) -> Router {
    let cors_origins = {
        let config = state.shared.config.read().await;
        config.server.cors_allowed_origins.clone()
    };

    let api_router = Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::get_current_user))
        .route("/drawers", get(drawers::list_drawers))
        .route("/drawers/{id}", get(drawers::get_drawer_state))
        .route("/drawers/{id}/state", put(drawers::set_drawer_state))
        .route("/drawers/{id}/history", get(drawers::get_drawer_history))
        .route("/timer", get(timer::get_status))
        .route("/timer/enabled", put(timer::set_enabled))
        .route("/timer/block", post(timer::block))
        .route("/timer/clear", post(timer::clear))
        .route("/users", post(users::register_user))
        .route("/users/{id}", get(users::get_user))
        .route("/users/{id}", delete(users::delete_user))
        .route("/users/{id}/password", put(users::change_password))
        .route("/users/{id}/active", put(users::set_active))
        .route("/system/status", get(system::get_status))
        .with_state(state);

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/api", api_router)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}
