use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;

use super::ApiResponse;
use crate::services::{AccessError, DrawerError, UserAdminError};

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),

    Unauthorized(String),

    Forbidden(String),

    /// Lockout or block-window rejection, with seconds until it lifts.
    Locked { message: String, remaining_seconds: u64 },

    ValidationError(String),

    Conflict(String),

    DatabaseError(String),

    InternalError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::Locked {
                message,
                remaining_seconds,
            } => write!(f, "{} ({}s remaining)", message, remaining_seconds),
            ApiError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            ApiError::Locked {
                message,
                remaining_seconds,
            } => (
                StatusCode::LOCKED,
                format!("{message} ({remaining_seconds}s remaining)"),
            ),
            ApiError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            ApiError::DatabaseError(msg) => {
                tracing::error!("Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A database error occurred".to_string(),
                )
            }
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = ApiResponse::<()>::error(error_message);
        (status, Json(body)).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::InternalError(err.to_string())
    }
}

impl From<AccessError> for ApiError {
    fn from(err: AccessError) -> Self {
        match err {
            AccessError::InvalidCredentials { .. } => {
                ApiError::Unauthorized("Invalid credentials".to_string())
            }
            AccessError::AccountLocked { remaining_seconds } => ApiError::Locked {
                message: "Account locked".to_string(),
                remaining_seconds,
            },
            AccessError::SessionExpired => {
                ApiError::Unauthorized("No active session".to_string())
            }
            AccessError::InsufficientPermission { .. } => ApiError::Forbidden(err.to_string()),
            AccessError::Validation(msg) => ApiError::ValidationError(msg),
            AccessError::Database(msg) => ApiError::DatabaseError(msg),
            AccessError::Internal(msg) => ApiError::InternalError(msg),
        }
    }
}

impl From<DrawerError> for ApiError {
    fn from(err: DrawerError) -> Self {
        match err {
            DrawerError::NotFound(id) => ApiError::NotFound(format!("Drawer {id} not found")),
            DrawerError::InsufficientPermission { .. } => ApiError::Forbidden(err.to_string()),
            DrawerError::Blocked { remaining_seconds } => ApiError::Locked {
                message: "Drawer operations suspended".to_string(),
                remaining_seconds,
            },
            DrawerError::Validation(msg) => ApiError::ValidationError(msg),
            DrawerError::Database(msg) => ApiError::DatabaseError(msg),
            DrawerError::Internal(msg) => ApiError::InternalError(msg),
        }
    }
}

impl From<UserAdminError> for ApiError {
    fn from(err: UserAdminError) -> Self {
        match err {
            UserAdminError::UserNotFound => ApiError::NotFound("User not found".to_string()),
            UserAdminError::UserAlreadyExists(name) => {
                ApiError::Conflict(format!("Username already taken: {name}"))
            }
            UserAdminError::InsufficientPermission { .. } => ApiError::Forbidden(err.to_string()),
            UserAdminError::LastAdminViolation | UserAdminError::TechnicianImmutable => {
                ApiError::Conflict(err.to_string())
            }
            UserAdminError::Validation(msg) => ApiError::ValidationError(msg),
            UserAdminError::Database(msg) => ApiError::DatabaseError(msg),
            UserAdminError::Internal(msg) => ApiError::InternalError(msg),
        }
    }
}
