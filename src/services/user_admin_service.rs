//! Domain service for user lifecycle management.
//!
//! Registration, password changes, deletion, and activation, all
//! subject to two hard invariants: at least one active admin must
//! exist at all times, and technician records are immutable.

use serde::Serialize;
use thiserror::Error;

use crate::domain::Role;

/// Errors specific to user administration.
#[derive(Debug, Error)]
pub enum UserAdminError {
    #[error("{action} requires {required} role")]
    InsufficientPermission { action: String, required: Role },

    #[error("User not found")]
    UserNotFound,

    #[error("Username already taken: {0}")]
    UserAlreadyExists(String),

    #[error("Cannot remove the last active admin")]
    LastAdminViolation,

    #[error("Technician records cannot be modified or deleted")]
    TechnicianImmutable,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for UserAdminError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for UserAdminError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// User info DTO for responses (no hash material).
#[derive(Debug, Clone, Serialize)]
pub struct UserInfo {
    pub id: i32,
    pub username: String,
    pub role: Role,
    pub is_active: bool,
    pub created_at: String,
}

/// Domain service trait for user administration. Every operation takes
/// the acting identity explicitly; the engine owns no ambient user.
#[async_trait::async_trait]
pub trait UserAdminService: Send + Sync {
    /// Privileged registration. Admin only.
    ///
    /// # Errors
    ///
    /// Returns [`UserAdminError::UserAlreadyExists`] on a duplicate
    /// username and [`UserAdminError::Validation`] on malformed input.
    async fn register_user(
        &self,
        acting_role: Role,
        acting_user_id: i32,
        username: &str,
        password: &str,
        role: Role,
    ) -> Result<UserInfo, UserAdminError>;

    /// Change a password. Allowed for an admin, or for the user
    /// themself; never for a technician record, whoever asks.
    async fn change_password(
        &self,
        acting_role: Role,
        acting_user_id: i32,
        target_user_id: i32,
        new_password: &str,
    ) -> Result<(), UserAdminError>;

    /// Delete a user row. Admin only, technician rows never, and the
    /// last active admin is protected.
    async fn delete_user(
        &self,
        acting_role: Role,
        acting_user_id: i32,
        target_user_id: i32,
    ) -> Result<(), UserAdminError>;

    /// Activate or deactivate. Same invariants as delete.
    async fn set_active(
        &self,
        acting_role: Role,
        acting_user_id: i32,
        target_user_id: i32,
        is_active: bool,
    ) -> Result<UserInfo, UserAdminError>;

    /// Lookup by id. Admin only.
    async fn get_user(
        &self,
        acting_role: Role,
        target_user_id: i32,
    ) -> Result<UserInfo, UserAdminError>;
}
