//! Domain service for the login session and system-wide timer controls.
//!
//! Handles authentication with lockout, the inactivity lifecycle, and
//! the role-gated block timer operations.

use serde::Serialize;
use thiserror::Error;

use crate::domain::Role;
use crate::services::block_timer::TimerStatus;

/// Errors specific to session and timer operations.
///
/// Credential failures never reveal which of username/password was
/// wrong; both collapse into `InvalidCredentials`.
#[derive(Debug, Error)]
pub enum AccessError {
    #[error("Invalid credentials")]
    InvalidCredentials { remaining_attempts: u32 },

    #[error("Account locked, retry in {remaining_seconds}s")]
    AccountLocked { remaining_seconds: u64 },

    #[error("No active session")]
    SessionExpired,

    #[error("{action} requires {required} role")]
    InsufficientPermission { action: String, required: Role },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AccessError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AccessError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Authenticated identity snapshot handed to the caller. A copy of
/// credential data, not a live handle into the store.
#[derive(Debug, Clone, Serialize)]
pub struct SessionUser {
    pub id: i32,
    pub username: String,
    pub role: Role,
}

/// Domain service trait for session and timer control.
#[async_trait::async_trait]
pub trait AccessService: Send + Sync {
    /// Verifies credentials, subject to the lockout tracker, and signs
    /// the user into the terminal session.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::AccountLocked`] while locked out and
    /// [`AccessError::InvalidCredentials`] on a failed check.
    async fn login(&self, username: &str, password: &str) -> Result<SessionUser, AccessError>;

    /// Signs out the current session. No-op while anonymous.
    async fn logout(&self) -> Result<(), AccessError>;

    /// Current user, observing lazy inactivity expiry. An expiry seen
    /// here emits its audit entry before the state is discarded.
    async fn current_user(&self) -> Result<Option<SessionUser>, AccessError>;

    /// Extends the inactivity deadline. No-op while anonymous.
    async fn touch_activity(&self);

    async fn is_logged_in(&self) -> bool;

    /// Remaining attempts before a username is locked out.
    async fn remaining_attempts(&self, username: &str) -> u32;

    // ---- block timer, gated on the current session's role ----

    async fn timer_status(&self) -> TimerStatus;

    /// Admin only.
    async fn set_timer_enabled(&self, enabled: bool) -> Result<(), AccessError>;

    /// Admin or Seller. Fails with Validation if the timer is disabled.
    async fn block_for(&self, minutes: u64) -> Result<(), AccessError>;

    /// Admin only. Returns whether a window was actually cleared.
    async fn clear_block(&self) -> Result<bool, AccessError>;
}
