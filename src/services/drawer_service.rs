//! Domain service for the role-gated drawer state machine.

use serde::Serialize;
use thiserror::Error;

use crate::db::DrawerHistoryRow;
use crate::domain::Role;

/// Errors specific to drawer operations.
#[derive(Debug, Error)]
pub enum DrawerError {
    #[error("Drawer not found: {0}")]
    NotFound(String),

    #[error("{action} requires {required} role")]
    InsufficientPermission { action: String, required: Role },

    #[error("Drawer operations suspended for {remaining_seconds}s")]
    Blocked { remaining_seconds: u64 },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for DrawerError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for DrawerError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Result of a state request. `no_change` marks the idempotent case:
/// the drawer was already in the requested state and nothing was
/// written. `audit_recorded` is false when the transition committed
/// but the audit append failed (degraded, not rolled back).
#[derive(Debug, Clone, Serialize)]
pub struct SetDrawerOutcome {
    pub drawer_id: String,
    pub is_open: bool,
    pub no_change: bool,
    pub audit_recorded: bool,
}

/// One page of history rows, newest first.
#[derive(Debug, Clone, Serialize)]
pub struct DrawerHistoryPage {
    pub items: Vec<DrawerHistoryRow>,
    pub total: u64,
}

/// Domain service trait for drawer state.
#[async_trait::async_trait]
pub trait DrawerService: Send + Sync {
    /// Current open/closed state.
    async fn state(&self, drawer_id: &str) -> Result<bool, DrawerError>;

    /// All drawer rows known to this terminal.
    async fn list(&self) -> Result<Vec<crate::db::DrawerRow>, DrawerError>;

    /// Apply a role-gated transition.
    ///
    /// Disallowed transitions fail with
    /// [`DrawerError::InsufficientPermission`] and perform no writes.
    /// Requesting the current state is a first-class no-op. A real open
    /// transition by a role that may arm the cooldown starts the block
    /// window; closes never do.
    ///
    /// # Errors
    ///
    /// Returns [`DrawerError::Blocked`] when the block window suspends
    /// the transition (opens by non-admin roles while blocking).
    async fn set_state(
        &self,
        drawer_id: &str,
        open: bool,
        acting_role: Role,
        acting_user_id: i32,
    ) -> Result<SetDrawerOutcome, DrawerError>;

    /// History page for a drawer, newest first.
    async fn history(
        &self,
        drawer_id: &str,
        page: u64,
        page_size: u64,
    ) -> Result<DrawerHistoryPage, DrawerError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drawer_error_display() {
        let err = DrawerError::NotFound("1001".to_string());
        assert_eq!(err.to_string(), "Drawer not found: 1001");

        let err = DrawerError::InsufficientPermission {
            action: "open-drawer".to_string(),
            required: Role::Seller,
        };
        assert_eq!(err.to_string(), "open-drawer requires seller role");

        let err = DrawerError::Blocked {
            remaining_seconds: 90,
        };
        assert_eq!(err.to_string(), "Drawer operations suspended for 90s");
    }

    #[tokio::test]
    async fn error_conversions_work() {
        let db_err = sea_orm::DbErr::Custom("test".to_string());
        let drawer_err: DrawerError = db_err.into();
        assert!(matches!(drawer_err, DrawerError::Database(_)));
    }
}
