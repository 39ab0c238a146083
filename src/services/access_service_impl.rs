//! `SeaORM` implementation of the `AccessService` trait.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

use crate::config::SecurityConfig;
use crate::db::{Store, User};
use crate::domain::Capability;
use crate::services::access_service::{AccessError, AccessService, SessionUser};
use crate::services::audit::{AuditService, ORIGIN_SYSTEM, ORIGIN_TERMINAL};
use crate::services::block_timer::{BlockTimer, TimerStatus};
use crate::services::lockout::LockoutTracker;
use crate::services::session::SessionSlot;

pub struct SeaOrmAccessService {
    store: Store,
    security: SecurityConfig,
    lockout: Arc<LockoutTracker>,
    session: Arc<SessionSlot>,
    block_timer: Arc<BlockTimer>,
    audit: Arc<AuditService>,
}

impl SeaOrmAccessService {
    #[must_use]
    pub fn new(
        store: Store,
        security: SecurityConfig,
        lockout: Arc<LockoutTracker>,
        session: Arc<SessionSlot>,
        block_timer: Arc<BlockTimer>,
        audit: Arc<AuditService>,
    ) -> Self {
        Self {
            store,
            security,
            lockout,
            session,
            block_timer,
            audit,
        }
    }

    fn to_session_user(user: &User) -> SessionUser {
        SessionUser {
            id: user.id,
            username: user.username.clone(),
            role: user.role,
        }
    }

    fn validate_login_input(&self, username: &str, password: &str) -> Result<(), AccessError> {
        let len = username.chars().count();
        if len < self.security.min_username_length || len > self.security.max_username_length {
            return Err(AccessError::Validation(format!(
                "Username must be {}-{} characters",
                self.security.min_username_length, self.security.max_username_length
            )));
        }

        if password.is_empty() {
            return Err(AccessError::Validation("Password is required".to_string()));
        }

        Ok(())
    }

    /// Shared failure path: count the attempt, then report either the
    /// fresh lock or the generic credential error.
    fn failed_attempt(&self, username: &str) -> AccessError {
        self.lockout.record_attempt(username, false);

        if self.lockout.is_locked(username) {
            AccessError::AccountLocked {
                remaining_seconds: self.lockout.remaining_lock_seconds(username),
            }
        } else {
            AccessError::InvalidCredentials {
                remaining_attempts: self.lockout.remaining_attempts(username),
            }
        }
    }

    /// Evict an expired session, auditing the expiry before the state
    /// is gone. Safe to call on every read.
    async fn sweep_expired(&self) {
        if let Some(user) = self.session.take_if_expired() {
            info!(username = user.username, "Session expired from inactivity");
            self.audit
                .record_action(
                    Some(user.id),
                    "session-expired",
                    "users",
                    Some(user.id.to_string()),
                    ORIGIN_SYSTEM,
                )
                .await;
        }
    }

    /// Role of the current session, for timer gating. Fail closed: an
    /// anonymous or expired session can do nothing.
    async fn acting_user(&self) -> Result<User, AccessError> {
        self.sweep_expired().await;
        self.session.current().ok_or(AccessError::SessionExpired)
    }

    fn require(user: &User, capability: Capability, action: &str) -> Result<(), AccessError> {
        if user.role.allows(capability) {
            Ok(())
        } else {
            Err(AccessError::InsufficientPermission {
                action: action.to_string(),
                required: capability.required_role(),
            })
        }
    }
}

#[async_trait]
impl AccessService for SeaOrmAccessService {
    async fn login(&self, username: &str, password: &str) -> Result<SessionUser, AccessError> {
        self.validate_login_input(username, password)?;

        if self.lockout.is_locked(username) {
            return Err(AccessError::AccountLocked {
                remaining_seconds: self.lockout.remaining_lock_seconds(username),
            });
        }

        let user = self.store.get_user_by_username(username).await?;

        // Missing, deactivated, and wrong-password all take the same
        // path so the response never leaks which field was wrong.
        let Some(user) = user.filter(|u| u.is_active) else {
            return Err(self.failed_attempt(username));
        };

        let is_valid = self.store.verify_user_password(username, password).await?;
        if !is_valid {
            return Err(self.failed_attempt(username));
        }

        self.lockout.record_attempt(username, true);
        self.session.sign_in(user.clone());

        info!(username = user.username, role = %user.role, "User logged in");
        self.audit
            .record_action(
                Some(user.id),
                "login",
                "users",
                Some(user.id.to_string()),
                ORIGIN_TERMINAL,
            )
            .await;

        Ok(Self::to_session_user(&user))
    }

    async fn logout(&self) -> Result<(), AccessError> {
        if let Some(user) = self.session.sign_out() {
            info!(username = user.username, "User logged out");
            self.audit
                .record_action(
                    Some(user.id),
                    "logout",
                    "users",
                    Some(user.id.to_string()),
                    ORIGIN_TERMINAL,
                )
                .await;
        }
        Ok(())
    }

    async fn current_user(&self) -> Result<Option<SessionUser>, AccessError> {
        self.sweep_expired().await;
        Ok(self.session.current().as_ref().map(Self::to_session_user))
    }

    async fn touch_activity(&self) {
        self.sweep_expired().await;
        self.session.touch();
    }

    async fn is_logged_in(&self) -> bool {
        self.sweep_expired().await;
        self.session.is_logged_in()
    }

    async fn remaining_attempts(&self, username: &str) -> u32 {
        self.lockout.remaining_attempts(username)
    }

    async fn timer_status(&self) -> TimerStatus {
        self.block_timer.status()
    }

    async fn set_timer_enabled(&self, enabled: bool) -> Result<(), AccessError> {
        let user = self.acting_user().await?;
        Self::require(&user, Capability::ConfigureBlockTimer, "set-timer-enabled")?;

        self.block_timer.set_enabled(enabled);
        self.audit
            .record_action(
                Some(user.id),
                if enabled { "timer-enabled" } else { "timer-disabled" },
                "timer",
                None,
                ORIGIN_TERMINAL,
            )
            .await;

        Ok(())
    }

    async fn block_for(&self, minutes: u64) -> Result<(), AccessError> {
        let user = self.acting_user().await?;
        Self::require(&user, Capability::ArmBlockTimer, "block-for")?;

        if minutes == 0 {
            return Err(AccessError::Validation(
                "Block duration must be at least one minute".to_string(),
            ));
        }

        if !self.block_timer.block_for_minutes(minutes) {
            return Err(AccessError::Validation(
                "Block timer is disabled".to_string(),
            ));
        }

        self.audit
            .record_action(
                Some(user.id),
                "block-armed",
                "timer",
                None,
                ORIGIN_TERMINAL,
            )
            .await;

        Ok(())
    }

    async fn clear_block(&self) -> Result<bool, AccessError> {
        let user = self.acting_user().await?;
        Self::require(&user, Capability::ClearBlockTimer, "clear-block")?;

        let cleared = self.block_timer.clear();
        if cleared {
            self.audit
                .record_action(
                    Some(user.id),
                    "block-cleared",
                    "timer",
                    None,
                    ORIGIN_TERMINAL,
                )
                .await;
        }

        Ok(cleared)
    }
}
