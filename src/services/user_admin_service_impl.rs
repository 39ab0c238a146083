//! `SeaORM` implementation of the `UserAdminService` trait.

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use crate::config::SecurityConfig;
use crate::db::{Store, User};
use crate::domain::{Capability, Role};
use crate::services::audit::{AuditService, ORIGIN_TERMINAL};
use crate::services::user_admin_service::{UserAdminError, UserAdminService, UserInfo};

/// Snapshot shape persisted into audit before/after columns.
#[derive(Serialize)]
struct UserSnapshot<'a> {
    id: i32,
    username: &'a str,
    role: &'a str,
    is_active: bool,
}

impl<'a> UserSnapshot<'a> {
    fn of(user: &'a User) -> Self {
        Self {
            id: user.id,
            username: &user.username,
            role: user.role.as_str(),
            is_active: user.is_active,
        }
    }
}

pub struct SeaOrmUserAdminService {
    store: Store,
    security: SecurityConfig,
    audit: Arc<AuditService>,
}

impl SeaOrmUserAdminService {
    #[must_use]
    pub fn new(store: Store, security: SecurityConfig, audit: Arc<AuditService>) -> Self {
        Self {
            store,
            security,
            audit,
        }
    }

    fn to_info(user: &User) -> UserInfo {
        UserInfo {
            id: user.id,
            username: user.username.clone(),
            role: user.role,
            is_active: user.is_active,
            created_at: user.created_at.clone(),
        }
    }

    fn require_admin(acting_role: Role, action: &str) -> Result<(), UserAdminError> {
        if acting_role.allows(Capability::ManageUsers) {
            Ok(())
        } else {
            Err(UserAdminError::InsufficientPermission {
                action: action.to_string(),
                required: Role::Admin,
            })
        }
    }

    fn validate_username(&self, username: &str) -> Result<(), UserAdminError> {
        let len = username.chars().count();
        if len < self.security.min_username_length || len > self.security.max_username_length {
            return Err(UserAdminError::Validation(format!(
                "Username must be {}-{} characters",
                self.security.min_username_length, self.security.max_username_length
            )));
        }
        Ok(())
    }

    fn validate_password(&self, password: &str) -> Result<(), UserAdminError> {
        if password.chars().count() < self.security.min_password_length {
            return Err(UserAdminError::Validation(format!(
                "Password must be at least {} characters",
                self.security.min_password_length
            )));
        }
        Ok(())
    }

    async fn load_target(&self, target_user_id: i32) -> Result<User, UserAdminError> {
        self.store
            .get_user_by_id(target_user_id)
            .await?
            .ok_or(UserAdminError::UserNotFound)
    }

    /// Guard for mutations that would remove an active admin from the
    /// pool, by deletion or deactivation.
    async fn check_last_admin(&self, target: &User) -> Result<(), UserAdminError> {
        if target.role == Role::Admin
            && target.is_active
            && self.store.count_active_admins().await? <= 1
        {
            return Err(UserAdminError::LastAdminViolation);
        }
        Ok(())
    }
}

#[async_trait]
impl UserAdminService for SeaOrmUserAdminService {
    async fn register_user(
        &self,
        acting_role: Role,
        acting_user_id: i32,
        username: &str,
        password: &str,
        role: Role,
    ) -> Result<UserInfo, UserAdminError> {
        Self::require_admin(acting_role, "register-user")?;
        self.validate_username(username)?;
        self.validate_password(password)?;

        if self.store.get_user_by_username(username).await?.is_some() {
            return Err(UserAdminError::UserAlreadyExists(username.to_string()));
        }

        let user = self
            .store
            .create_user(username, password, role, Some(&self.security))
            .await?;

        info!(username, role = %role, "User registered");
        self.audit
            .record_change::<(), _>(
                Some(acting_user_id),
                "user-created",
                "users",
                Some(user.id.to_string()),
                None,
                Some(&UserSnapshot::of(&user)),
                ORIGIN_TERMINAL,
            )
            .await;

        Ok(Self::to_info(&user))
    }

    async fn change_password(
        &self,
        acting_role: Role,
        acting_user_id: i32,
        target_user_id: i32,
        new_password: &str,
    ) -> Result<(), UserAdminError> {
        // Self-service is allowed; anyone else needs admin rights.
        if acting_user_id != target_user_id {
            Self::require_admin(acting_role, "change-password")?;
        }

        let target = self.load_target(target_user_id).await?;

        // Technician rows are immutable whoever asks, admin included.
        if target.role == Role::Technician {
            return Err(UserAdminError::TechnicianImmutable);
        }

        self.validate_password(new_password)?;

        self.store
            .update_user_password(target_user_id, new_password, Some(&self.security))
            .await?;

        info!(username = target.username, "Password changed");
        self.audit
            .record_action(
                Some(acting_user_id),
                "user-password-changed",
                "users",
                Some(target_user_id.to_string()),
                ORIGIN_TERMINAL,
            )
            .await;

        Ok(())
    }

    async fn delete_user(
        &self,
        acting_role: Role,
        acting_user_id: i32,
        target_user_id: i32,
    ) -> Result<(), UserAdminError> {
        Self::require_admin(acting_role, "delete-user")?;

        let target = self.load_target(target_user_id).await?;

        if target.role == Role::Technician {
            return Err(UserAdminError::TechnicianImmutable);
        }

        self.check_last_admin(&target).await?;

        let deleted = self.store.delete_user(target_user_id).await?;
        if !deleted {
            return Err(UserAdminError::UserNotFound);
        }

        info!(username = target.username, "User deleted");
        self.audit
            .record_change::<_, ()>(
                Some(acting_user_id),
                "user-deleted",
                "users",
                Some(target_user_id.to_string()),
                Some(&UserSnapshot::of(&target)),
                None,
                ORIGIN_TERMINAL,
            )
            .await;

        Ok(())
    }

    async fn set_active(
        &self,
        acting_role: Role,
        acting_user_id: i32,
        target_user_id: i32,
        is_active: bool,
    ) -> Result<UserInfo, UserAdminError> {
        Self::require_admin(acting_role, "set-user-active")?;

        let target = self.load_target(target_user_id).await?;

        if target.role == Role::Technician {
            return Err(UserAdminError::TechnicianImmutable);
        }

        if !is_active {
            self.check_last_admin(&target).await?;
        }

        let updated = self.store.set_user_active(target_user_id, is_active).await?;

        info!(username = updated.username, is_active, "User activation changed");
        self.audit
            .record_change(
                Some(acting_user_id),
                if is_active { "user-activated" } else { "user-deactivated" },
                "users",
                Some(target_user_id.to_string()),
                Some(&UserSnapshot::of(&target)),
                Some(&UserSnapshot::of(&updated)),
                ORIGIN_TERMINAL,
            )
            .await;

        Ok(Self::to_info(&updated))
    }

    async fn get_user(
        &self,
        acting_role: Role,
        target_user_id: i32,
    ) -> Result<UserInfo, UserAdminError> {
        Self::require_admin(acting_role, "get-user")?;
        let user = self.load_target(target_user_id).await?;
        Ok(Self::to_info(&user))
    }
}
