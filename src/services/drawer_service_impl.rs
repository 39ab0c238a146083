//! `SeaORM` implementation of the `DrawerService` trait.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::db::{DrawerRow, Store};
use crate::domain::{Capability, DrawerAction, Role};
use crate::services::audit::{AuditService, ORIGIN_TERMINAL};
use crate::services::block_timer::BlockTimer;
use crate::services::drawer_service::{
    DrawerError, DrawerHistoryPage, DrawerService, SetDrawerOutcome,
};

pub struct SeaOrmDrawerService {
    store: Store,
    block_timer: Arc<BlockTimer>,
    audit: Arc<AuditService>,
    default_block: Duration,
}

impl SeaOrmDrawerService {
    #[must_use]
    pub fn new(
        store: Store,
        block_timer: Arc<BlockTimer>,
        audit: Arc<AuditService>,
        default_block: Duration,
    ) -> Self {
        Self {
            store,
            block_timer,
            audit,
            default_block,
        }
    }

    fn check_permission(role: Role, action: DrawerAction) -> Result<(), DrawerError> {
        let capability = Role::drawer_capability(action);
        if role.allows(capability) {
            Ok(())
        } else {
            Err(DrawerError::InsufficientPermission {
                action: capability.to_string(),
                required: capability.required_role(),
            })
        }
    }
}

#[async_trait]
impl DrawerService for SeaOrmDrawerService {
    async fn state(&self, drawer_id: &str) -> Result<bool, DrawerError> {
        let drawer = self
            .store
            .get_drawer(drawer_id)
            .await?
            .ok_or_else(|| DrawerError::NotFound(drawer_id.to_string()))?;

        Ok(drawer.is_open)
    }

    async fn list(&self) -> Result<Vec<DrawerRow>, DrawerError> {
        Ok(self.store.list_drawers().await?)
    }

    async fn set_state(
        &self,
        drawer_id: &str,
        open: bool,
        acting_role: Role,
        acting_user_id: i32,
    ) -> Result<SetDrawerOutcome, DrawerError> {
        let action = DrawerAction::from_requested_state(open);

        // Permission first: a disallowed request must leave no trace.
        Self::check_permission(acting_role, action)?;

        let before = self
            .store
            .get_drawer(drawer_id)
            .await?
            .ok_or_else(|| DrawerError::NotFound(drawer_id.to_string()))?;

        // Idempotent no-op: already in the requested state, nothing to
        // write and no history or audit entry.
        if before.is_open == open {
            return Ok(SetDrawerOutcome {
                drawer_id: drawer_id.to_string(),
                is_open: open,
                no_change: true,
                audit_recorded: true,
            });
        }

        // The cooldown window suspends open transitions terminal-wide.
        // Closing stays allowed (it is the safe direction), and an admin
        // can always operate since they may clear the window anyway.
        if action == DrawerAction::Open
            && acting_role != Role::Admin
            && self.block_timer.is_blocked()
        {
            return Err(DrawerError::Blocked {
                remaining_seconds: self.block_timer.remaining_seconds(),
            });
        }

        let after = self.store.set_drawer_state(drawer_id, open).await?;

        // Exactly one history row per flip.
        self.store
            .add_drawer_history(drawer_id, action.as_str(), Some(acting_user_id))
            .await?;

        let audit_recorded = self
            .audit
            .record_change(
                Some(acting_user_id),
                &format!("drawer-{}", action.as_str()),
                "drawers",
                Some(drawer_id.to_string()),
                Some(&before),
                Some(&after),
                ORIGIN_TERMINAL,
            )
            .await;

        // Opening by a role that may arm the cooldown starts the window.
        // Closes never arm it. Arming fails silently while the timer is
        // disabled; that is the timer's documented policy, not an error.
        if action == DrawerAction::Open && acting_role.allows(Capability::ArmBlockTimer) {
            self.block_timer.block_for(self.default_block);
        }

        info!(
            drawer_id,
            action = action.as_str(),
            user_id = acting_user_id,
            "Drawer transition applied"
        );

        Ok(SetDrawerOutcome {
            drawer_id: drawer_id.to_string(),
            is_open: open,
            no_change: false,
            audit_recorded,
        })
    }

    async fn history(
        &self,
        drawer_id: &str,
        page: u64,
        page_size: u64,
    ) -> Result<DrawerHistoryPage, DrawerError> {
        if self.store.get_drawer(drawer_id).await?.is_none() {
            return Err(DrawerError::NotFound(drawer_id.to_string()));
        }

        let (items, total) = self.store.drawer_history(drawer_id, page, page_size).await?;

        Ok(DrawerHistoryPage { items, total })
    }
}
