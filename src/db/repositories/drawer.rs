use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::entities::{drawer_history, drawers, prelude::*};

pub struct DrawerRepository {
    conn: DatabaseConnection,
}

impl DrawerRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get(&self, drawer_id: &str) -> Result<Option<drawers::Model>> {
        let drawer = Drawers::find_by_id(drawer_id)
            .one(&self.conn)
            .await
            .context("Failed to query drawer")?;

        Ok(drawer)
    }

    pub async fn list(&self) -> Result<Vec<drawers::Model>> {
        let rows = Drawers::find()
            .order_by_asc(drawers::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list drawers")?;

        Ok(rows)
    }

    /// Persist a new open/closed state. The state machine decides whether
    /// a write is warranted; this only applies it.
    pub async fn set_state(&self, drawer_id: &str, is_open: bool) -> Result<drawers::Model> {
        let drawer = Drawers::find_by_id(drawer_id)
            .one(&self.conn)
            .await
            .context("Failed to query drawer for state change")?
            .ok_or_else(|| anyhow::anyhow!("Drawer not found: {drawer_id}"))?;

        let now = chrono::Utc::now().to_rfc3339();

        let mut active: drawers::ActiveModel = drawer.into();
        active.is_open = Set(is_open);
        active.updated_at = Set(now);
        let model = active.update(&self.conn).await?;

        Ok(model)
    }

    /// Register a drawer row (used by terminal provisioning, idempotent).
    pub async fn upsert(&self, drawer_id: &str, is_open: bool) -> Result<()> {
        if self.get(drawer_id).await?.is_some() {
            self.set_state(drawer_id, is_open).await?;
            return Ok(());
        }

        let now = chrono::Utc::now().to_rfc3339();
        let active = drawers::ActiveModel {
            id: Set(drawer_id.to_string()),
            is_open: Set(is_open),
            updated_at: Set(now),
        };
        active
            .insert(&self.conn)
            .await
            .context("Failed to insert drawer")?;

        Ok(())
    }

    /// Append one history row for a transition that actually happened.
    pub async fn add_history(
        &self,
        drawer_id: &str,
        action: &str,
        user_id: Option<i32>,
    ) -> Result<()> {
        let active = drawer_history::ActiveModel {
            drawer_id: Set(drawer_id.to_string()),
            action: Set(action.to_string()),
            user_id: Set(user_id),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        DrawerHistory::insert(active)
            .exec(&self.conn)
            .await
            .context("Failed to insert drawer history")?;

        Ok(())
    }

    /// History rows for a drawer, newest first. Returns (items, total rows).
    pub async fn history(
        &self,
        drawer_id: &str,
        page: u64,
        page_size: u64,
    ) -> Result<(Vec<drawer_history::Model>, u64)> {
        let paginator = DrawerHistory::find()
            .filter(drawer_history::Column::DrawerId.eq(drawer_id))
            .order_by_desc(drawer_history::Column::CreatedAt)
            .order_by_desc(drawer_history::Column::Id)
            .paginate(&self.conn, page_size.max(1));

        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;

        Ok((items, total))
    }

    /// Total number of history rows for a drawer (test and display helper).
    pub async fn history_count(&self, drawer_id: &str) -> Result<u64> {
        let count = DrawerHistory::find()
            .filter(drawer_history::Column::DrawerId.eq(drawer_id))
            .count(&self.conn)
            .await
            .context("Failed to count drawer history")?;

        Ok(count)
    }
}
