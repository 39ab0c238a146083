use anyhow::{Context, Result};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

use crate::entities::{audit_log, prelude::*};

/// One audit row to append. Snapshots are already-serialized JSON.
#[derive(Debug, Clone)]
pub struct AuditRecord {
    pub user_id: Option<i32>,
    pub action: String,
    pub table_name: String,
    pub record_id: Option<String>,
    pub before_state: Option<String>,
    pub after_state: Option<String>,
    pub origin: String,
}

pub struct AuditRepository {
    conn: DatabaseConnection,
}

impl AuditRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Append one entry; rows are never updated or deleted.
    pub async fn append(&self, record: AuditRecord) -> Result<i64> {
        let active = audit_log::ActiveModel {
            user_id: Set(record.user_id),
            action: Set(record.action),
            table_name: Set(record.table_name),
            record_id: Set(record.record_id),
            before_state: Set(record.before_state),
            after_state: Set(record.after_state),
            origin: Set(record.origin),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        let result = AuditLog::insert(active)
            .exec(&self.conn)
            .await
            .context("Failed to append audit entry")?;

        Ok(result.last_insert_id)
    }

    /// Recent audit rows, newest first. Returns (items, total rows).
    pub async fn recent(
        &self,
        page: u64,
        page_size: u64,
        action_filter: Option<String>,
    ) -> Result<(Vec<audit_log::Model>, u64)> {
        let mut query = AuditLog::find()
            .order_by_desc(audit_log::Column::CreatedAt)
            .order_by_desc(audit_log::Column::Id);

        if let Some(action) = action_filter {
            query = query.filter(audit_log::Column::Action.eq(action));
        }

        let paginator = query.paginate(&self.conn, page_size.max(1));
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;

        Ok((items, total))
    }
}
