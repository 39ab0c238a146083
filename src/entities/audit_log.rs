use sea_orm::entity::prelude::*;
use serde::Serialize;

/// Append-only audit trail. Rows are never updated or deleted.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "audit_log")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    /// Null for actions not attributable to a user (e.g. session expiry sweep).
    pub user_id: Option<i32>,

    /// Action code such as "login", "drawer-opened", "user-deleted".
    pub action: String,

    pub table_name: String,

    pub record_id: Option<String>,

    /// JSON snapshot of the row before the mutation.
    pub before_state: Option<String>,

    /// JSON snapshot of the row after the mutation.
    pub after_state: Option<String>,

    /// Where the action originated ("terminal" for local UI calls).
    pub origin: String,

    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
