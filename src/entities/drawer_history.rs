use sea_orm::entity::prelude::*;
use serde::Serialize;

/// Append-only record of drawer transitions, one row per flip.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "drawer_history")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub drawer_id: String,

    /// "opened" or "closed".
    pub action: String,

    /// Null for system-initiated transitions.
    pub user_id: Option<i32>,

    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
