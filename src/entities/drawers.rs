use sea_orm::entity::prelude::*;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "drawers")]
pub struct Model {
    /// Stable drawer identifier printed on the hardware (e.g. "1001").
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub is_open: bool,

    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
