//! `SeaORM` Entity for administrator accounts

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[sea_orm(table_name = "AdminUser")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
    pub username: String,
    #[serde(skip_serializing)]
    #[sea_orm(column_name = "passwordHash", column_type = "Text")]
    pub password_hash: String,
    /// Comma separated capability names, e.g. `orders.read,orders.write`
    #[sea_orm(column_type = "Text")]
    pub permissions: String,
    #[sea_orm(column_name = "isSuperAdmin")]
    pub is_super_admin: bool,
    #[sea_orm(column_name = "createdAt")]
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
