//! `SeaORM` Entity for admin notifications

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::sea_orm_active_enums::NotificationType;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(as = Notification)]
#[sea_orm(table_name = "Notification")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
    pub id: String,
    #[serde(rename = "type")]
    #[sea_orm(column_name = "type")]
    pub notification_type: NotificationType,
    /// Rendered once when the notification is created
    #[sea_orm(column_type = "Text")]
    pub message: String,
    /// Originating order. Plain reference, the notification outlives the order.
    #[sea_orm(column_name = "orderId", column_type = "Text", nullable)]
    pub order_id: Option<String>,
    pub read: bool,
    #[schema(value_type = String, format = DateTime)]
    #[sea_orm(column_name = "createdAt")]
    pub created_at: DateTime,
    #[schema(value_type = Option<String>, format = DateTime)]
    #[sea_orm(column_name = "readAt", nullable)]
    pub read_at: Option<DateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
