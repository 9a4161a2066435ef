//! `SeaORM` Entity for orders

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::OrderStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "Order")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
    pub id: String,
    pub status: OrderStatus,
    /// Total in minor units, fixed at creation
    #[sea_orm(column_name = "amountTotal")]
    pub amount_total: i64,
    #[sea_orm(column_type = "Text")]
    pub currency: String,
    #[sea_orm(column_name = "customerName", column_type = "Text", nullable)]
    pub customer_name: Option<String>,
    #[sea_orm(column_name = "customerEmail", column_type = "Text", nullable)]
    pub customer_email: Option<String>,
    /// Payment provider checkout session this order was created from.
    /// Unique, so a session can never produce two orders.
    #[sea_orm(column_name = "checkoutSessionId", column_type = "Text", nullable, unique)]
    pub checkout_session_id: Option<String>,
    #[sea_orm(column_name = "createdAt")]
    pub created_at: DateTime,
    #[sea_orm(column_name = "updatedAt")]
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::order_item::Entity")]
    OrderItem,
}

impl Related<super::order_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderItem.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
