//! `SeaORM` Entity for catalog products

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(as = Product)]
#[sea_orm(table_name = "Product")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
    pub id: String,
    #[sea_orm(column_type = "Text")]
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    #[sea_orm(column_name = "priceCents")]
    pub price_cents: i64,
    #[sea_orm(column_type = "Text")]
    pub currency: String,
    pub stock: i32,
    pub active: bool,
    #[schema(value_type = String, format = DateTime)]
    #[sea_orm(column_name = "createdAt")]
    pub created_at: DateTime,
    #[schema(value_type = String, format = DateTime)]
    #[sea_orm(column_name = "updatedAt")]
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
