use std::collections::HashMap;

use chrono::NaiveDateTime;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, QueryFilter, QueryOrder,
    TransactionTrait, sea_query::Expr,
};
use serde::{Deserialize, Serialize};
use storefront_types::create_id;
use utoipa::ToSchema;

use super::{DatabaseStore, OrderStore, StoreResult, is_unique_violation};
use crate::entity::{order, order_item, sea_orm_active_enums::OrderStatus};
use crate::error::CommerceError;
use crate::money::{self, LineAmount};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewOrderItem {
    pub product_id: String,
    pub product_name: Option<String>,
    pub quantity: i64,
    pub unit_price: i64,
}

impl LineAmount for NewOrderItem {
    fn quantity(&self) -> i64 {
        self.quantity
    }

    fn unit_price(&self) -> i64 {
        self.unit_price
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInfo {
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub items: Vec<NewOrderItem>,
    pub amount_total: i64,
    pub currency: String,
    pub customer: CustomerInfo,
    pub checkout_session_id: Option<String>,
    pub status: OrderStatus,
}

impl NewOrder {
    /// Builds a pending order whose total is computed from its items.
    pub fn from_items(
        items: Vec<NewOrderItem>,
        currency: impl Into<String>,
        customer: CustomerInfo,
    ) -> Result<Self, CommerceError> {
        let amount_total = money::order_total(&items)?;
        Ok(Self {
            items,
            amount_total,
            currency: currency.into(),
            customer,
            checkout_session_id: None,
            status: OrderStatus::Pending,
        })
    }

    pub fn with_checkout_session(mut self, session_id: impl Into<String>) -> Self {
        self.checkout_session_id = Some(session_id.into());
        self
    }

    pub fn with_status(mut self, status: OrderStatus) -> Self {
        self.status = status;
        self
    }

    /// Checks everything that could make the write fail halfway.
    pub fn validate(&self) -> Result<(), CommerceError> {
        let computed = money::order_total(&self.items)?;
        if computed != self.amount_total {
            return Err(CommerceError::Validation(format!(
                "amount total {} does not match line items ({})",
                self.amount_total, computed
            )));
        }
        let currency = self.currency.trim();
        if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(CommerceError::Validation(format!(
                "invalid currency code: {:?}",
                self.currency
            )));
        }
        if let Some(item) = self.items.iter().find(|i| i.product_id.trim().is_empty()) {
            return Err(CommerceError::Validation(format!(
                "line item without product reference: {:?}",
                item
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: String,
    pub product_name: Option<String>,
    pub quantity: i64,
    pub unit_price: i64,
}

impl From<order_item::Model> for OrderItem {
    fn from(model: order_item::Model) -> Self {
        Self {
            product_id: model.product_id,
            product_name: model.product_name,
            quantity: model.quantity,
            unit_price: model.unit_price,
        }
    }
}

/// An order together with its line items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub status: OrderStatus,
    pub amount_total: i64,
    pub currency: String,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub checkout_session_id: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub items: Vec<OrderItem>,
}

impl Order {
    fn assemble(model: order::Model, mut items: Vec<order_item::Model>) -> Self {
        items.sort_by_key(|item| item.position);
        Self {
            id: model.id,
            status: model.status,
            amount_total: model.amount_total,
            currency: model.currency,
            customer_name: model.customer_name,
            customer_email: model.customer_email,
            checkout_session_id: model.checkout_session_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
            items: items.into_iter().map(OrderItem::from).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderCreation {
    Created(Order),
    /// The checkout session already produced this order.
    Existing(Order),
}

impl OrderCreation {
    pub fn order(&self) -> &Order {
        match self {
            OrderCreation::Created(order) | OrderCreation::Existing(order) => order,
        }
    }

    pub fn into_order(self) -> Order {
        match self {
            OrderCreation::Created(order) | OrderCreation::Existing(order) => order,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, OrderCreation::Created(_))
    }
}

impl DatabaseStore {
    async fn insert_order(&self, new_order: &NewOrder) -> Result<Order, sea_orm::DbErr> {
        let now = chrono::Utc::now().naive_utc();
        let order_id = create_id();

        let txn = self.db.begin().await?;

        let order_model = order::ActiveModel {
            id: Set(order_id.clone()),
            status: Set(new_order.status),
            amount_total: Set(new_order.amount_total),
            currency: Set(new_order.currency.trim().to_lowercase()),
            customer_name: Set(new_order.customer.name.clone()),
            customer_email: Set(new_order.customer.email.clone()),
            checkout_session_id: Set(new_order.checkout_session_id.clone()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        let mut items = Vec::with_capacity(new_order.items.len());
        for (position, item) in new_order.items.iter().enumerate() {
            let item_model = order_item::ActiveModel {
                id: Set(create_id()),
                order_id: Set(order_id.clone()),
                product_id: Set(item.product_id.clone()),
                product_name: Set(item.product_name.clone()),
                quantity: Set(item.quantity),
                unit_price: Set(item.unit_price),
                position: Set(position as i32),
            }
            .insert(&txn)
            .await?;
            items.push(item_model);
        }

        txn.commit().await?;

        Ok(Order::assemble(order_model, items))
    }

    async fn load_items(&self, order_id: &str) -> StoreResult<Vec<order_item::Model>> {
        let items = order_item::Entity::find()
            .filter(order_item::Column::OrderId.eq(order_id))
            .order_by_asc(order_item::Column::Position)
            .all(&self.db)
            .await?;
        Ok(items)
    }
}

#[async_trait::async_trait]
impl OrderStore for DatabaseStore {
    #[tracing::instrument(name = "OrderStore::create_order", skip(self, new_order), fields(session_id = ?new_order.checkout_session_id))]
    async fn create_order(&self, new_order: NewOrder) -> StoreResult<OrderCreation> {
        new_order.validate()?;

        if let Some(session_id) = new_order.checkout_session_id.as_deref()
            && let Some(existing) = self.find_by_checkout_session(session_id).await?
        {
            tracing::info!(order_id = %existing.id, "Order already recorded for session");
            return Ok(OrderCreation::Existing(existing));
        }

        match self.insert_order(&new_order).await {
            Ok(order) => Ok(OrderCreation::Created(order)),
            Err(err) => {
                // A concurrent writer may have committed the same session first.
                if is_unique_violation(&err)
                    && let Some(session_id) = new_order.checkout_session_id.as_deref()
                    && let Some(existing) = self.find_by_checkout_session(session_id).await?
                {
                    tracing::info!(order_id = %existing.id, "Lost creation race for session");
                    return Ok(OrderCreation::Existing(existing));
                }
                Err(err.into())
            }
        }
    }

    async fn get_order(&self, order_id: &str) -> StoreResult<Order> {
        let model = order::Entity::find_by_id(order_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| CommerceError::NotFound(format!("order {}", order_id)))?;
        let items = self.load_items(&model.id).await?;
        Ok(Order::assemble(model, items))
    }

    async fn find_by_checkout_session(&self, session_id: &str) -> StoreResult<Option<Order>> {
        let Some(model) = order::Entity::find()
            .filter(order::Column::CheckoutSessionId.eq(session_id))
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };
        let items = self.load_items(&model.id).await?;
        Ok(Some(Order::assemble(model, items)))
    }

    async fn list_orders(&self) -> StoreResult<Vec<Order>> {
        let orders = order::Entity::find()
            .order_by_desc(order::Column::CreatedAt)
            .order_by_desc(order::Column::Id)
            .all(&self.db)
            .await?;

        if orders.is_empty() {
            return Ok(Vec::new());
        }

        let order_ids: Vec<String> = orders.iter().map(|o| o.id.clone()).collect();
        let items = order_item::Entity::find()
            .filter(order_item::Column::OrderId.is_in(order_ids))
            .order_by_asc(order_item::Column::Position)
            .all(&self.db)
            .await?;

        let mut grouped: HashMap<String, Vec<order_item::Model>> = HashMap::new();
        for item in items {
            grouped.entry(item.order_id.clone()).or_default().push(item);
        }

        Ok(orders
            .into_iter()
            .map(|model| {
                let items = grouped.remove(&model.id).unwrap_or_default();
                Order::assemble(model, items)
            })
            .collect())
    }

    #[tracing::instrument(name = "OrderStore::update_status", skip(self))]
    async fn update_status(
        &self,
        order_id: &str,
        from: OrderStatus,
        to: OrderStatus,
    ) -> StoreResult<Order> {
        let result = order::Entity::update_many()
            .col_expr(order::Column::Status, Expr::value(to))
            .col_expr(
                order::Column::UpdatedAt,
                Expr::value(chrono::Utc::now().naive_utc()),
            )
            .filter(order::Column::Id.eq(order_id))
            .filter(order::Column::Status.eq(from))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            // Either the order is gone or another writer moved it first.
            let current = self.get_order(order_id).await?;
            tracing::warn!(current = %current.status, %from, %to, "Status changed concurrently");
            return Err(CommerceError::InvalidTransition {
                from: current.status,
                to,
            });
        }

        self.get_order(order_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(product: &str, quantity: i64, unit_price: i64) -> NewOrderItem {
        NewOrderItem {
            product_id: product.to_string(),
            product_name: None,
            quantity,
            unit_price,
        }
    }

    #[test]
    fn from_items_computes_total() {
        let order = NewOrder::from_items(
            vec![item("A", 2, 500), item("B", 1, 1200)],
            "usd",
            CustomerInfo::default(),
        )
        .unwrap();
        assert_eq!(order.amount_total, 2200);
        assert_eq!(order.status, OrderStatus::Pending);
        assert!(order.validate().is_ok());
    }

    #[test]
    fn validate_rejects_mismatched_total() {
        let mut order =
            NewOrder::from_items(vec![item("A", 1, 100)], "usd", CustomerInfo::default())
                .unwrap();
        order.amount_total = 99;
        assert!(matches!(
            order.validate(),
            Err(CommerceError::Validation(_))
        ));
    }

    #[test]
    fn validate_rejects_bad_currency_and_items() {
        let mut order =
            NewOrder::from_items(vec![item("A", 1, 100)], "usd", CustomerInfo::default())
                .unwrap();
        order.currency = "dollars".into();
        assert!(order.validate().is_err());

        assert!(NewOrder::from_items(vec![], "usd", CustomerInfo::default()).is_err());
        assert!(
            NewOrder::from_items(vec![item("A", 0, 100)], "usd", CustomerInfo::default())
                .is_err()
        );
        let blank = NewOrder::from_items(vec![item(" ", 1, 100)], "usd", CustomerInfo::default())
            .unwrap();
        assert!(blank.validate().is_err());
    }
}
