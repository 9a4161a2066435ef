//! Persistence interfaces.
//!
//! Handlers and lifecycle components never touch a database handle directly. They
//! receive these traits as `Arc<dyn ...>` through [`crate::state::State`], which lets
//! the process own the connection and lets tests swap in instrumented stores.

use std::sync::Arc;

use sea_orm::{DatabaseConnection, DbErr, SqlErr};

use crate::entity::{
    admin_user, customer, notification, product, sea_orm_active_enums::OrderStatus,
};
use crate::error::CommerceError;

mod admin;
mod catalog;
mod notification_store;
mod order_store;
pub mod schema;

pub use admin::{NewAdmin, NewCustomer};
pub use catalog::{NewProduct, ProductPatch};
pub use notification_store::{NewNotification, NotificationCounts, NotificationQuery};
pub use order_store::{CustomerInfo, NewOrder, NewOrderItem, Order, OrderCreation, OrderItem};

pub type StoreResult<T> = Result<T, CommerceError>;

#[async_trait::async_trait]
pub trait OrderStore: Send + Sync {
    /// Persists the order and all of its items atomically.
    ///
    /// Orders carrying a checkout session id are created at most once per session;
    /// repeated calls return [`OrderCreation::Existing`].
    async fn create_order(&self, order: NewOrder) -> StoreResult<OrderCreation>;
    async fn get_order(&self, order_id: &str) -> StoreResult<Order>;
    async fn find_by_checkout_session(&self, session_id: &str) -> StoreResult<Option<Order>>;
    /// All orders with their items, newest first.
    async fn list_orders(&self) -> StoreResult<Vec<Order>>;
    /// Moves the order from `from` to `to` only if it is still in `from`.
    ///
    /// Transition rules live in the order service. A row that left `from` in the
    /// meantime yields [`CommerceError::InvalidTransition`] with its current status.
    async fn update_status(
        &self,
        order_id: &str,
        from: OrderStatus,
        to: OrderStatus,
    ) -> StoreResult<Order>;
}

#[async_trait::async_trait]
pub trait NotificationStore: Send + Sync {
    async fn create_notification(
        &self,
        notification: NewNotification,
    ) -> StoreResult<notification::Model>;
    async fn list_notifications(
        &self,
        query: NotificationQuery,
    ) -> StoreResult<Vec<notification::Model>>;
    async fn notifications_for_order(
        &self,
        order_id: &str,
    ) -> StoreResult<Vec<notification::Model>>;
    async fn notification_counts(&self) -> StoreResult<NotificationCounts>;
    async fn mark_read(&self, notification_id: &str) -> StoreResult<notification::Model>;
    async fn mark_all_read(&self) -> StoreResult<u64>;
}

#[async_trait::async_trait]
pub trait AdminStore: Send + Sync {
    async fn find_admin(&self, username: &str) -> StoreResult<Option<admin_user::Model>>;
    async fn create_admin(&self, admin: NewAdmin) -> StoreResult<admin_user::Model>;
}

#[async_trait::async_trait]
pub trait CustomerStore: Send + Sync {
    /// Fails with [`CommerceError::Conflict`] when the email is already registered.
    async fn create_customer(&self, customer: NewCustomer) -> StoreResult<customer::Model>;
}

#[async_trait::async_trait]
pub trait CatalogStore: Send + Sync {
    async fn list_products(&self) -> StoreResult<Vec<product::Model>>;
    async fn get_product(&self, product_id: &str) -> StoreResult<product::Model>;
    async fn create_product(&self, product: NewProduct) -> StoreResult<product::Model>;
    async fn patch_product(
        &self,
        product_id: &str,
        patch: ProductPatch,
    ) -> StoreResult<product::Model>;
    /// Applies every patch or none of them.
    async fn bulk_patch_products(
        &self,
        patches: Vec<(String, ProductPatch)>,
    ) -> StoreResult<Vec<product::Model>>;
    async fn delete_product(&self, product_id: &str) -> StoreResult<()>;
}

pub type DynOrderStore = Arc<dyn OrderStore>;
pub type DynNotificationStore = Arc<dyn NotificationStore>;
pub type DynAdminStore = Arc<dyn AdminStore>;
pub type DynCustomerStore = Arc<dyn CustomerStore>;
pub type DynCatalogStore = Arc<dyn CatalogStore>;

/// All store traits backed by one sea-orm connection.
#[derive(Clone)]
pub struct DatabaseStore {
    db: DatabaseConnection,
}

impl DatabaseStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
