use crate::commerce::checkout::DynCheckoutResolver;
use crate::commerce::notify::NotificationEmitter;
use crate::entity::sea_orm_active_enums::OrderStatus;
use crate::error::CommerceError;
use crate::store::{DynOrderStore, NewOrder, Order, OrderCreation};

/// Drives orders through their lifecycle.
///
/// Every order creation path goes through here so the creation result decides
/// whether a notification is emitted.
#[derive(Clone)]
pub struct OrderService {
    orders: DynOrderStore,
    resolver: DynCheckoutResolver,
    emitter: NotificationEmitter,
}

impl OrderService {
    pub fn new(
        orders: DynOrderStore,
        resolver: DynCheckoutResolver,
        emitter: NotificationEmitter,
    ) -> Self {
        Self {
            orders,
            resolver,
            emitter,
        }
    }

    /// Persists `new_order` and notifies admins if it was newly created.
    #[tracing::instrument(name = "OrderService::create_order", skip_all, fields(session_id = ?new_order.checkout_session_id))]
    pub async fn create_order(&self, new_order: NewOrder) -> Result<OrderCreation, CommerceError> {
        let creation = self.orders.create_order(new_order).await?;

        match &creation {
            OrderCreation::Created(order) => {
                metrics::counter!("orders_created_total").increment(1);
                tracing::info!(order_id = %order.id, amount_total = order.amount_total, "Order created");
                self.emitter.notify(order).await;
            }
            OrderCreation::Existing(order) => {
                metrics::counter!("orders_deduplicated_total").increment(1);
                tracing::info!(order_id = %order.id, "Duplicate order creation ignored");
            }
        }

        Ok(creation)
    }

    /// Records the order for a completed checkout session.
    ///
    /// Redeliveries for a session that already has an order return it without
    /// contacting the payment provider.
    #[tracing::instrument(name = "OrderService::record_checkout", skip(self))]
    pub async fn record_checkout(&self, session_id: &str) -> Result<OrderCreation, CommerceError> {
        if let Some(existing) = self.orders.find_by_checkout_session(session_id).await? {
            metrics::counter!("orders_deduplicated_total").increment(1);
            tracing::info!(order_id = %existing.id, "Checkout session already recorded");
            return Ok(OrderCreation::Existing(existing));
        }

        let session = self.resolver.resolve(session_id).await?;
        let new_order = session.to_new_order()?;
        self.create_order(new_order).await
    }

    #[tracing::instrument(name = "OrderService::transition", skip(self))]
    pub async fn transition(
        &self,
        order_id: &str,
        target: OrderStatus,
    ) -> Result<Order, CommerceError> {
        let order = self.orders.get_order(order_id).await?;
        let from = order.status;
        let to = from.transition(target)?;

        let updated = self.orders.update_status(order_id, from, to).await?;
        metrics::counter!(
            "order_status_transitions_total",
            "from" => from.as_str(),
            "to" => to.as_str()
        )
        .increment(1);
        tracing::info!(%from, %to, "Order status changed");

        Ok(updated)
    }
}
