//! Admin notifications for newly created orders.
//!
//! Notification delivery is best effort. A failed write is logged and counted but
//! never reaches the caller, an order that was durably created stays created.

use storefront_types::short_ref;

use crate::entity::sea_orm_active_enums::NotificationType;
use crate::money::format_amount;
use crate::store::{DynNotificationStore, NewNotification, Order};

pub const ORDER_REF_LEN: usize = 8;

pub fn render_new_order_message(order: &Order) -> String {
    let customer = order
        .customer_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or("Guest");

    format!(
        "🛒 New order #{} from {}: {}",
        short_ref(&order.id, ORDER_REF_LEN),
        customer,
        format_amount(order.amount_total, &order.currency)
    )
}

#[derive(Clone)]
pub struct NotificationEmitter {
    store: DynNotificationStore,
}

impl NotificationEmitter {
    pub fn new(store: DynNotificationStore) -> Self {
        Self { store }
    }

    /// Records a `NEW_ORDER` notification for `order`.
    ///
    /// Must be called once, right after the order was created.
    #[tracing::instrument(name = "NotificationEmitter::notify", skip(self, order), fields(order_id = %order.id))]
    pub async fn notify(&self, order: &Order) {
        let notification = NewNotification {
            notification_type: NotificationType::NewOrder,
            message: render_new_order_message(order),
            order_id: Some(order.id.clone()),
        };

        match self.store.create_notification(notification).await {
            Ok(created) => {
                metrics::counter!("notifications_created_total").increment(1);
                tracing::info!(notification_id = %created.id, "Created order notification");
            }
            Err(err) => {
                metrics::counter!("notifications_failed_total").increment(1);
                tracing::error!(error = %err, "Failed to create order notification");
            }
        }
    }
}
