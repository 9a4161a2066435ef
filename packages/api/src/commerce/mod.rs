//! Order and notification lifecycle.

pub mod checkout;
pub mod notify;
pub mod order_status;
pub mod service;

pub use checkout::{
    CheckoutLineItem, CheckoutResolver, CheckoutSessionView, DynCheckoutResolver, PaymentState,
    StripeCheckoutResolver, UnconfiguredCheckoutResolver, display_id,
};
pub use notify::NotificationEmitter;
pub use service::OrderService;
