//! Read-through lookup of payment provider checkout sessions.
//!
//! Sessions are never cached and calls are never retried. A customer reloading the
//! confirmation page is the retry.

use std::{str::FromStr, sync::Arc, time::Duration};

use serde::Serialize;
use storefront_types::short_ref;
use utoipa::ToSchema;

use crate::entity::sea_orm_active_enums::OrderStatus;
use crate::error::CommerceError;
use crate::store::{CustomerInfo, NewOrder, NewOrderItem};

const SESSION_EXPAND: &[&str] = &["line_items", "line_items.data.price.product"];

/// Customer-facing label for the order behind a checkout session.
///
/// Only a display label, unrelated to the stored order id.
pub fn display_id(session_id: &str) -> String {
    format!("ORD-{}", short_ref(session_id, 8))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PaymentState {
    Paid,
    Unpaid,
    NoPaymentRequired,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutLineItem {
    pub product_id: String,
    pub name: Option<String>,
    pub quantity: i64,
    pub unit_price: i64,
    pub amount_total: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSessionView {
    pub session_id: String,
    pub display_id: String,
    pub amount_total: i64,
    pub currency: String,
    pub customer_email: Option<String>,
    pub customer_name: Option<String>,
    pub payment_status: PaymentState,
    pub items: Vec<CheckoutLineItem>,
}

impl CheckoutSessionView {
    /// Converts the session into an order keyed by the session id.
    ///
    /// The order total is recomputed from the line items so it always equals the
    /// sum of `quantity × unit_price`.
    pub fn to_new_order(&self) -> Result<NewOrder, CommerceError> {
        let items = self
            .items
            .iter()
            .map(|item| NewOrderItem {
                product_id: item.product_id.clone(),
                product_name: item.name.clone(),
                quantity: item.quantity,
                unit_price: item.unit_price,
            })
            .collect();

        let customer = CustomerInfo {
            name: self.customer_name.clone(),
            email: self.customer_email.clone(),
        };

        let status = match self.payment_status {
            PaymentState::Paid | PaymentState::NoPaymentRequired => OrderStatus::Paid,
            PaymentState::Unpaid => OrderStatus::Pending,
        };

        let order = NewOrder::from_items(items, self.currency.clone(), customer)?
            .with_checkout_session(self.session_id.clone())
            .with_status(status);

        if order.amount_total != self.amount_total {
            tracing::warn!(
                session_id = %self.session_id,
                provider_total = self.amount_total,
                line_total = order.amount_total,
                "Provider total differs from line items"
            );
        }

        Ok(order)
    }
}

#[async_trait::async_trait]
pub trait CheckoutResolver: Send + Sync {
    /// Fetches a session with its expanded line items.
    ///
    /// Fails with [`CommerceError::SessionNotFound`] for unknown or malformed ids and
    /// with [`CommerceError::ProviderUnavailable`] for transport failures and timeouts.
    async fn resolve(&self, session_id: &str) -> Result<CheckoutSessionView, CommerceError>;
}

pub type DynCheckoutResolver = Arc<dyn CheckoutResolver>;

pub struct StripeCheckoutResolver {
    client: stripe::Client,
    timeout: Duration,
}

impl StripeCheckoutResolver {
    pub fn new(client: stripe::Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }
}

/// Used when no provider key is configured. Every lookup reports the provider as down.
pub struct UnconfiguredCheckoutResolver;

#[async_trait::async_trait]
impl CheckoutResolver for UnconfiguredCheckoutResolver {
    async fn resolve(&self, _session_id: &str) -> Result<CheckoutSessionView, CommerceError> {
        Err(CommerceError::ProviderUnavailable(
            "payment provider is not configured".to_string(),
        ))
    }
}

fn classify_stripe_error(err: stripe::StripeError, session_id: &str) -> CommerceError {
    match err {
        stripe::StripeError::Stripe(request) if request.http_status == 404 => {
            CommerceError::SessionNotFound(session_id.to_string())
        }
        other => CommerceError::ProviderUnavailable(other.to_string()),
    }
}

fn convert_line_item(item: &stripe::CheckoutSessionItem) -> CheckoutLineItem {
    let quantity = item
        .quantity
        .and_then(|q| i64::try_from(q).ok())
        .unwrap_or(1)
        .max(1);

    let (product_id, name, unit_amount) = match &item.price {
        Some(price) => {
            let product = price.product.as_ref();
            let product_id = product
                .map(|p| p.id().to_string())
                .unwrap_or_else(|| price.id.to_string());
            let name = product
                .and_then(|p| p.as_object())
                .and_then(|p| p.name.clone());
            (product_id, name, price.unit_amount)
        }
        None => (item.id.to_string(), None, None),
    };

    CheckoutLineItem {
        product_id,
        name,
        quantity,
        unit_price: unit_amount.unwrap_or(item.amount_subtotal / quantity),
        amount_total: item.amount_total,
    }
}

fn convert_session(session: stripe::CheckoutSession) -> CheckoutSessionView {
    let session_id = session.id.to_string();

    let items: Vec<CheckoutLineItem> = session
        .line_items
        .as_ref()
        .map(|list| list.data.iter().map(convert_line_item).collect())
        .unwrap_or_default();

    let details = session.customer_details.as_ref();
    let customer_email = details
        .and_then(|d| d.email.clone())
        .or_else(|| session.customer_email.clone());
    let customer_name = details.and_then(|d| d.name.clone());

    let payment_status = match session.payment_status {
        stripe::CheckoutSessionPaymentStatus::Paid => PaymentState::Paid,
        stripe::CheckoutSessionPaymentStatus::NoPaymentRequired => {
            PaymentState::NoPaymentRequired
        }
        stripe::CheckoutSessionPaymentStatus::Unpaid => PaymentState::Unpaid,
    };

    let amount_total = session
        .amount_total
        .unwrap_or_else(|| items.iter().map(|i| i.amount_total).sum());

    CheckoutSessionView {
        display_id: display_id(&session_id),
        session_id,
        amount_total,
        currency: session
            .currency
            .map(|c| c.to_string().to_lowercase())
            .unwrap_or_else(|| "usd".to_string()),
        customer_email,
        customer_name,
        payment_status,
        items,
    }
}

#[async_trait::async_trait]
impl CheckoutResolver for StripeCheckoutResolver {
    #[tracing::instrument(name = "StripeCheckoutResolver::resolve", skip(self))]
    async fn resolve(&self, session_id: &str) -> Result<CheckoutSessionView, CommerceError> {
        let id = stripe::CheckoutSessionId::from_str(session_id)
            .map_err(|_| CommerceError::SessionNotFound(session_id.to_string()))?;

        let request = stripe::CheckoutSession::retrieve(&self.client, &id, SESSION_EXPAND);
        let session = match tokio::time::timeout(self.timeout, request).await {
            Ok(Ok(session)) => session,
            Ok(Err(err)) => return Err(classify_stripe_error(err, session_id)),
            Err(_) => {
                return Err(CommerceError::ProviderUnavailable(format!(
                    "checkout session lookup timed out after {:?}",
                    self.timeout
                )));
            }
        };

        Ok(convert_session(session))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(payment_status: PaymentState) -> CheckoutSessionView {
        CheckoutSessionView {
            session_id: "cs_test_a1B2c3D4e5F6g7H8".to_string(),
            display_id: display_id("cs_test_a1B2c3D4e5F6g7H8"),
            amount_total: 2200,
            currency: "usd".to_string(),
            customer_email: Some("ada@example.com".to_string()),
            customer_name: None,
            payment_status,
            items: vec![
                CheckoutLineItem {
                    product_id: "prod_A".to_string(),
                    name: Some("A".to_string()),
                    quantity: 2,
                    unit_price: 500,
                    amount_total: 1000,
                },
                CheckoutLineItem {
                    product_id: "prod_B".to_string(),
                    name: Some("B".to_string()),
                    quantity: 1,
                    unit_price: 1200,
                    amount_total: 1200,
                },
            ],
        }
    }

    #[test]
    fn display_id_uses_session_tail() {
        assert_eq!(display_id("cs_test_a1B2c3D4e5F6g7H8"), "ORD-E5F6G7H8");
    }

    #[test]
    fn paid_session_becomes_paid_order() {
        let order = view(PaymentState::Paid).to_new_order().unwrap();
        assert_eq!(order.amount_total, 2200);
        assert_eq!(order.status, OrderStatus::Paid);
        assert_eq!(
            order.checkout_session_id.as_deref(),
            Some("cs_test_a1B2c3D4e5F6g7H8")
        );
        assert_eq!(order.items.len(), 2);
    }

    #[test]
    fn unpaid_session_becomes_pending_order() {
        let order = view(PaymentState::Unpaid).to_new_order().unwrap();
        assert_eq!(order.status, OrderStatus::Pending);
    }

    #[tokio::test]
    async fn malformed_session_id_is_not_found() {
        let resolver = StripeCheckoutResolver::new(
            stripe::Client::new("sk_test_placeholder"),
            Duration::from_secs(1),
        );
        let err = resolver.resolve("not-a-session").await.unwrap_err();
        assert!(matches!(err, CommerceError::SessionNotFound(_)));
    }

    #[tokio::test]
    async fn silent_provider_times_out_as_unavailable() {
        // Accepts connections and never answers.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/", listener.local_addr().unwrap());
        let hold = tokio::spawn(async move {
            let mut open = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                open.push(socket);
            }
        });

        let resolver = StripeCheckoutResolver::new(
            stripe::Client::from_url(url.as_str(), "sk_test_placeholder"),
            Duration::from_millis(200),
        );
        let started = std::time::Instant::now();
        let err = resolver
            .resolve("cs_test_a1B2c3D4e5F6g7H8")
            .await
            .unwrap_err();

        assert!(matches!(err, CommerceError::ProviderUnavailable(_)));
        assert!(started.elapsed() < Duration::from_secs(5));
        hold.abort();
    }
}
