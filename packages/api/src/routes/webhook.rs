use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
};
use stripe::{Event, EventObject, EventType, Webhook};

use crate::{error::ApiError, state::AppState, store::OrderCreation};

pub fn routes() -> Router<AppState> {
    Router::new().route("/stripe", post(stripe_webhook))
}

/// Records orders for completed checkout sessions.
///
/// Failures return an error status so the provider redelivers; redeliveries are
/// absorbed by the per-session idempotency of order creation.
#[utoipa::path(
    post,
    path = "/webhook/stripe",
    tag = "webhook",
    request_body(content = String, content_type = "application/json", description = "Signed provider event"),
    responses(
        (status = 200, description = "Event accepted"),
        (status = 400, description = "Missing or invalid signature"),
        (status = 503, description = "Payment provider unavailable, retry later")
    )
)]
#[tracing::instrument(name = "POST /webhook/stripe", skip(state, headers, payload))]
pub async fn stripe_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Bytes,
) -> Result<StatusCode, ApiError> {
    let webhook_secret = state
        .config
        .stripe_webhook_secret
        .as_deref()
        .ok_or_else(|| ApiError::internal("Webhook secret not configured"))?;

    let signature = headers
        .get("stripe-signature")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::bad_request("Missing stripe-signature header"))?;

    let payload_str = std::str::from_utf8(&payload)
        .map_err(|_| ApiError::bad_request("Invalid UTF-8 in payload"))?;

    let event = Webhook::construct_event(payload_str, signature, webhook_secret)
        .map_err(|e| ApiError::bad_request(format!("Invalid webhook signature: {}", e)))?;

    handle_stripe_event(&state, &event).await?;
    Ok(StatusCode::OK)
}

async fn handle_stripe_event(state: &AppState, event: &Event) -> Result<(), ApiError> {
    match event.type_ {
        EventType::CheckoutSessionCompleted => {
            if let EventObject::CheckoutSession(session) = &event.data.object {
                handle_checkout_completed(state, session).await?;
            }
        }
        _ => {
            tracing::debug!(event_type = %event.type_, "Unhandled event type");
        }
    }

    Ok(())
}

async fn handle_checkout_completed(
    state: &AppState,
    session: &stripe::CheckoutSession,
) -> Result<(), ApiError> {
    let session_id = session.id.to_string();

    tracing::info!(
        session_id = %session_id,
        payment_status = ?session.payment_status,
        "Processing checkout.session.completed"
    );

    match state.order_service.record_checkout(&session_id).await? {
        OrderCreation::Created(order) => {
            tracing::info!(order_id = %order.id, "Order recorded from checkout");
        }
        OrderCreation::Existing(order) => {
            tracing::info!(order_id = %order.id, "Checkout already recorded");
        }
    }

    Ok(())
}
