//! Admin-driven order status changes

use crate::entity::sea_orm_active_enums::OrderStatus;
use crate::error::ApiError;
use crate::middleware::session::AdminSession;
use crate::permission::Operation;
use crate::state::AppState;
use crate::store::Order;
use axum::extract::{Path, State};
use axum::{Extension, Json};
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct StatusUpdate {
    /// Target status, case-insensitive
    pub status: String,
}

#[utoipa::path(
    patch,
    path = "/admin/orders/{order_id}/status",
    tag = "admin",
    params(
        ("order_id" = String, Path, description = "Order ID")
    ),
    request_body = StatusUpdate,
    responses(
        (status = 200, description = "Updated order", body = Order),
        (status = 400, description = "Unknown status"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Transition not allowed from the current status")
    )
)]
#[tracing::instrument(name = "PATCH /admin/orders/{order_id}/status", skip(state, session))]
pub async fn update_status(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
    Path(order_id): Path<String>,
    Json(update): Json<StatusUpdate>,
) -> Result<Json<Order>, ApiError> {
    let admin = session.authorize(&state.capabilities, Operation::UpdateOrderStatus)?;

    let target: OrderStatus = update.status.parse()?;
    let order = state.order_service.transition(&order_id, target).await?;

    tracing::info!(admin = %admin.username, status = %order.status, "Order status updated");
    Ok(Json(order))
}
