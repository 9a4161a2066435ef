use crate::error::ApiError;
use crate::middleware::session::AdminSession;
use crate::permission::Operation;
use crate::state::AppState;
use crate::store::Order;
use axum::extract::State;
use axum::{Extension, Json};

/// All orders with their line items, newest first.
#[utoipa::path(
    get,
    path = "/admin/orders",
    tag = "admin",
    responses(
        (status = 200, description = "Orders, newest first", body = Vec<Order>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    )
)]
#[tracing::instrument(name = "GET /admin/orders", skip(state, session))]
pub async fn list_orders(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
) -> Result<Json<Vec<Order>>, ApiError> {
    session.authorize(&state.capabilities, Operation::ListOrders)?;

    let orders = state.orders.list_orders().await?;
    Ok(Json(orders))
}
