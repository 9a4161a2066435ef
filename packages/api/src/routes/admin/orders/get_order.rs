use crate::error::ApiError;
use crate::middleware::session::AdminSession;
use crate::permission::Operation;
use crate::state::AppState;
use crate::store::Order;
use axum::extract::{Path, State};
use axum::{Extension, Json};

#[utoipa::path(
    get,
    path = "/admin/orders/{order_id}",
    tag = "admin",
    params(
        ("order_id" = String, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Order with items", body = Order),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Order not found")
    )
)]
#[tracing::instrument(name = "GET /admin/orders/{order_id}", skip(state, session))]
pub async fn get_order(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
    Path(order_id): Path<String>,
) -> Result<Json<Order>, ApiError> {
    session.authorize(&state.capabilities, Operation::ViewOrder)?;

    let order = state.orders.get_order(&order_id).await?;
    Ok(Json(order))
}
