use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};

use crate::{commerce::CheckoutSessionView, error::ApiError, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new().route("/session/{session_id}", get(get_session))
}

/// Order confirmation view for a checkout session. Public.
#[utoipa::path(
    get,
    path = "/checkout/session/{session_id}",
    tag = "checkout",
    params(
        ("session_id" = String, Path, description = "Payment provider checkout session ID")
    ),
    responses(
        (status = 200, description = "Order view synthesized from the session", body = CheckoutSessionView),
        (status = 404, description = "Unknown checkout session"),
        (status = 503, description = "Payment provider unavailable")
    )
)]
#[tracing::instrument(name = "GET /checkout/session/{session_id}", skip(state))]
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<CheckoutSessionView>, ApiError> {
    let view = state.checkout.resolve(&session_id).await?;
    Ok(Json(view))
}
