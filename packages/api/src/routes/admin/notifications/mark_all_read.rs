use crate::error::ApiError;
use crate::middleware::session::AdminSession;
use crate::permission::Operation;
use crate::state::AppState;
use axum::extract::State;
use axum::{Extension, Json};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct MarkAllReadResponse {
    pub updated: u64,
}

#[utoipa::path(
    post,
    path = "/admin/notifications/read-all",
    tag = "notifications",
    responses(
        (status = 200, description = "Number of notifications marked read", body = MarkAllReadResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    )
)]
#[tracing::instrument(name = "POST /admin/notifications/read-all", skip(state, session))]
pub async fn mark_all_read(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
) -> Result<Json<MarkAllReadResponse>, ApiError> {
    session.authorize(&state.capabilities, Operation::UpdateNotifications)?;

    let updated = state.notifications.mark_all_read().await?;
    Ok(Json(MarkAllReadResponse { updated }))
}
