use crate::entity::notification;
use crate::error::ApiError;
use crate::middleware::session::AdminSession;
use crate::permission::Operation;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::{Extension, Json};

#[utoipa::path(
    post,
    path = "/admin/notifications/{notification_id}/read",
    tag = "notifications",
    params(
        ("notification_id" = String, Path, description = "Notification ID")
    ),
    responses(
        (status = 200, description = "Notification marked read", body = notification::Model),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Notification not found")
    )
)]
#[tracing::instrument(name = "POST /admin/notifications/{notification_id}/read", skip(state, session))]
pub async fn mark_read(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
    Path(notification_id): Path<String>,
) -> Result<Json<notification::Model>, ApiError> {
    session.authorize(&state.capabilities, Operation::UpdateNotifications)?;

    let notification = state.notifications.mark_read(&notification_id).await?;
    Ok(Json(notification))
}
