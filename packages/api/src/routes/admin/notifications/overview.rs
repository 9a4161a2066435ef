use crate::error::ApiError;
use crate::middleware::session::AdminSession;
use crate::permission::Operation;
use crate::state::AppState;
use crate::store::NotificationCounts;
use axum::extract::State;
use axum::{Extension, Json};

#[utoipa::path(
    get,
    path = "/admin/notifications/overview",
    tag = "notifications",
    responses(
        (status = 200, description = "Total and unread counts", body = NotificationCounts),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    )
)]
#[tracing::instrument(name = "GET /admin/notifications/overview", skip(state, session))]
pub async fn overview(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
) -> Result<Json<NotificationCounts>, ApiError> {
    session.authorize(&state.capabilities, Operation::ListNotifications)?;

    Ok(Json(state.notifications.notification_counts().await?))
}
