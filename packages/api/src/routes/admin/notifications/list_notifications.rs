use crate::entity::notification;
use crate::error::ApiError;
use crate::middleware::session::AdminSession;
use crate::permission::Operation;
use crate::state::AppState;
use crate::store::NotificationQuery;
use axum::extract::{Query, State};
use axum::{Extension, Json};

#[utoipa::path(
    get,
    path = "/admin/notifications",
    tag = "notifications",
    params(
        ("limit" = Option<u64>, Query, description = "Page size, at most 100"),
        ("offset" = Option<u64>, Query, description = "Rows to skip"),
        ("unread_only" = Option<bool>, Query, description = "Only unread notifications")
    ),
    responses(
        (status = 200, description = "Notifications, newest first", body = Vec<notification::Model>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    )
)]
#[tracing::instrument(name = "GET /admin/notifications", skip(state, session))]
pub async fn list_notifications(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
    Query(params): Query<NotificationQuery>,
) -> Result<Json<Vec<notification::Model>>, ApiError> {
    session.authorize(&state.capabilities, Operation::ListNotifications)?;

    let notifications = state.notifications.list_notifications(params).await?;
    Ok(Json(notifications))
}
