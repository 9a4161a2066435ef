use crate::entity::product;
use crate::error::ApiError;
use crate::middleware::session::AdminSession;
use crate::permission::Operation;
use crate::state::AppState;
use axum::extract::State;
use axum::{Extension, Json};

#[utoipa::path(
    get,
    path = "/admin/products",
    tag = "catalog",
    responses(
        (status = 200, description = "Products ordered by name", body = Vec<product::Model>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    )
)]
#[tracing::instrument(name = "GET /admin/products", skip(state, session))]
pub async fn list_products(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
) -> Result<Json<Vec<product::Model>>, ApiError> {
    session.authorize(&state.capabilities, Operation::ManageCatalog)?;

    Ok(Json(state.catalog.list_products().await?))
}
