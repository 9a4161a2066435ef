use crate::error::ApiError;
use crate::middleware::session::AdminSession;
use crate::permission::Operation;
use crate::state::AppState;
use axum::Extension;
use axum::extract::{Path, State};
use axum::http::StatusCode;

#[utoipa::path(
    delete,
    path = "/admin/products/{product_id}",
    tag = "catalog",
    params(
        ("product_id" = String, Path, description = "Product ID")
    ),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Product not found")
    )
)]
#[tracing::instrument(name = "DELETE /admin/products/{product_id}", skip(state, session))]
pub async fn delete_product(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
    Path(product_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    session.authorize(&state.capabilities, Operation::ManageCatalog)?;

    state.catalog.delete_product(&product_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
