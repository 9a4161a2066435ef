use crate::entity::product;
use crate::error::ApiError;
use crate::middleware::session::AdminSession;
use crate::permission::Operation;
use crate::state::AppState;
use crate::store::ProductPatch;
use axum::extract::{Path, State};
use axum::{Extension, Json};

#[utoipa::path(
    patch,
    path = "/admin/products/{product_id}",
    tag = "catalog",
    params(
        ("product_id" = String, Path, description = "Product ID")
    ),
    request_body = ProductPatch,
    responses(
        (status = 200, description = "Updated product", body = product::Model),
        (status = 400, description = "Invalid or empty patch"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Product not found")
    )
)]
#[tracing::instrument(name = "PATCH /admin/products/{product_id}", skip(state, session, patch))]
pub async fn patch_product(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
    Path(product_id): Path<String>,
    Json(patch): Json<ProductPatch>,
) -> Result<Json<product::Model>, ApiError> {
    session.authorize(&state.capabilities, Operation::ManageCatalog)?;

    Ok(Json(state.catalog.patch_product(&product_id, patch).await?))
}
