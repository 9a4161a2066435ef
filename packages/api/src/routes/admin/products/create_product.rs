use crate::entity::product;
use crate::error::ApiError;
use crate::middleware::session::AdminSession;
use crate::permission::Operation;
use crate::state::AppState;
use crate::store::NewProduct;
use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};

#[utoipa::path(
    post,
    path = "/admin/products",
    tag = "catalog",
    request_body = NewProduct,
    responses(
        (status = 201, description = "Product created", body = product::Model),
        (status = 400, description = "Invalid product"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    )
)]
#[tracing::instrument(name = "POST /admin/products", skip(state, session, new_product))]
pub async fn create_product(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
    Json(new_product): Json<NewProduct>,
) -> Result<(StatusCode, Json<product::Model>), ApiError> {
    session.authorize(&state.capabilities, Operation::ManageCatalog)?;

    let product = state.catalog.create_product(new_product).await?;
    tracing::info!(product_id = %product.id, "Product created");
    Ok((StatusCode::CREATED, Json(product)))
}
