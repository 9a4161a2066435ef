//! Bulk product edits. One transaction, all patches or none.

use crate::entity::product;
use crate::error::ApiError;
use crate::middleware::session::AdminSession;
use crate::permission::Operation;
use crate::state::AppState;
use crate::store::ProductPatch;
use axum::extract::State;
use axum::{Extension, Json};
use serde::Deserialize;
use utoipa::ToSchema;

const MAX_BULK_PATCHES: usize = 500;

#[derive(Debug, Deserialize, ToSchema)]
pub struct BulkProductPatch {
    pub id: String,
    pub patch: ProductPatch,
}

#[utoipa::path(
    patch,
    path = "/admin/products",
    tag = "catalog",
    request_body = Vec<BulkProductPatch>,
    responses(
        (status = 200, description = "Updated products in request order", body = Vec<product::Model>),
        (status = 400, description = "Invalid patch, nothing was changed"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Unknown product, nothing was changed")
    )
)]
#[tracing::instrument(name = "PATCH /admin/products", skip(state, session, patches), fields(count = patches.len()))]
pub async fn bulk_patch(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
    Json(patches): Json<Vec<BulkProductPatch>>,
) -> Result<Json<Vec<product::Model>>, ApiError> {
    session.authorize(&state.capabilities, Operation::ManageCatalog)?;

    if patches.is_empty() {
        return Err(crate::bad_request!("No patches given"));
    }
    if patches.len() > MAX_BULK_PATCHES {
        return Err(crate::bad_request!(
            "At most {} patches per request",
            MAX_BULK_PATCHES
        ));
    }

    let patches = patches.into_iter().map(|p| (p.id, p.patch)).collect();
    Ok(Json(state.catalog.bulk_patch_products(patches).await?))
}
