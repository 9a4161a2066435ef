use std::sync::Arc;

use axum::{
    Json, Router,
    middleware::{from_fn, from_fn_with_state},
    routing::get,
};
use middleware::{error_reporting::error_reporting_middleware, session::session_middleware};
use state::State;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, decompression::RequestDecompressionLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;

pub mod commerce;
pub mod config;
pub mod entity;
pub mod error;
pub mod middleware;
pub mod money;
pub mod openapi;
pub mod password;
pub mod permission;
pub mod session_token;
pub mod state;
pub mod store;

mod routes;

pub use axum;
pub use sea_orm;

pub fn construct_router(state: Arc<State>) -> Router {
    let router = Router::new()
        .nest("/health", routes::health::routes())
        .nest("/admin", routes::admin::routes())
        .nest("/auth", routes::auth::routes())
        .nest("/checkout", routes::checkout::routes())
        .nest("/webhook", routes::webhook::routes())
        .with_state(state.clone())
        .route("/openapi.json", get(openapi_json))
        .route("/version", get(|| async { env!("CARGO_PKG_VERSION") }))
        .layer(from_fn(error_reporting_middleware))
        .layer(from_fn_with_state(state.clone(), session_middleware))
        .layer(CorsLayer::permissive())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(RequestDecompressionLayer::new())
                .layer(CompressionLayer::new()),
        );

    Router::new().nest("/api/v1", router)
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(openapi::ApiDoc::openapi())
}
