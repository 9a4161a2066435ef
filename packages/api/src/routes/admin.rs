use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::state::AppState;

pub mod notifications;
pub mod orders;
pub mod products;
pub mod session;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(session::login))
        .route("/logout", post(session::logout))
        .route("/profile", get(session::profile))
        .route("/orders", get(orders::list_orders::list_orders))
        .route("/orders/{order_id}", get(orders::get_order::get_order))
        .route(
            "/orders/{order_id}/status",
            patch(orders::update_status::update_status),
        )
        .route(
            "/notifications",
            get(notifications::list_notifications::list_notifications),
        )
        .route(
            "/notifications/overview",
            get(notifications::overview::overview),
        )
        .route(
            "/notifications/read-all",
            post(notifications::mark_all_read::mark_all_read),
        )
        .route(
            "/notifications/{notification_id}/read",
            post(notifications::mark_read::mark_read),
        )
        .route(
            "/products",
            get(products::list_products::list_products)
                .post(products::create_product::create_product)
                .patch(products::bulk_patch::bulk_patch),
        )
        .route(
            "/products/{product_id}",
            patch(products::patch_product::patch_product)
                .delete(products::delete_product::delete_product),
        )
}
