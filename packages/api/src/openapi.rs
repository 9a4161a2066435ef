use utoipa::{
    Modify, OpenApi,
    openapi::security::{ApiKey, ApiKeyValue, Http, HttpAuthScheme, SecurityScheme},
};

/// Admin session security schemes.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);

        components.add_security_scheme(
            "admin_session",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "admin_session",
                "Session cookie set by POST /admin/login",
            ))),
        );

        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                Http::builder()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Admin session token for API clients"))
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Storefront API",
        version = "1.0.0",
        description = "Storefront administration and checkout API.\n\nMoney is always an integer amount in minor units (cents) together with a lower-case ISO currency code.\n\n## Authentication\n\nAdmin routes require a session obtained from `POST /admin/login`, sent either as the `admin_session` cookie or as `Authorization: Bearer <token>`."
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Customer accounts"),
        (name = "admin", description = "Admin session and order management"),
        (name = "notifications", description = "Admin notification feed"),
        (name = "catalog", description = "Product catalog maintenance"),
        (name = "checkout", description = "Checkout session lookup"),
        (name = "webhook", description = "Payment provider webhooks")
    ),
    paths(
        crate::routes::health::health,
        crate::routes::health::db_health,
        crate::routes::auth::signup,
        crate::routes::checkout::get_session,
        crate::routes::webhook::stripe_webhook,
        crate::routes::admin::session::login,
        crate::routes::admin::session::logout,
        crate::routes::admin::session::profile,
        crate::routes::admin::orders::list_orders::list_orders,
        crate::routes::admin::orders::get_order::get_order,
        crate::routes::admin::orders::update_status::update_status,
        crate::routes::admin::notifications::list_notifications::list_notifications,
        crate::routes::admin::notifications::overview::overview,
        crate::routes::admin::notifications::mark_read::mark_read,
        crate::routes::admin::notifications::mark_all_read::mark_all_read,
        crate::routes::admin::products::list_products::list_products,
        crate::routes::admin::products::create_product::create_product,
        crate::routes::admin::products::patch_product::patch_product,
        crate::routes::admin::products::bulk_patch::bulk_patch,
        crate::routes::admin::products::delete_product::delete_product,
    ),
    components(schemas(
        crate::routes::health::HealthResponse,
        crate::routes::health::DbHealthResponse,
        crate::routes::auth::SignupRequest,
        crate::routes::auth::CustomerProfile,
        crate::routes::admin::session::LoginRequest,
        crate::routes::admin::session::LogoutResponse,
        crate::routes::admin::session::AdminProfile,
        crate::routes::admin::orders::update_status::StatusUpdate,
        crate::routes::admin::notifications::mark_all_read::MarkAllReadResponse,
        crate::routes::admin::products::bulk_patch::BulkProductPatch,
        crate::commerce::CheckoutSessionView,
        crate::commerce::CheckoutLineItem,
        crate::commerce::PaymentState,
        crate::store::Order,
        crate::store::OrderItem,
        crate::store::NotificationCounts,
        crate::store::NewProduct,
        crate::store::ProductPatch,
        crate::entity::sea_orm_active_enums::OrderStatus,
        crate::entity::sea_orm_active_enums::NotificationType,
        crate::entity::notification::Model,
        crate::entity::product::Model,
    ))
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_admin_routes() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/admin/orders/{order_id}/status"));
        assert!(doc.paths.paths.contains_key("/checkout/session/{session_id}"));
    }
}
