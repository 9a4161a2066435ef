mod common;

use axum::http::StatusCode;
use common::{TestApp, body_json, paid_session};

#[tokio::test]
async fn known_session_is_resolved_for_confirmation_page() {
    let app = TestApp::new().await;
    app.resolver
        .insert(paid_session("cs_test_a1B2c3D4e5F6g7H8", Some("Ada Lovelace")));

    let response = app
        .get("/checkout/session/cs_test_a1B2c3D4e5F6g7H8", None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["displayId"], "ORD-E5F6G7H8");
    assert_eq!(body["amountTotal"], 2200);
    assert_eq!(body["paymentStatus"], "paid");
    assert_eq!(body["items"].as_array().unwrap().len(), 2);
    assert_eq!(body["items"][0]["unitPrice"], 500);

    // Viewing a session is read-only.
    assert!(app.state.orders.list_orders().await.unwrap().is_empty());
}

#[tokio::test]
async fn unknown_session_is_not_found() {
    let app = TestApp::new().await;

    let response = app.get("/checkout/session/cs_test_missing", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"]["code"], "SESSION_NOT_FOUND");
}

#[tokio::test]
async fn provider_outage_is_distinct_from_not_found() {
    let app = TestApp::new().await;
    app.resolver.insert(paid_session("cs_test_outage", None));
    app.resolver.set_unavailable(true);

    let response = app.get("/checkout/session/cs_test_outage", None).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
        body_json(response).await["error"]["code"],
        "PROVIDER_UNAVAILABLE"
    );

    app.resolver.set_unavailable(false);
    let retry = app.get("/checkout/session/cs_test_outage", None).await;
    assert_eq!(retry.status(), StatusCode::OK);
    assert_eq!(app.resolver.calls(), 2);
}

#[tokio::test]
async fn provider_outage_during_recording_creates_nothing() {
    let app = TestApp::new().await;
    app.resolver.set_unavailable(true);

    assert!(
        app.state
            .order_service
            .record_checkout("cs_test_outage")
            .await
            .is_err()
    );
    assert!(app.state.orders.list_orders().await.unwrap().is_empty());
}
