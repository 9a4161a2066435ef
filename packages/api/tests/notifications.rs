mod common;

use std::time::Duration;

use axum::http::StatusCode;
use common::{TestApp, body_json, paid_session};
use serde_json::json;

async fn seed_two_orders(app: &TestApp) {
    for (session, name) in [("cs_test_feed_one", "Ada"), ("cs_test_feed_two", "Grace")] {
        app.resolver.insert(paid_session(session, Some(name)));
        app.state
            .order_service
            .record_checkout(session)
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}

#[tokio::test]
async fn feed_tracks_read_state() {
    let app = TestApp::new().await;
    let token = app
        .admin("ops", &["notifications.read", "notifications.write"], false)
        .await;
    seed_two_orders(&app).await;

    let overview = body_json(app.get("/admin/notifications/overview", Some(&token)).await).await;
    assert_eq!(overview["notificationsCount"], 2);
    assert_eq!(overview["unreadCount"], 2);

    let feed = body_json(app.get("/admin/notifications", Some(&token)).await).await;
    let feed = feed.as_array().unwrap();
    assert_eq!(feed.len(), 2);
    assert!(feed[0]["message"].as_str().unwrap().contains("from Grace"));
    assert_eq!(feed[0]["type"], "NEW_ORDER");

    let newest = feed[0]["id"].as_str().unwrap().to_string();
    let marked = app
        .json(
            "POST",
            &format!("/admin/notifications/{}/read", newest),
            Some(&token),
            json!({}),
        )
        .await;
    assert_eq!(marked.status(), StatusCode::OK);
    assert_eq!(body_json(marked).await["read"], true);

    let unread = body_json(
        app.get("/admin/notifications?unread_only=true", Some(&token))
            .await,
    )
    .await;
    assert_eq!(unread.as_array().unwrap().len(), 1);

    let all = app
        .json("POST", "/admin/notifications/read-all", Some(&token), json!({}))
        .await;
    assert_eq!(body_json(all).await["updated"], 1);

    let overview = body_json(app.get("/admin/notifications/overview", Some(&token)).await).await;
    assert_eq!(overview["unreadCount"], 0);
    assert_eq!(overview["notificationsCount"], 2);
}

#[tokio::test]
async fn feed_paginates() {
    let app = TestApp::new().await;
    let token = app.admin("ops", &["notifications.read"], false).await;
    seed_two_orders(&app).await;

    let page = body_json(
        app.get("/admin/notifications?limit=1&offset=1", Some(&token))
            .await,
    )
    .await;
    let page = page.as_array().unwrap();
    assert_eq!(page.len(), 1);
    assert!(page[0]["message"].as_str().unwrap().contains("from Ada"));
}

#[tokio::test]
async fn marking_unknown_notification_is_not_found() {
    let app = TestApp::new().await;
    let token = app.admin("ops", &["notifications.write"], false).await;

    let response = app
        .json(
            "POST",
            "/admin/notifications/missing/read",
            Some(&token),
            json!({}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn reading_the_feed_requires_read_capability() {
    let app = TestApp::new().await;
    let token = app.admin("ops", &["notifications.write"], false).await;

    let response = app.get("/admin/notifications", Some(&token)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
