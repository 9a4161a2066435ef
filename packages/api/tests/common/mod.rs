#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response, header},
};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use serde_json::Value;
use storefront_api::{
    commerce::{CheckoutLineItem, CheckoutResolver, CheckoutSessionView, PaymentState, display_id},
    config::ApiConfig,
    construct_router,
    entity::{admin_user, notification, sea_orm_active_enums::OrderStatus},
    error::CommerceError,
    password::hash_password,
    state::{State, Stores},
    store::{
        AdminStore, DatabaseStore, NewAdmin, NewNotification, NewOrder, NotificationCounts,
        NotificationQuery, NotificationStore, Order, OrderCreation, OrderStore, StoreResult,
        schema::ensure_schema,
    },
};
use tower::ServiceExt;

pub const SESSION_SECRET: &str = "test-secret-test-secret-test-secret";
pub const WEBHOOK_SECRET: &str = "whsec_test_secret";

/// One connection so every query sees the same in-memory database.
pub async fn memory_db() -> DatabaseConnection {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(opt).await.unwrap();
    ensure_schema(&db).await.unwrap();
    db
}

/// Checkout provider double serving canned sessions.
#[derive(Default)]
pub struct FakeResolver {
    sessions: Mutex<HashMap<String, CheckoutSessionView>>,
    unavailable: Mutex<bool>,
    pub calls: AtomicUsize,
}

impl FakeResolver {
    pub fn insert(&self, view: CheckoutSessionView) {
        self.sessions
            .lock()
            .unwrap()
            .insert(view.session_id.clone(), view);
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        *self.unavailable.lock().unwrap() = unavailable;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl CheckoutResolver for FakeResolver {
    async fn resolve(&self, session_id: &str) -> Result<CheckoutSessionView, CommerceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if *self.unavailable.lock().unwrap() {
            return Err(CommerceError::ProviderUnavailable("connection reset".into()));
        }
        self.sessions
            .lock()
            .unwrap()
            .get(session_id)
            .cloned()
            .ok_or_else(|| CommerceError::SessionNotFound(session_id.to_string()))
    }
}

/// A paid session for 2 × A at 500 and 1 × B at 1200.
pub fn paid_session(session_id: &str, customer_name: Option<&str>) -> CheckoutSessionView {
    CheckoutSessionView {
        session_id: session_id.to_string(),
        display_id: display_id(session_id),
        amount_total: 2200,
        currency: "usd".to_string(),
        customer_email: Some("ada@example.com".to_string()),
        customer_name: customer_name.map(str::to_string),
        payment_status: PaymentState::Paid,
        items: vec![
            CheckoutLineItem {
                product_id: "prod_A".to_string(),
                name: Some("Mug".to_string()),
                quantity: 2,
                unit_price: 500,
                amount_total: 1000,
            },
            CheckoutLineItem {
                product_id: "prod_B".to_string(),
                name: Some("Poster".to_string()),
                quantity: 1,
                unit_price: 1200,
                amount_total: 1200,
            },
        ],
    }
}

/// Order store wrapper counting every call that reaches it.
pub struct CountingOrderStore {
    inner: DatabaseStore,
    pub calls: AtomicUsize,
}

impl CountingOrderStore {
    pub fn new(inner: DatabaseStore) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl OrderStore for CountingOrderStore {
    async fn create_order(&self, order: NewOrder) -> StoreResult<OrderCreation> {
        self.hit();
        self.inner.create_order(order).await
    }

    async fn get_order(&self, order_id: &str) -> StoreResult<Order> {
        self.hit();
        self.inner.get_order(order_id).await
    }

    async fn find_by_checkout_session(&self, session_id: &str) -> StoreResult<Option<Order>> {
        self.hit();
        self.inner.find_by_checkout_session(session_id).await
    }

    async fn list_orders(&self) -> StoreResult<Vec<Order>> {
        self.hit();
        self.inner.list_orders().await
    }

    async fn update_status(
        &self,
        order_id: &str,
        from: OrderStatus,
        to: OrderStatus,
    ) -> StoreResult<Order> {
        self.hit();
        self.inner.update_status(order_id, from, to).await
    }
}

/// Notification store that refuses every write.
pub struct BrokenNotificationStore {
    inner: DatabaseStore,
}

impl BrokenNotificationStore {
    pub fn new(inner: DatabaseStore) -> Self {
        Self { inner }
    }
}

#[async_trait::async_trait]
impl NotificationStore for BrokenNotificationStore {
    async fn create_notification(
        &self,
        _notification: NewNotification,
    ) -> StoreResult<notification::Model> {
        Err(CommerceError::Persistence(sea_orm::DbErr::Custom(
            "disk full".to_string(),
        )))
    }

    async fn list_notifications(
        &self,
        query: NotificationQuery,
    ) -> StoreResult<Vec<notification::Model>> {
        self.inner.list_notifications(query).await
    }

    async fn notifications_for_order(
        &self,
        order_id: &str,
    ) -> StoreResult<Vec<notification::Model>> {
        self.inner.notifications_for_order(order_id).await
    }

    async fn notification_counts(&self) -> StoreResult<NotificationCounts> {
        self.inner.notification_counts().await
    }

    async fn mark_read(&self, notification_id: &str) -> StoreResult<notification::Model> {
        self.inner.mark_read(notification_id).await
    }

    async fn mark_all_read(&self) -> StoreResult<u64> {
        self.inner.mark_all_read().await
    }
}

/// Admin store whose backing database is unreachable.
pub struct BrokenAdminStore;

#[async_trait::async_trait]
impl AdminStore for BrokenAdminStore {
    async fn find_admin(&self, _username: &str) -> StoreResult<Option<admin_user::Model>> {
        Err(CommerceError::Persistence(sea_orm::DbErr::Custom(
            "connection refused".to_string(),
        )))
    }

    async fn create_admin(&self, _admin: NewAdmin) -> StoreResult<admin_user::Model> {
        Err(CommerceError::Persistence(sea_orm::DbErr::Custom(
            "connection refused".to_string(),
        )))
    }
}

pub struct TestApp {
    pub state: Arc<State>,
    pub router: Router,
    pub db: DatabaseConnection,
    pub resolver: Arc<FakeResolver>,
    pub orders: Arc<CountingOrderStore>,
}

impl TestApp {
    pub async fn new() -> Self {
        let db = memory_db().await;
        let stores = Stores::database(db.clone());
        Self::with_stores(db, stores).await
    }

    /// Same as [`TestApp::new`] but notification writes always fail.
    pub async fn with_broken_notifications() -> Self {
        let db = memory_db().await;
        let mut stores = Stores::database(db.clone());
        stores.notifications = Arc::new(BrokenNotificationStore::new(DatabaseStore::new(
            db.clone(),
        )));
        Self::with_stores(db, stores).await
    }

    /// Same as [`TestApp::new`] but admin lookups always fail.
    pub async fn with_broken_admins() -> Self {
        let db = memory_db().await;
        let mut stores = Stores::database(db.clone());
        stores.admins = Arc::new(BrokenAdminStore);
        Self::with_stores(db, stores).await
    }

    async fn with_stores(db: DatabaseConnection, mut stores: Stores) -> Self {
        let orders = Arc::new(CountingOrderStore::new(DatabaseStore::new(db.clone())));
        stores.orders = orders.clone();

        let resolver = Arc::new(FakeResolver::default());
        let mut config = ApiConfig::for_testing(SESSION_SECRET).unwrap();
        config.stripe_webhook_secret = Some(WEBHOOK_SECRET.to_string());
        let state = Arc::new(State::from_parts(config, stores, resolver.clone()).unwrap());
        let router = construct_router(state.clone());

        TestApp {
            state,
            router,
            db,
            resolver,
            orders,
        }
    }

    /// Creates an admin and returns a session token for it.
    pub async fn admin(&self, username: &str, permissions: &[&str], is_super_admin: bool) -> String {
        self.state
            .admins
            .create_admin(NewAdmin {
                username: username.to_string(),
                password_hash: hash_password("admin-password").unwrap(),
                permissions: permissions.iter().map(|p| p.to_string()).collect(),
                is_super_admin,
            })
            .await
            .unwrap();
        self.state.sessions.sign(username).unwrap()
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> Response<Body> {
        self.send(request("GET", path, token, None)).await
    }

    pub async fn json(
        &self,
        method: &str,
        path: &str,
        token: Option<&str>,
        body: Value,
    ) -> Response<Body> {
        self.send(request(method, path, token, Some(body))).await
    }
}

pub fn request(method: &str, path: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(format!("/api/v1{}", path));
    if let Some(token) = token {
        builder = builder.header(header::COOKIE, format!("admin_session={}", token));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
