use std::sync::Arc;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use storefront_types::Result;

use crate::commerce::{
    DynCheckoutResolver, NotificationEmitter, OrderService, StripeCheckoutResolver,
    UnconfiguredCheckoutResolver,
};
use crate::config::{ApiConfig, ConfigError, Environment};
use crate::permission::CapabilityTable;
use crate::session_token::SessionSigner;
use crate::store::{
    DatabaseStore, DynAdminStore, DynCatalogStore, DynCustomerStore, DynNotificationStore,
    DynOrderStore,
};

pub type AppState = Arc<State>;

/// Persistence collaborators, one handle per concern.
#[derive(Clone)]
pub struct Stores {
    pub orders: DynOrderStore,
    pub notifications: DynNotificationStore,
    pub admins: DynAdminStore,
    pub customers: DynCustomerStore,
    pub catalog: DynCatalogStore,
}

impl Stores {
    /// Every store backed by the same connection pool.
    pub fn database(db: DatabaseConnection) -> Self {
        let store = Arc::new(DatabaseStore::new(db));
        Stores {
            orders: store.clone(),
            notifications: store.clone(),
            admins: store.clone(),
            customers: store.clone(),
            catalog: store,
        }
    }
}

pub struct State {
    pub config: ApiConfig,
    pub db: Option<DatabaseConnection>,
    pub orders: DynOrderStore,
    pub notifications: DynNotificationStore,
    pub admins: DynAdminStore,
    pub customers: DynCustomerStore,
    pub catalog: DynCatalogStore,
    pub checkout: DynCheckoutResolver,
    pub order_service: OrderService,
    pub sessions: SessionSigner,
    pub capabilities: CapabilityTable,
}

impl State {
    pub async fn new(config: ApiConfig) -> Result<Self> {
        let db = connect(&config).await?;

        let checkout: DynCheckoutResolver = match &config.stripe_secret_key {
            Some(key) => Arc::new(StripeCheckoutResolver::new(
                stripe::Client::new(key.clone()),
                config.checkout_timeout,
            )),
            None => {
                tracing::warn!("STRIPE_SECRET_KEY not set, checkout lookups will fail");
                Arc::new(UnconfiguredCheckoutResolver)
            }
        };

        let mut state = Self::from_parts(config, Stores::database(db.clone()), checkout)?;
        state.db = Some(db);
        Ok(state)
    }

    /// Wires the lifecycle components around explicit collaborators.
    pub fn from_parts(
        config: ApiConfig,
        stores: Stores,
        checkout: DynCheckoutResolver,
    ) -> std::result::Result<Self, ConfigError> {
        let capabilities = config.capability_table()?;
        let sessions = SessionSigner::new(config.session_secret.as_bytes(), config.session_ttl);

        let emitter = NotificationEmitter::new(stores.notifications.clone());
        let order_service = OrderService::new(stores.orders.clone(), checkout.clone(), emitter);

        Ok(State {
            config,
            db: None,
            orders: stores.orders,
            notifications: stores.notifications,
            admins: stores.admins,
            customers: stores.customers,
            catalog: stores.catalog,
            checkout,
            order_service,
            sessions,
            capabilities,
        })
    }
}

async fn connect(config: &ApiConfig) -> Result<DatabaseConnection> {
    let mut opt = ConnectOptions::new(config.database_url.to_owned());
    opt.max_connections(10)
        .min_connections(1)
        .connect_timeout(std::time::Duration::from_secs(8))
        .sqlx_logging(config.platform.environment == Environment::Development);

    Ok(Database::connect(opt).await?)
}
