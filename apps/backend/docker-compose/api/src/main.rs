#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use axum::{Router, routing::get};
use std::sync::Arc;
use storefront_api::{
    config::ApiConfig,
    construct_router,
    error::CommerceError,
    password::hash_password_blocking,
    state::State,
    store::{NewAdmin, schema::ensure_schema},
};

mod config;
mod metrics;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    metrics::init_telemetry()?;

    tracing::info!("Starting Storefront API Service");

    let config = config::Config::from_env()?;
    let api_config = ApiConfig::from_env()?;
    tracing::info!(?api_config, "Loaded configuration");

    let state = Arc::new(State::new(api_config).await?);

    if config.auto_migrate
        && let Some(db) = &state.db
    {
        ensure_schema(db).await?;
    }

    if let Some(bootstrap) = &config.bootstrap_admin {
        bootstrap_admin(&state, bootstrap).await?;
    }

    let app = Router::new()
        .merge(construct_router(state.clone()))
        .route("/metrics", get(metrics::handler));

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn bootstrap_admin(
    state: &State,
    bootstrap: &config::BootstrapAdmin,
) -> Result<(), Box<dyn std::error::Error>> {
    if state.admins.find_admin(&bootstrap.username).await?.is_some() {
        tracing::debug!(username = %bootstrap.username, "Bootstrap admin already exists");
        return Ok(());
    }

    let admin = NewAdmin {
        username: bootstrap.username.clone(),
        password_hash: hash_password_blocking(bootstrap.password.clone()).await?,
        permissions: Vec::new(),
        is_super_admin: true,
    };

    match state.admins.create_admin(admin).await {
        Ok(_) => tracing::info!(username = %bootstrap.username, "Created bootstrap admin"),
        // Another replica created it first.
        Err(CommerceError::Conflict(_)) => {}
        Err(err) => return Err(err.into()),
    }
    Ok(())
}
