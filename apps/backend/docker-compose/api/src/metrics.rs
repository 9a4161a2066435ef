use axum::{http::StatusCode, response::IntoResponse};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

pub fn init_telemetry() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    init_metrics()
}

fn init_metrics() -> Result<(), Box<dyn std::error::Error>> {
    let handle = PrometheusBuilder::new().install_recorder()?;

    if PROMETHEUS_HANDLE.set(handle).is_err() {
        return Err("metrics already initialized".into());
    }

    metrics::describe_counter!("orders_created_total", "Orders created");
    metrics::describe_counter!(
        "orders_deduplicated_total",
        "Order creations absorbed by an existing order for the same checkout session"
    );
    metrics::describe_counter!("notifications_created_total", "Admin notifications created");
    metrics::describe_counter!(
        "notifications_failed_total",
        "Admin notifications that could not be persisted"
    );
    metrics::describe_counter!(
        "order_status_transitions_total",
        "Order status changes by source and target status"
    );
    metrics::describe_counter!("api_errors_reported_total", "Reported 5xx responses");
    metrics::describe_counter!(
        "admin_session_lookup_failed_total",
        "Admin sessions dropped to anonymous because the admin lookup failed"
    );

    tracing::info!("Prometheus metrics initialized");
    Ok(())
}

pub async fn handler() -> impl IntoResponse {
    match PROMETHEUS_HANDLE.get() {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            "metrics not initialized".to_string(),
        ),
    }
}
