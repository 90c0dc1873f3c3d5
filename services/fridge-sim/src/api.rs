//! HTTP API: tenant status, live reading, fridge controls and the kiosk inventory

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::config::TenantConfig;
use crate::controls::Controls;
use crate::inventory::Inventory;
use crate::simulator::SimulatorHandle;

/// Shared handle to the operator controls
pub type ControlsHandle = Arc<RwLock<Controls>>;

/// API application state
#[derive(Clone)]
pub struct ApiState {
    pub simulator: SimulatorHandle,
    pub controls: ControlsHandle,
    pub inventory: Arc<Inventory>,
    pub tenant: TenantConfig,
    pub port: u16,
}

impl ApiState {
    pub fn new(simulator: SimulatorHandle, tenant: TenantConfig, port: u16) -> Self {
        let controls = Controls::within(&simulator.config().temperature);
        Self {
            simulator,
            controls: Arc::new(RwLock::new(controls)),
            inventory: Arc::new(Inventory::seed()),
            tenant,
            port,
        }
    }
}

/// Build the axum router
pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/api/tenant/status", get(tenant_status_handler))
        .route("/api/tenant/config", get(tenant_config_handler))
        .route("/api/reading", get(reading_handler))
        .route("/api/controls", get(controls_handler))
        .route("/api/controls/target", post(adjust_target_handler))
        .route("/api/controls/compressor", put(compressor_handler))
        .route("/api/inventory", get(inventory_handler))
        .route("/api/alerts", get(alerts_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

async fn tenant_status_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "tenant": "nufridge",
        "name": "NU Fridge",
        "status": "active",
        "architecture": "multi-image",
    }))
}

async fn tenant_config_handler(State(api): State<ApiState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "tenant": api.tenant.id,
        "name": api.tenant.name,
        "backend_url": api.tenant.backend_url,
        "telemetry_url": api.tenant.telemetry_url,
        "port": api.port,
    }))
}

async fn reading_handler(State(api): State<ApiState>) -> impl IntoResponse {
    Json(api.simulator.current_reading())
}

async fn controls_handler(State(api): State<ApiState>) -> impl IntoResponse {
    Json(*api.controls.read().await)
}

#[derive(Debug, Deserialize)]
struct TargetAdjust {
    delta: f64,
}

async fn adjust_target_handler(
    State(api): State<ApiState>,
    Json(body): Json<TargetAdjust>,
) -> impl IntoResponse {
    if !body.delta.is_finite() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "delta must be a finite number" })),
        )
            .into_response();
    }

    let bounds = api.simulator.config().temperature;
    let mut controls = api.controls.write().await;
    let target = controls.adjust_target(body.delta, &bounds);
    tracing::debug!("Target temperature adjusted by {} to {}", body.delta, target);

    Json(*controls).into_response()
}

#[derive(Debug, Deserialize)]
struct CompressorSwitch {
    on: bool,
}

async fn compressor_handler(
    State(api): State<ApiState>,
    Json(body): Json<CompressorSwitch>,
) -> impl IntoResponse {
    let mut controls = api.controls.write().await;
    controls.set_compressor(body.on);
    tracing::debug!("Compressor switched {}", if body.on { "on" } else { "off" });

    Json(*controls)
}

async fn inventory_handler(State(api): State<ApiState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": api.inventory.status,
        "items": api.inventory.items,
        "total_quantity": api.inventory.total_quantity(),
    }))
}

async fn alerts_handler(State(api): State<ApiState>) -> impl IntoResponse {
    Json(api.inventory.alerts.clone())
}

async fn health_handler() -> impl IntoResponse {
    "OK"
}
