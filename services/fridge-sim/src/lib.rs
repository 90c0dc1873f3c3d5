//! Fridge Sim
//!
//! Synthetic fridge telemetry (temperature, humidity, power draw and a flaky
//! connectivity flag) produced on a fixed cadence, served over a small HTTP
//! API next to a static tenant status endpoint and the kiosk inventory.

pub mod api;
pub mod cli;
pub mod clock;
pub mod config;
pub mod controls;
pub mod error;
pub mod inventory;
pub mod random;
pub mod reading;
pub mod simulator;

pub use api::{build_router, ApiState};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{
    load_config, Bounds, Config, ConnectivityModel, ServerConfig, SimulatorConfig,
    SimulatorProfile, TenantConfig,
};
pub use controls::Controls;
pub use error::{FridgeSimError, Result};
pub use inventory::{Alert, AlertKind, Category, DeviceStatus, Inventory, InventoryItem};
pub use random::{RandomSource, RngSource, ScriptedSource};
pub use reading::Reading;
pub use simulator::{start, Simulator, SimulatorHandle};

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Run the service until Ctrl-C
pub async fn run(config: Config, rng: Box<dyn RandomSource>) -> Result<()> {
    let cancel = CancellationToken::new();

    let cancel_for_signal = cancel.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for ctrl-c: {}", e);
            return;
        }
        info!("Shutdown signal received");
        cancel_for_signal.cancel();
    });

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    let listener = TcpListener::bind(addr).await.map_err(|e| {
        FridgeSimError::Server(format!(
            "Failed to bind port {}: {}",
            config.server.port, e
        ))
    })?;

    run_with_listener(config, rng, listener, cancel).await
}

/// Run the service on an already bound listener until `cancel` fires
pub async fn run_with_listener(
    config: Config,
    rng: Box<dyn RandomSource>,
    listener: TcpListener,
    cancel: CancellationToken,
) -> Result<()> {
    let local_addr = listener.local_addr()?;

    let simulator = simulator::start(config.simulator.clone(), rng, Arc::new(SystemClock))?;
    let state = ApiState::new(simulator.clone(), config.tenant.clone(), local_addr.port());
    let router = build_router(state);

    info!(
        "Serving tenant '{}' ({}) on http://{}",
        config.tenant.name, config.tenant.id, local_addr
    );
    debug!(
        "Backend URL: {}, telemetry URL: {}",
        config.tenant.backend_url, config.tenant.telemetry_url
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            cancel.cancelled().await;
        })
        .await?;

    simulator.stop();
    debug!(
        "Simulator stopped after {} ticks, tick task finished: {}",
        simulator.tick_count(),
        simulator.is_finished()
    );
    info!("Server stopped");

    Ok(())
}
