//! BDD test world for fridge-sim

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use cucumber::World;
use fridge_sim::api::ControlsHandle;
use fridge_sim::{FixedClock, FridgeSimError, Reading, SimulatorConfig, SimulatorHandle};
use tokio::runtime::Runtime;

#[derive(Debug, World)]
#[world(init = Self::new)]
pub struct FridgeWorld {
    pub runtime: Runtime,
    pub started_at: DateTime<Utc>,
    pub clock: Arc<FixedClock>,

    // Simulator testing
    pub config: SimulatorConfig,
    pub script: Option<Vec<f64>>,
    pub handle: Option<SimulatorHandle>,
    pub start_error: Option<FridgeSimError>,
    pub readings: Arc<Mutex<Vec<Reading>>>,

    // API testing
    pub controls: Option<ControlsHandle>,
    pub response_status: Option<u16>,
    pub response_json: Option<serde_json::Value>,
}

impl FridgeWorld {
    fn new() -> Self {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .start_paused(true)
            .build()
            .expect("failed to build test runtime");

        let started_at = Utc
            .with_ymd_and_hms(2025, 9, 28, 10, 30, 0)
            .single()
            .expect("valid start time");

        Self {
            runtime,
            started_at,
            clock: Arc::new(FixedClock::new(started_at)),
            config: SimulatorConfig::default(),
            script: None,
            handle: None,
            start_error: None,
            readings: Arc::new(Mutex::new(Vec::new())),
            controls: None,
            response_status: None,
            response_json: None,
        }
    }

    /// Move both clocks forward and let the tick task catch up
    pub fn advance(&self, ms: u64) {
        self.clock.advance(chrono::Duration::milliseconds(ms as i64));
        self.runtime.block_on(async {
            tokio::time::advance(Duration::from_millis(ms)).await;
            for _ in 0..8 {
                tokio::task::yield_now().await;
            }
        });
    }

    pub fn handle(&self) -> &SimulatorHandle {
        self.handle.as_ref().expect("simulator not started")
    }
}
