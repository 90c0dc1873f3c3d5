//! Configuration types for the fridge simulator service

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{FridgeSimError, Result};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub tenant: TenantConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub simulator: SimulatorConfig,
}

/// Tenant identity and the collaborator URLs shown to the UI
///
/// These are passed through verbatim; nothing here is validated or dialled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenantConfig {
    #[serde(default = "default_tenant_id")]
    pub id: String,
    #[serde(default = "default_tenant_name")]
    pub name: String,
    #[serde(default = "default_backend_url")]
    pub backend_url: String,
    #[serde(default = "default_telemetry_url")]
    pub telemetry_url: String,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_port")]
    pub port: u16,
}

/// Inclusive `[min, max]` range for a telemetry field
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds<T> {
    pub min: T,
    pub max: T,
}

impl<T: PartialOrd + Copy> Bounds<T> {
    pub fn new(min: T, max: T) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: T) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn clamp(&self, value: T) -> T {
        if value < self.min {
            self.min
        } else if value > self.max {
            self.max
        } else {
            value
        }
    }
}

impl Bounds<f64> {
    fn validate(&self, field: &str) -> Result<()> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(FridgeSimError::InvalidConfig(format!(
                "{} range must be finite, got [{}, {}]",
                field, self.min, self.max
            )));
        }
        if self.min > self.max {
            return Err(FridgeSimError::InvalidConfig(format!(
                "{} range has min {} > max {}",
                field, self.min, self.max
            )));
        }
        Ok(())
    }
}

impl Bounds<i32> {
    fn validate(&self, field: &str) -> Result<()> {
        if self.min > self.max {
            return Err(FridgeSimError::InvalidConfig(format!(
                "{} range has min {} > max {}",
                field, self.min, self.max
            )));
        }
        Ok(())
    }
}

/// How the `connected` flag evolves from tick to tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectivityModel {
    /// Fresh coin flip every tick
    #[default]
    Flaky,
    /// Flip on every tick
    Alternating,
}

/// Preset matching one of the two UI views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SimulatorProfile {
    /// Refrigerator simulator view: 3 s cadence, 2..8 °C
    #[default]
    Fridge,
    /// Kiosk dashboard view: 10 s cadence, sub-zero compartment
    Kiosk,
}

/// Telemetry generator configuration
///
/// Missing fields fall back to the fridge profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    pub tick_interval_ms: u64,
    pub temperature: Bounds<f64>,
    /// Full width of the per-tick perturbation window
    pub temperature_step: f64,
    pub initial_temperature_c: f64,
    pub humidity: Bounds<i32>,
    pub humidity_step: f64,
    pub initial_humidity_percent: i32,
    pub power: Bounds<i32>,
    pub power_step: f64,
    pub initial_power_watts: i32,
    pub initial_connected: bool,
    pub connectivity: ConnectivityModel,
}

impl SimulatorConfig {
    pub fn for_profile(profile: SimulatorProfile) -> Self {
        match profile {
            SimulatorProfile::Fridge => Self {
                tick_interval_ms: 3000,
                temperature: Bounds::new(2.0, 8.0),
                temperature_step: 0.5,
                initial_temperature_c: 4.2,
                humidity: Bounds::new(40, 60),
                humidity_step: 2.0,
                initial_humidity_percent: 45,
                power: Bounds::new(160, 210),
                power_step: 5.0,
                initial_power_watts: 185,
                initial_connected: false,
                connectivity: ConnectivityModel::Alternating,
            },
            SimulatorProfile::Kiosk => Self {
                tick_interval_ms: 10_000,
                temperature: Bounds::new(-3.0, -1.0),
                temperature_step: 1.0,
                initial_temperature_c: -2.5,
                humidity: Bounds::new(40, 60),
                humidity_step: 4.0,
                initial_humidity_percent: 45,
                power: Bounds::new(160, 210),
                power_step: 10.0,
                initial_power_watts: 185,
                initial_connected: true,
                connectivity: ConnectivityModel::Flaky,
            },
        }
    }

    /// Reject anything that would let a reading escape its bounds
    pub fn validate(&self) -> Result<()> {
        if self.tick_interval_ms == 0 {
            return Err(FridgeSimError::InvalidConfig(
                "tick_interval_ms must be greater than zero".to_string(),
            ));
        }

        self.temperature.validate("temperature")?;
        self.humidity.validate("humidity")?;
        self.power.validate("power")?;

        for (field, step) in [
            ("temperature_step", self.temperature_step),
            ("humidity_step", self.humidity_step),
            ("power_step", self.power_step),
        ] {
            if !step.is_finite() || step < 0.0 {
                return Err(FridgeSimError::InvalidConfig(format!(
                    "{} must be a finite, non-negative number, got {}",
                    field, step
                )));
            }
        }

        if !self.initial_temperature_c.is_finite()
            || !self.temperature.contains(self.initial_temperature_c)
        {
            return Err(FridgeSimError::InvalidConfig(format!(
                "initial_temperature_c {} is outside [{}, {}]",
                self.initial_temperature_c, self.temperature.min, self.temperature.max
            )));
        }
        if !self.humidity.contains(self.initial_humidity_percent) {
            return Err(FridgeSimError::InvalidConfig(format!(
                "initial_humidity_percent {} is outside [{}, {}]",
                self.initial_humidity_percent, self.humidity.min, self.humidity.max
            )));
        }
        if !self.power.contains(self.initial_power_watts) {
            return Err(FridgeSimError::InvalidConfig(format!(
                "initial_power_watts {} is outside [{}, {}]",
                self.initial_power_watts, self.power.min, self.power.max
            )));
        }

        Ok(())
    }
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self::for_profile(SimulatorProfile::default())
    }
}

impl Default for TenantConfig {
    fn default() -> Self {
        Self {
            id: default_tenant_id(),
            name: default_tenant_name(),
            backend_url: default_backend_url(),
            telemetry_url: default_telemetry_url(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_server_port(),
        }
    }
}

fn default_tenant_id() -> String {
    "NU".to_string()
}

fn default_tenant_name() -> String {
    "NU Fridge".to_string()
}

fn default_backend_url() -> String {
    "http://localhost:3001".to_string()
}

fn default_telemetry_url() -> String {
    "ws://localhost:9001".to_string()
}

fn default_server_port() -> u16 {
    5174
}

/// Load configuration from a JSON file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        FridgeSimError::Config(format!("Failed to read config file {:?}: {}", path, e))
    })?;
    let config: Config = serde_json::from_str(&content)?;
    Ok(config)
}
