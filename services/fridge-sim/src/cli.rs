//! Command-line arguments and how they override the config file

use std::path::PathBuf;

use clap::Parser;
use tracing::Level;

use crate::config::{load_config, Config, SimulatorConfig, SimulatorProfile};
use crate::error::Result;
use crate::random::{RandomSource, RngSource};

#[derive(Debug, Parser)]
#[command(name = "fridge-sim")]
#[command(about = "Simulated fridge telemetry service")]
#[command(version)]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Server port (overrides config file)
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Tenant identifier
    #[arg(long, env = "TENANT")]
    pub tenant: Option<String>,

    /// Tenant display name
    #[arg(long, env = "TENANT_NAME")]
    pub tenant_name: Option<String>,

    /// Backend base URL
    #[arg(long, env = "BACKEND_URL")]
    pub backend_url: Option<String>,

    /// Telemetry transport URL
    #[arg(long, env = "TELEMETRY_URL")]
    pub telemetry_url: Option<String>,

    /// Simulator preset (replaces the simulator section of the config file)
    #[arg(long, value_enum)]
    pub profile: Option<SimulatorProfile>,

    /// Tick interval in milliseconds (overrides config file and profile)
    #[arg(long)]
    pub tick_interval_ms: Option<u64>,

    /// Seed for reproducible readings
    #[arg(long)]
    pub seed: Option<u64>,

    /// Log level
    #[arg(short, long, default_value = "info", value_parser = parse_log_level)]
    pub log_level: Level,
}

pub fn parse_log_level(s: &str) -> std::result::Result<Level, String> {
    s.parse().map_err(|_| {
        format!(
            "Invalid log level: {}. Use: trace, debug, info, warn, error",
            s
        )
    })
}

impl Args {
    /// Config file (or defaults) with the command line applied on top
    pub fn resolve_config(&self) -> Result<Config> {
        let mut config = if let Some(config_path) = &self.config {
            tracing::debug!("Loading configuration from {:?}", config_path);
            load_config(config_path)?
        } else {
            tracing::debug!("Using default configuration");
            Config::default()
        };
        self.apply_overrides(&mut config);
        Ok(config)
    }

    /// Apply CLI / environment overrides
    ///
    /// `--profile` replaces the whole simulator section, then
    /// `--tick-interval-ms` is applied on top of it.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(tenant) = &self.tenant {
            config.tenant.id = tenant.clone();
        }
        if let Some(name) = &self.tenant_name {
            config.tenant.name = name.clone();
        }
        if let Some(url) = &self.backend_url {
            config.tenant.backend_url = url.clone();
        }
        if let Some(url) = &self.telemetry_url {
            config.tenant.telemetry_url = url.clone();
        }
        if let Some(profile) = self.profile {
            config.simulator = SimulatorConfig::for_profile(profile);
        }
        if let Some(interval) = self.tick_interval_ms {
            config.simulator.tick_interval_ms = interval;
        }
    }

    /// Seeded source when `--seed` is given, OS entropy otherwise
    pub fn random_source(&self) -> Box<dyn RandomSource> {
        match self.seed {
            Some(seed) => {
                tracing::info!("Using seeded random source ({})", seed);
                Box::new(RngSource::seeded(seed))
            }
            None => Box::new(RngSource::from_entropy()),
        }
    }
}
