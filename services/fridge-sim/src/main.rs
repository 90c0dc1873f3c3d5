//! Fridge Sim CLI
//!
//! Command-line interface for the simulated fridge telemetry service.

use clap::Parser;
use fridge_sim::cli::Args;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .init();

    tracing::debug!(
        "Parsed command line arguments: config={:?}, port={:?}, profile={:?}, seed={:?}, log_level={:?}",
        args.config,
        args.port,
        args.profile,
        args.seed,
        args.log_level
    );

    let config = args.resolve_config()?;
    let rng = args.random_source();

    tracing::info!("Starting fridge simulator for tenant {}", config.tenant.id);
    tracing::info!("Tick interval: {} ms", config.simulator.tick_interval_ms);
    tracing::info!("Server port: {}", config.server.port);

    fridge_sim::run(config, rng).await?;

    Ok(())
}
