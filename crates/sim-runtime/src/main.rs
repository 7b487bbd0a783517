//! # EdgeGuard Simulator
//!
//! Entry point: initialize logging, load configuration from the environment,
//! run the simulation to its horizon, and emit the end-of-run scalars as
//! JSON on stdout.

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use sim_runtime::{load_config, Simulation};

fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = load_config();

    info!("===========================================");
    info!("  EdgeGuard Gateway Simulator v0.1.0");
    info!("===========================================");
    info!(
        duration_s = config.duration.as_secs_f64(),
        sensors = config.sensors,
        attack_enabled = config.attack_enabled,
        "starting run"
    );

    let mut simulation = Simulation::new(&config);
    let outcome = simulation.run();

    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}
