use anyhow::Context;
use clap::Parser;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use simulation::{drive, FleetStateClient, Vehicle};
use std::time::Duration;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// CLI arguments for the fleet simulator.
#[derive(Debug, Parser)]
#[command(name = "simulator")]
#[command(about = "Simulate a fleet of vehicles reporting positions to the fleet state server")]
struct CliArgs {
    /// Base URL of the fleet state server.
    #[arg(long, env = "FLEETSTATE_SERVER_ADDR", default_value = "http://127.0.0.1:10080")]
    fleetstate_server_addr: String,

    /// Total number of vehicles to simulate.
    #[arg(long, default_value = "20")]
    vehicles_total: usize,

    /// Interval in milliseconds between two reports of a vehicle.
    #[arg(long, default_value = "1000", value_parser = clap::value_parser!(u64).range(1..))]
    vehicle_tick_interval_ms: u64,

    /// Max distance in meters a vehicle moves per tick.
    #[arg(long, default_value = "13")]
    vehicle_max_distance_per_tick: f64,

    /// Seed for a reproducible fleet; random when omitted.
    #[arg(long)]
    seed: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = CliArgs::parse();
    if !(args.vehicle_max_distance_per_tick.is_finite() && args.vehicle_max_distance_per_tick >= 0.0) {
        anyhow::bail!(
            "vehicle-max-distance-per-tick must be a non-negative number, got {}",
            args.vehicle_max_distance_per_tick
        );
    }

    let mut rng = match args.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };

    let client = FleetStateClient::new(args.fleetstate_server_addr.as_str());
    let tick = Duration::from_millis(args.vehicle_tick_interval_ms);
    let cancel = CancellationToken::new();

    info!(
        server = %client.base_url(),
        vehicles = args.vehicles_total,
        "Starting fleet simulation"
    );

    let mut tasks = JoinSet::new();
    for _ in 0..args.vehicles_total {
        let vehicle = Vehicle::new(&mut rng);
        let vehicle_rng = ChaCha8Rng::seed_from_u64(rng.gen());
        info!("Starting simulation for {}", vehicle);

        tasks.spawn(drive(
            vehicle,
            client.clone(),
            vehicle_rng,
            tick,
            args.vehicle_max_distance_per_tick,
            cancel.clone(),
        ));
    }

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for Ctrl+C")?;
    info!("Exiting...");
    cancel.cancel();

    while let Some(res) = tasks.join_next().await {
        match res {
            Ok(vehicle) => info!("Stopped {}", vehicle),
            Err(e) => error!(error = %e, "Vehicle task failed"),
        }
    }

    Ok(())
}
