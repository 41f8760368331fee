//! Command line configuration for the fleet state server.

use clap::Parser;
use std::net::SocketAddr;
use std::time::Duration;

/// CLI arguments for the fleet state server.
#[derive(Debug, Clone, Parser)]
#[command(name = "fleetstate-server")]
#[command(about = "Fleet State HTTP server: vehicle position updates and live streams")]
pub struct CliArgs {
    /// Address to listen on.
    #[arg(long, env = "FLEETSTATE_HTTP_ADDR", default_value = "127.0.0.1:10080")]
    pub http_addr: SocketAddr,

    /// Seconds to wait for in-flight requests on shutdown.
    #[arg(long, env = "FLEETSTATE_HTTP_SHUTDOWN_TIMEOUT_SECS", default_value = "5")]
    pub http_shutdown_timeout_secs: u64,
}

impl CliArgs {
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.http_shutdown_timeout_secs)
    }
}
