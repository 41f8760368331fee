//! Fleet Simulator
//!
//! Drives a fleet of simulated vehicles that wander around and report their
//! positions to the fleet state server.
//!
//! # Modules
//! - `client` — HTTP client for `POST /vehicle/{id}`
//! - `vehicle` — Simulated vehicle doing a random walk, and the per-vehicle
//!   reporting loop

pub mod client;
pub mod vehicle;

pub use client::{ClientError, FleetStateClient};
pub use vehicle::{drive, Vehicle};

/// Crate version constant
pub const VERSION: &str = "1.0.0";
