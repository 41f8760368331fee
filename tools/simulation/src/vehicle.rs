//! Simulated vehicle
//!
//! A vehicle starts at a random point on the globe and on every tick moves a
//! random distance (bounded per tick) in a random direction, then reports the
//! new position.

use crate::client::{ClientError, FleetStateClient};
use rand::Rng;
use std::fmt;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use types::geo;
use types::ids::Vin;

#[derive(Debug, Clone, PartialEq)]
pub struct Vehicle {
    pub vin: Vin,
    pub lat: f64,
    pub lon: f64,
}

impl Vehicle {
    /// Vehicle with a generated VIN at a random position.
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let (lat, lon) = geo::random_lat_lon(rng);
        Self::at(Vin::generate(rng), lat, lon)
    }

    pub fn at(vin: Vin, lat: f64, lon: f64) -> Self {
        Self { vin, lat, lon }
    }

    /// Jump to a random point within `meters` of the current position.
    pub fn move_nearby<R: Rng + ?Sized>(&mut self, rng: &mut R, meters: f64) {
        let (lat, lon) = geo::random_lat_lon_nearby(rng, self.lat, self.lon, meters);
        self.lat = lat;
        self.lon = lon;
    }

    pub async fn report_position(&self, client: &FleetStateClient) -> Result<(), ClientError> {
        client.update_position(&self.vin, self.lat, self.lon).await
    }
}

impl fmt::Display for Vehicle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Vehicle {} ({:.6} {:.6})", self.vin, self.lat, self.lon)
    }
}

/// Report `vehicle` once, then move and report on every tick until `cancel`
/// fires. Failed reports are logged and the walk carries on.
///
/// Returns the vehicle in its final position.
pub async fn drive<R: Rng + Send>(
    mut vehicle: Vehicle,
    client: FleetStateClient,
    mut rng: R,
    tick: Duration,
    max_distance_per_tick: f64,
    cancel: CancellationToken,
) -> Vehicle {
    report(&vehicle, &client).await;

    let mut ticker = tokio::time::interval(tick);
    // first tick completes immediately
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let meters = rng.gen::<f64>() * max_distance_per_tick;
                vehicle.move_nearby(&mut rng, meters);
                report(&vehicle, &client).await;
            }
            () = cancel.cancelled() => break,
        }
    }

    vehicle
}

async fn report(vehicle: &Vehicle, client: &FleetStateClient) {
    match vehicle.report_position(client).await {
        Ok(()) => debug!(vin = %vehicle.vin, lat = vehicle.lat, lon = vehicle.lon, "Reported position"),
        Err(e) => warn!(vin = %vehicle.vin, error = %e, "Failed to report position"),
    }
}
