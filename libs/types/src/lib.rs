//! Types library for the fleet state service
//!
//! Core type definitions shared by the position log, the HTTP gateway and the
//! vehicle simulator.
//!
//! # Modules
//! - `ids`: Vehicle identifiers (Vin)
//! - `position`: Position records and stream chunks
//! - `geo`: Haversine distance, speed and random coordinates
//! - `errors`: Error taxonomy

pub mod errors;
pub mod geo;
pub mod ids;
pub mod position;

// Library version constant
pub const LIB_VERSION: &str = "1.0.0";

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::errors::*;
    pub use crate::geo::*;
    pub use crate::ids::*;
    pub use crate::position::*;
}
