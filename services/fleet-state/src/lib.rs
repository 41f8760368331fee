//! Fleet State core
//!
//! Per-vehicle append-only position logs with blocking tail readers.
//!
//! - `position_log`: one log per vehicle, monotonic writes, tail readers that
//!   suspend until a new record arrives or they are closed
//! - `registry`: VIN → log map, lazy log creation on first write
//!
//! # Architecture
//!
//! ```text
//!  POST /vehicle/{vin}          GET /vehicle/{vin}/stream
//!         │                               │
//!   ┌─────▼──────┐                 ┌──────▼──────┐
//!   │LogRegistry │──open_reader───►│ TailReader  │
//!   └─────┬──────┘                 └──────▲──────┘
//!         │ write                         │ read / wake
//!   ┌─────▼──────────────────────────────┴┐
//!   │        PositionLog (per VIN)        │
//!   └─────────────────────────────────────┘
//! ```

pub mod position_log;
pub mod registry;

pub use position_log::{LogError, PositionLog, ReaderCloser, TailReader};
pub use registry::LogRegistry;

// Library version
pub const SERVICE_VERSION: &str = "0.1.0";
