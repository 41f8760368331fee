//! Position tracking types
//!
//! `PositionRecord` is what a position log stores; `PositionChunk` is what the
//! stream endpoint emits for every new record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One timestamped coordinate reported by a vehicle
///
/// Records are never mutated once appended to a log.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionRecord {
    pub timestamp: DateTime<Utc>,
    pub lat: f64,
    pub lon: f64,
}

impl PositionRecord {
    pub fn new(timestamp: DateTime<Utc>, lat: f64, lon: f64) -> Self {
        Self { timestamp, lat, lon }
    }

    /// Whether both records sit on exactly the same coordinates
    pub fn same_coordinates(&self, other: &Self) -> bool {
        self.lat == other.lat && self.lon == other.lon
    }
}

/// A single record of the position stream, serialized as one JSON line
///
/// `error` is only present on the terminal chunk of a stream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PositionChunk {
    pub lat: f64,
    pub lon: f64,
    /// Speed in km/h since the previous record
    pub speed: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PositionChunk {
    pub fn position(record: &PositionRecord, speed: f64) -> Self {
        Self {
            lat: record.lat,
            lon: record.lon,
            speed,
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }

    /// Encode as one newline-terminated JSON object
    pub fn to_line(&self) -> serde_json::Result<Vec<u8>> {
        let mut buf = serde_json::to_vec(self)?;
        buf.push(b'\n');
        Ok(buf)
    }
}
