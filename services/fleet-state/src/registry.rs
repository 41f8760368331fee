//! Log Registry — maps VINs to their position logs
//!
//! Logs are created lazily by the first write for a VIN and live for the
//! lifetime of the registry. The map lock is only held for lookup-or-insert;
//! it is always released before the per-log lock is taken, so writes for
//! different vehicles never contend.

use std::sync::Arc;

use dashmap::DashMap;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use types::ids::Vin;
use types::position::PositionRecord;

use crate::position_log::{LogError, PositionLog, TailReader};

/// Owner of every vehicle's position log.
#[derive(Debug)]
pub struct LogRegistry {
    logs: DashMap<Vin, Arc<PositionLog>>,
    /// Parent of every reader's closed token
    shutdown: CancellationToken,
}

impl LogRegistry {
    pub fn new() -> Self {
        Self {
            logs: DashMap::new(),
            shutdown: CancellationToken::new(),
        }
    }

    /// Append a record to the VIN's log, creating the log on first write.
    pub fn write(&self, vin: &Vin, record: PositionRecord) -> Result<(), LogError> {
        let log = self.log_or_create(vin);

        log.write(record).inspect_err(|err| {
            warn!(vin = %vin, error = %err, "Rejected position write");
        })?;

        debug!(
            vin = %vin,
            lat = record.lat,
            lon = record.lon,
            ts = %record.timestamp,
            "Position appended"
        );
        Ok(())
    }

    /// Open a tail reader on an existing log.
    ///
    /// Never creates a log: a VIN without any accepted write is unknown.
    pub fn open_reader(&self, vin: &Vin) -> Result<TailReader, LogError> {
        let log = self
            .logs
            .get(vin)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| LogError::UnknownVin(vin.clone()))?;

        let reader = log.open_reader_at_tail(self.shutdown.child_token());
        debug!(vin = %vin, offset = reader.offset(), "Tail reader opened");
        Ok(reader)
    }

    /// Close every reader handed out by this registry, now and in future.
    ///
    /// Writes are still accepted afterwards.
    pub fn close(&self) {
        self.shutdown.cancel();

        let logs: Vec<Arc<PositionLog>> = self
            .logs
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();
        for log in &logs {
            log.wake_readers();
        }

        info!(logs = logs.len(), "Closed all tail readers");
    }

    pub fn is_closed(&self) -> bool {
        self.shutdown.is_cancelled()
    }

    /// Most recently accepted record for the VIN
    pub fn last(&self, vin: &Vin) -> Option<PositionRecord> {
        let log = self.logs.get(vin).map(|entry| Arc::clone(entry.value()))?;
        log.last()
    }

    pub fn contains(&self, vin: &Vin) -> bool {
        self.logs.contains_key(vin)
    }

    /// Number of vehicles with a log
    pub fn len(&self) -> usize {
        self.logs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.logs.is_empty()
    }

    fn log_or_create(&self, vin: &Vin) -> Arc<PositionLog> {
        if let Some(entry) = self.logs.get(vin) {
            return Arc::clone(entry.value());
        }

        let entry = self.logs.entry(vin.clone()).or_insert_with(|| {
            info!(vin = %vin, "Creating position log");
            Arc::new(PositionLog::new())
        });
        Arc::clone(entry.value())
    }
}

impl Default for LogRegistry {
    fn default() -> Self {
        Self::new()
    }
}
