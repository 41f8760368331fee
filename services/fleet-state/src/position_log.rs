//! Position Log — per-vehicle append-only record sequence with tailing readers
//!
//! Every log is a monitor: one lock guards the records, and a broadcast
//! `Notify` wakes suspended readers after each append or close. A reader
//! registers for the wake-up *before* it inspects the log, then re-checks both
//! predicates (reader closed, unread record present) under the lock, so an
//! append or close landing between the check and the suspend is never missed.
//!
//! ```text
//!   write ──lock──► push record ──► notify_waiters ──► readers re-check
//!   close ──lock──► cancel token ─► notify_waiters ──┘
//! ```

use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use thiserror::Error;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use types::ids::Vin;
use types::position::PositionRecord;

// ── Errors ──────────────────────────────────────────────────────────

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LogError {
    /// The write is older than the last accepted record; it was dropped.
    #[error("old record: ts {timestamp}, last ts {last}")]
    RejectedStale {
        timestamp: DateTime<Utc>,
        last: DateTime<Utc>,
    },

    /// No write ever succeeded for this VIN.
    #[error("unknown vin {0}")]
    UnknownVin(Vin),

    /// Terminal signal of a tail reader.
    #[error("reader is closed")]
    ReaderClosed,
}

// ── Position Log ────────────────────────────────────────────────────

/// Append-only sequence of position records for one vehicle.
///
/// Timestamps are non-decreasing in offset order.
#[derive(Debug, Default)]
pub struct PositionLog {
    records: Mutex<Vec<PositionRecord>>,
    notify: Notify,
}

impl PositionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record, waking every suspended reader.
    ///
    /// A record strictly older than the last one is rejected and the log is
    /// left untouched. Equal timestamps are accepted.
    pub fn write(&self, record: PositionRecord) -> Result<(), LogError> {
        let mut records = self.records.lock();
        if let Some(last) = records.last() {
            if record.timestamp < last.timestamp {
                return Err(LogError::RejectedStale {
                    timestamp: record.timestamp,
                    last: last.timestamp,
                });
            }
        }
        records.push(record);
        self.notify.notify_waiters();
        Ok(())
    }

    /// Open a reader that observes only records appended after this call.
    ///
    /// The reader is closed once `closed` is cancelled (and its owner calls
    /// [`ReaderCloser::close`] or the registry wakes the log), or on drop.
    pub fn open_reader_at_tail(self: &Arc<Self>, closed: CancellationToken) -> TailReader {
        let offset = self.records.lock().len();
        TailReader {
            log: Arc::clone(self),
            offset,
            closed,
        }
    }

    /// Wake every suspended reader so it re-checks its closed flag.
    pub fn wake_readers(&self) {
        let _records = self.records.lock();
        self.notify.notify_waiters();
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    /// Most recently accepted record
    pub fn last(&self) -> Option<PositionRecord> {
        self.records.lock().last().copied()
    }

    fn close_reader(&self, closed: &CancellationToken) {
        let _records = self.records.lock();
        closed.cancel();
        self.notify.notify_waiters();
    }
}

// ── Tail Reader ─────────────────────────────────────────────────────

/// Cursor into one position log, starting at the log's tail.
#[derive(Debug)]
pub struct TailReader {
    log: Arc<PositionLog>,
    offset: usize,
    closed: CancellationToken,
}

impl TailReader {
    /// Wait for the next record.
    ///
    /// Suspends while the log has nothing past this reader's offset. Once the
    /// reader is closed every call returns [`LogError::ReaderClosed`], even if
    /// unread records remain.
    pub async fn read(&mut self) -> Result<PositionRecord, LogError> {
        loop {
            let notified = self.log.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            {
                let records = self.log.records.lock();
                if self.closed.is_cancelled() {
                    return Err(LogError::ReaderClosed);
                }
                if let Some(record) = records.get(self.offset) {
                    self.offset += 1;
                    return Ok(*record);
                }
            }

            notified.await;
        }
    }

    /// Close the reader. Idempotent.
    pub fn close(&self) {
        self.log.close_reader(&self.closed);
    }

    pub fn is_closed(&self) -> bool {
        self.closed.is_cancelled()
    }

    /// Offset of the next record this reader will return
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Handle that closes this reader from another task.
    pub fn closer(&self) -> ReaderCloser {
        ReaderCloser {
            log: Arc::clone(&self.log),
            closed: self.closed.clone(),
        }
    }
}

impl Drop for TailReader {
    fn drop(&mut self) {
        self.close();
    }
}

/// Out-of-band close signal for a [`TailReader`].
#[derive(Debug, Clone)]
pub struct ReaderCloser {
    log: Arc<PositionLog>,
    closed: CancellationToken,
}

impl ReaderCloser {
    /// Close the bound reader, waking it if suspended. Idempotent.
    pub fn close(&self) {
        self.log.close_reader(&self.closed);
    }

    pub fn is_closed(&self) -> bool {
        self.closed.is_cancelled()
    }

    /// Resolves once the bound reader is closed, by any path.
    pub async fn closed(&self) {
        self.closed.cancelled().await
    }

    /// Spawn the watcher that closes the reader when `signal` completes.
    ///
    /// The watcher exits as soon as the reader is closed by any other path,
    /// including being dropped, so it lives no longer than the reader.
    pub fn close_when<F>(self, signal: F) -> JoinHandle<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        tokio::spawn(async move {
            tokio::select! {
                () = signal => self.close(),
                () = self.closed() => {}
            }
        })
    }
}
