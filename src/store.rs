//! Shared receiver state
//!
//! One `LogStore` is created at startup and shared by every concurrent
//! export call. The buffer append and counter updates are independently
//! atomic; `total` and `largest_seq` are cumulative diagnostics and survive
//! `clear()`.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::domain::LogEntry;

pub struct LogStore {
    received: Mutex<VecDeque<LogEntry>>,
    total: AtomicU64,
    largest_seq: AtomicI64,
    retention_cap: Option<usize>,
}

impl LogStore {
    /// A store that retains every ingested record.
    pub fn new() -> Self {
        Self {
            received: Mutex::new(VecDeque::new()),
            total: AtomicU64::new(0),
            largest_seq: AtomicI64::new(0),
            retention_cap: None,
        }
    }

    /// A store that retains at most `cap` records, evicting the oldest once
    /// the cap is reached. Counters are unaffected by eviction.
    pub fn with_retention_cap(cap: usize) -> Self {
        Self {
            retention_cap: Some(cap),
            ..Self::new()
        }
    }

    fn lock_received(&self) -> MutexGuard<'_, VecDeque<LogEntry>> {
        // A writer can only poison the lock mid-push; the queue itself stays
        // structurally valid, so recover the guard rather than propagate.
        self.received.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Appends one record, bumps the total count and raises the sequence
    /// high-water mark. Returns the post-update `(total, high-water mark)`
    /// for progress logging.
    pub fn record(&self, entry: LogEntry) -> (u64, i64) {
        let seq = entry.sequence_number();
        {
            let mut received = self.lock_received();
            if let Some(cap) = self.retention_cap {
                if received.len() >= cap {
                    received.pop_front();
                }
            }
            received.push_back(entry);
        }
        let total = self.total.fetch_add(1, Ordering::AcqRel) + 1;
        let previous = self.largest_seq.fetch_max(seq, Ordering::AcqRel);
        (total, previous.max(seq))
    }

    /// Number of records ingested since startup. Not reset by [`clear`].
    ///
    /// [`clear`]: LogStore::clear
    pub fn total_log_count(&self) -> u64 {
        self.total.load(Ordering::Acquire)
    }

    /// Largest `"logNo#"` sequence number seen since startup.
    pub fn largest_sequence_number(&self) -> i64 {
        self.largest_seq.load(Ordering::Acquire)
    }

    /// Point-in-time copy of the retained buffer; later writes do not show
    /// through.
    pub fn snapshot(&self) -> Vec<LogEntry> {
        self.lock_received().iter().cloned().collect()
    }

    /// Number of currently retained records.
    pub fn retained(&self) -> usize {
        self.lock_received().len()
    }

    /// Empties the retained buffer. The total count and high-water mark are
    /// cumulative and keep their values.
    pub fn clear(&self) {
        self.lock_received().clear();
    }
}

impl Default for LogStore {
    fn default() -> Self {
        Self::new()
    }
}
