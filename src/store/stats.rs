//! Store Statistics Module
//!
//! Tracks read outcomes, reaped entries and blocking-pop timeouts.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Stats Counters ==
/// Lock-free counters shared by every store handle.
///
/// Updated under the table's read lock as well as its write lock, hence atomics.
#[derive(Debug, Default)]
pub struct StatsCounters {
    hits: AtomicU64,
    misses: AtomicU64,
    expired: AtomicU64,
    blocking_timeouts: AtomicU64,
}

impl StatsCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_expired(&self, count: usize) {
        self.expired.fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn record_blocking_timeout(&self) {
        self.blocking_timeouts.fetch_add(1, Ordering::Relaxed);
    }

    /// Takes a point-in-time copy of the counters.
    pub fn snapshot(&self, total_keys: usize) -> StoreStats {
        StoreStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            expired: self.expired.load(Ordering::Relaxed),
            blocking_timeouts: self.blocking_timeouts.load(Ordering::Relaxed),
            total_keys,
        }
    }
}

// == Store Stats ==
/// Snapshot of store performance metrics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    /// Reads (GET/QPOP) that returned a value
    pub hits: u64,
    /// Reads that failed (not found, empty queue)
    pub misses: u64,
    /// Entries removed by the expiry reaper
    pub expired: u64,
    /// Blocking pops that gave up after their timeout
    pub blocking_timeouts: u64,
    /// Keys currently in the table, including expired-but-unreaped ones
    pub total_keys: usize,
}

impl StoreStats {
    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if no reads have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
