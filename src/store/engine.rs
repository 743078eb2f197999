//! Store Engine Module
//!
//! The entry table: a `HashMap` behind one `RwLock`, shared by every handle.
//! Reads take the read lock; SET, QPUSH, QPOP and the reaper take the write lock.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::debug;

use crate::error::{Result, StoreError};
use crate::store::waiters::WaiterRegistry;
use crate::store::{Entry, Payload, SetCondition, StatsCounters, StoreStats};

pub(crate) struct Shared {
    pub(crate) table: RwLock<HashMap<String, Entry>>,
    pub(crate) waiters: Arc<WaiterRegistry>,
    pub(crate) stats: StatsCounters,
}

// == Store ==
/// Handle to the in-memory store. Cloning is cheap and every clone sees the same table.
#[derive(Clone)]
pub struct Store {
    pub(crate) shared: Arc<Shared>,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store").finish_non_exhaustive()
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns the entry for `key` unless it is missing or already past its expiry.
fn live<'a>(table: &'a HashMap<String, Entry>, key: &str, now: Instant) -> Option<&'a Entry> {
    table.get(key).filter(|entry| !entry.is_expired_at(now))
}

impl Store {
    // == Constructor ==
    /// Creates an empty store. Expiry sweeps are driven separately by a `Reaper`.
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                table: RwLock::new(HashMap::new()),
                waiters: Arc::new(WaiterRegistry::new()),
                stats: StatsCounters::new(),
            }),
        }
    }

    // == Set ==
    /// Writes a scalar value under `key`.
    ///
    /// `IfAbsent` fails with `AlreadyExists` on a live key, `IfPresent` fails with
    /// `NotFound` on a missing one. A zero or absent `ttl` means no expiry.
    /// A live queue is never overwritten; that fails with `TypeMismatch`.
    pub async fn set(
        &self,
        key: impl Into<String>,
        value: impl Into<String>,
        ttl: Option<Duration>,
        condition: SetCondition,
    ) -> Result<()> {
        let key = key.into();
        let mut table = self.shared.table.write().await;
        let existing = live(&table, &key, Instant::now());

        match (condition, existing) {
            (SetCondition::IfAbsent, Some(_)) => return Err(StoreError::AlreadyExists),
            (SetCondition::IfPresent, None) => return Err(StoreError::NotFound),
            _ => {}
        }
        if let Some(Entry {
            payload: Payload::Queue(_),
            ..
        }) = existing
        {
            return Err(StoreError::TypeMismatch { expected: "scalar" });
        }

        debug!(key = %key, ?ttl, ?condition, "set");
        table.insert(key, Entry::scalar(value.into(), ttl));
        Ok(())
    }

    // == Get ==
    /// Reads the scalar stored under `key`.
    pub async fn get(&self, key: &str) -> Result<String> {
        let table = self.shared.table.read().await;
        let result = match live(&table, key, Instant::now()) {
            Some(Entry {
                payload: Payload::Scalar(value),
                ..
            }) => Ok(value.clone()),
            Some(_) => Err(StoreError::TypeMismatch { expected: "scalar" }),
            None => Err(StoreError::NotFound),
        };
        drop(table);

        self.record_read(&result);
        result
    }

    // == Queue Push ==
    /// Appends `tokens` in order to the queue under `key`, creating it if absent.
    ///
    /// Returns the queue length after the push and wakes any blocking poppers.
    pub async fn push<I, S>(&self, key: &str, tokens: I) -> Result<usize>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let len = {
            let mut table = self.shared.table.write().await;
            let now = Instant::now();
            let entry = table.entry(key.to_string()).or_insert_with(Entry::queue);
            if entry.is_expired_at(now) {
                *entry = Entry::queue();
            }

            match &mut entry.payload {
                Payload::Queue(queue) => {
                    queue.extend(tokens.into_iter().map(Into::into));
                    queue.len()
                }
                Payload::Scalar(_) => return Err(StoreError::TypeMismatch { expected: "queue" }),
            }
        };

        debug!(key = %key, len, "queue push");
        self.shared.waiters.wake(key);
        Ok(len)
    }

    // == Queue Pop ==
    /// Removes and returns the most recently pushed token under `key`.
    ///
    /// Popping the last token leaves an empty queue behind; the key is kept.
    pub async fn pop(&self, key: &str) -> Result<String> {
        let result = self.try_pop(key).await;
        self.record_read(&result);
        result
    }

    pub(crate) async fn try_pop(&self, key: &str) -> Result<String> {
        let mut table = self.shared.table.write().await;
        let now = Instant::now();
        match table.get_mut(key).filter(|entry| !entry.is_expired_at(now)) {
            Some(Entry {
                payload: Payload::Queue(queue),
                ..
            }) => queue.pop().ok_or(StoreError::QueueEmpty),
            Some(_) => Err(StoreError::TypeMismatch { expected: "queue" }),
            None => Err(StoreError::NotFound),
        }
    }

    // == Cleanup Expired ==
    /// Removes every entry whose expiry has passed. Returns the number removed.
    pub async fn cleanup_expired(&self) -> usize {
        let mut table = self.shared.table.write().await;
        let now = Instant::now();
        let before = table.len();
        table.retain(|_, entry| !entry.is_expired_at(now));
        let removed = before - table.len();
        drop(table);

        self.shared.stats.record_expired(removed);
        removed
    }

    // == Stats ==
    /// Returns current store statistics.
    pub async fn stats(&self) -> StoreStats {
        let total_keys = self.len().await;
        self.shared.stats.snapshot(total_keys)
    }

    // == Length ==
    /// Returns the number of keys in the table, including expired ones not yet reaped.
    pub async fn len(&self) -> usize {
        self.shared.table.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.shared.table.read().await.is_empty()
    }

    /// Number of keys that currently have blocking-pop waiters.
    #[cfg(test)]
    pub(crate) fn waiting_keys(&self) -> usize {
        self.shared.waiters.len()
    }

    fn record_read(&self, result: &Result<String>) {
        match result {
            Ok(_) => self.shared.stats.record_hit(),
            Err(_) => self.shared.stats.record_miss(),
        }
    }
}
