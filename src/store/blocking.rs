//! Blocking Pop
//!
//! QPOP that parks the caller until a token arrives for the key or the
//! timeout fires. Waiters are woken by pushes, not by polling.
//!
//! Fairness: every push wakes all waiters on the key and they race for the
//! table's write lock. Whoever finds a token first claims it; the rest go
//! back to sleep with their original deadline. No FIFO order among waiters
//! is promised, but a waiter that loses a race is re-woken by the next push,
//! so none is starved while tokens keep arriving.

use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use crate::error::{Result, StoreError};
use crate::store::Store;

/// Deadline used when `now + timeout` is not representable (about 30 years out).
const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

impl Store {
    // == Blocking Queue Pop ==
    /// Pops the newest token under `key`, waiting up to `timeout` for one to arrive.
    ///
    /// - A token is available: returns it immediately.
    /// - `timeout` is zero: behaves exactly like `pop` (`NotFound` / `QueueEmpty`).
    /// - Otherwise waits, tolerating a key that does not exist yet, and returns
    ///   `Ok(None)` if nothing arrived in time.
    ///
    /// The table lock is never held while waiting.
    pub async fn blocking_pop(&self, key: &str, timeout: Duration) -> Result<Option<String>> {
        if timeout.is_zero() {
            return self.pop(key).await.map(Some);
        }

        let now = Instant::now();
        let deadline = now.checked_add(timeout).unwrap_or(now + FAR_FUTURE);
        let guard = self.shared.waiters.register(key);

        loop {
            // Arm before checking so a push landing in between is not missed.
            let notified = guard.notify().notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            match self.try_pop(key).await {
                Ok(token) => {
                    self.shared.stats.record_hit();
                    return Ok(Some(token));
                }
                Err(StoreError::NotFound | StoreError::QueueEmpty) => {}
                Err(err) => {
                    self.shared.stats.record_miss();
                    return Err(err);
                }
            }

            if tokio::time::timeout_at(deadline, notified).await.is_err() {
                break;
            }
            debug!(key = %key, "blocking pop woken");
        }

        // A push may have completed right at the deadline.
        match self.try_pop(key).await {
            Ok(token) => {
                self.shared.stats.record_hit();
                Ok(Some(token))
            }
            Err(StoreError::NotFound | StoreError::QueueEmpty) => {
                debug!(key = %key, ?timeout, "blocking pop timed out");
                self.shared.stats.record_blocking_timeout();
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }
}
