//! Expiry Reaper
//!
//! Background task that periodically removes expired store entries.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::store::Store;

/// Handle to a running reaper task.
///
/// The task stops when `stop` is called or the handle is dropped.
#[derive(Debug)]
pub struct Reaper {
    shutdown_tx: watch::Sender<bool>,
    handle: Option<JoinHandle<()>>,
}

impl Reaper {
    /// Spawns a task that sweeps `store` for expired entries every `period`.
    ///
    /// Each sweep takes the table's write lock, so it never interleaves with a
    /// half-applied SET, QPUSH or QPOP.
    ///
    /// # Example
    /// ```ignore
    /// let store = Store::new();
    /// let reaper = Reaper::start(store.clone(), Duration::from_secs(1));
    /// // Later, during shutdown:
    /// reaper.stop().await;
    /// ```
    pub fn start(store: Store, period: Duration) -> Self {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

        let handle = tokio::spawn(async move {
            info!("Starting expiry reaper with period of {:?}", period);

            let mut ticker = tokio::time::interval(period);
            // The first tick completes immediately.
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {}
                    _ = shutdown_rx.changed() => break,
                }

                let removed = store.cleanup_expired().await;
                if removed > 0 {
                    info!("Expiry reaper: removed {} expired entries", removed);
                } else {
                    debug!("Expiry reaper: no expired entries found");
                }
            }

            info!("Expiry reaper stopped");
        });

        Self {
            shutdown_tx,
            handle: Some(handle),
        }
    }

    /// Signals the task to stop and waits for it to finish.
    pub async fn stop(mut self) {
        let _ = self.shutdown_tx.send(true);
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }

    /// Returns true once the task has exited.
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }
}

impl Drop for Reaper {
    fn drop(&mut self) {
        let _ = self.shutdown_tx.send(true);
    }
}
