//! Blocking-pop waiter registry
//!
//! Maps a key to the `Notify` its blocking-pop waiters sleep on. A slot lives
//! exactly as long as at least one waiter holds a `WaiterGuard` for the key.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::Notify;

#[derive(Debug)]
struct Slot {
    notify: Arc<Notify>,
    waiters: usize,
}

// == Waiter Registry ==
#[derive(Debug, Default)]
pub struct WaiterRegistry {
    slots: Mutex<HashMap<String, Slot>>,
}

impl WaiterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the caller as a waiter on `key`.
    ///
    /// The returned guard deregisters on drop.
    pub fn register(self: &Arc<Self>, key: &str) -> WaiterGuard {
        let notify = {
            let mut slots = self.lock();
            let slot = slots.entry(key.to_string()).or_insert_with(|| Slot {
                notify: Arc::new(Notify::new()),
                waiters: 0,
            });
            slot.waiters += 1;
            slot.notify.clone()
        };

        WaiterGuard {
            registry: Arc::clone(self),
            key: key.to_string(),
            notify,
        }
    }

    /// Wakes every waiter currently parked on `key`.
    ///
    /// Only waiters whose `Notified` future is already enabled observe the wakeup.
    pub fn wake(&self, key: &str) {
        if let Some(slot) = self.lock().get(key) {
            slot.notify.notify_waiters();
        }
    }

    /// Number of keys with at least one waiter.
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Slot>> {
        // The map is never left half-updated, so a poisoned lock is still usable.
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn release(&self, key: &str) {
        let mut slots = self.lock();
        if let Some(slot) = slots.get_mut(key) {
            slot.waiters -= 1;
            if slot.waiters == 0 {
                slots.remove(key);
            }
        }
    }
}

// == Waiter Guard ==
/// A registered interest in pushes to one key.
#[derive(Debug)]
pub struct WaiterGuard {
    registry: Arc<WaiterRegistry>,
    key: String,
    notify: Arc<Notify>,
}

impl WaiterGuard {
    pub fn notify(&self) -> &Notify {
        &self.notify
    }
}

impl Drop for WaiterGuard {
    fn drop(&mut self) {
        self.registry.release(&self.key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_slot_lives_while_guards_exist() {
        let registry = Arc::new(WaiterRegistry::new());

        let first = registry.register("k");
        let second = registry.register("k");
        assert_eq!(registry.len(), 1);

        drop(first);
        assert_eq!(registry.len(), 1);

        drop(second);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_wake_without_waiters_is_noop() {
        let registry = Arc::new(WaiterRegistry::new());
        registry.wake("nobody");
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_wake_reaches_enabled_waiter() {
        let registry = Arc::new(WaiterRegistry::new());
        let guard = registry.register("k");

        let notified = guard.notify().notified();
        tokio::pin!(notified);
        notified.as_mut().enable();

        // Wakeup delivered before the await must not be lost.
        registry.wake("k");

        let woke = tokio::time::timeout(Duration::from_millis(100), notified).await;
        assert!(woke.is_ok(), "enabled waiter should observe the wakeup");
    }
}
