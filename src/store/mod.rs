//! Store Module
//!
//! In-memory key-value store with TTL expiry, LIFO queues and blocking pop.

mod blocking;
mod engine;
mod entry;
mod stats;
mod waiters;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use engine::Store;
pub use entry::{Entry, Payload, SetCondition};
pub use stats::{StatsCounters, StoreStats};
