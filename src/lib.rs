//! kvqueue - An in-memory key-value and queue server
//!
//! Scalars with optional TTL, LIFO queues, and a blocking pop that waits for
//! pushes without holding the store lock.

pub mod api;
pub mod command;
pub mod config;
pub mod error;
pub mod models;
pub mod store;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use error::StoreError;
pub use store::{SetCondition, Store};
pub use tasks::Reaper;
