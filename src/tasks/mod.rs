//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Expiry Reaper: Removes entries whose TTL has elapsed at a fixed period

mod reaper;

pub use reaper::Reaper;
