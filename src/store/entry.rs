//! Store Entry Module
//!
//! Defines a single stored entry: a scalar or a LIFO queue, plus optional expiry.

use std::time::Duration;

use tokio::time::Instant;

// == Payload ==
/// What a key holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// A single string written by SET
    Scalar(String),
    /// Tokens in push order; the last element is popped first
    Queue(Vec<String>),
}

// == Set Condition ==
/// Precondition for a SET.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SetCondition {
    /// Always write
    #[default]
    Always,
    /// Only write if the key is absent (NX)
    IfAbsent,
    /// Only write if the key is present (XX)
    IfPresent,
}

// == Entry ==
/// Represents a single stored entry with payload and expiry.
#[derive(Debug, Clone)]
pub struct Entry {
    /// The stored payload
    pub payload: Payload,
    /// Absolute expiry instant, None = never expires
    pub expires_at: Option<Instant>,
}

impl Entry {
    // == Constructors ==
    /// Creates a scalar entry. A zero or absent TTL means the entry never expires.
    pub fn scalar(value: String, ttl: Option<Duration>) -> Self {
        Self {
            payload: Payload::Scalar(value),
            expires_at: deadline_for(ttl),
        }
    }

    /// Creates an empty queue entry that never expires.
    pub fn queue() -> Self {
        Self {
            payload: Payload::Queue(Vec::new()),
            expires_at: None,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired as of `now`.
    ///
    /// An entry is expired once `now` reaches its expiry instant.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        match self.expires_at {
            Some(expires) => now >= expires,
            None => false,
        }
    }
}

/// A TTL too large to represent as an instant is treated as no expiry.
fn deadline_for(ttl: Option<Duration>) -> Option<Instant> {
    ttl.filter(|ttl| !ttl.is_zero())
        .and_then(|ttl| Instant::now().checked_add(ttl))
}
