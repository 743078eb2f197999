//! Response DTOs for the RPC endpoint
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::store::StoreStats;

/// Response body for commands that return a value (GET, QPOP, BQPOP)
#[derive(Debug, Clone, Serialize)]
pub struct ValueResponse {
    /// The returned value
    pub value: String,
}

impl ValueResponse {
    /// Creates a new ValueResponse
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

/// Empty `{}` body for commands with nothing to return (SET, QPUSH, timed-out BQPOP)
#[derive(Debug, Clone, Default, Serialize)]
pub struct BlankResponse {}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Reads that returned a value
    pub hits: u64,
    /// Reads that failed
    pub misses: u64,
    /// Entries removed by the expiry reaper
    pub expired: u64,
    /// Blocking pops that timed out
    pub blocking_timeouts: u64,
    /// Keys currently in the table
    pub total_keys: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<StoreStats> for StatsResponse {
    fn from(stats: StoreStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            hits: stats.hits,
            misses: stats.misses,
            expired: stats.expired,
            blocking_timeouts: stats.blocking_timeouts,
            total_keys: stats.total_keys,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
