//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::time::Duration;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Expiry reaper sweep period in milliseconds
    pub cleanup_interval_ms: u64,
    /// Upper bound in seconds on a BQPOP timeout
    pub max_block_timeout: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 8080)
    /// - `CLEANUP_INTERVAL_MS` - Reaper period in milliseconds (default: 1000)
    /// - `MAX_BLOCK_TIMEOUT` - BQPOP timeout cap in seconds (default: 3600)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: env_or("SERVER_PORT", defaults.server_port),
            cleanup_interval_ms: env_or("CLEANUP_INTERVAL_MS", defaults.cleanup_interval_ms)
                .max(1),
            max_block_timeout: env_or("MAX_BLOCK_TIMEOUT", defaults.max_block_timeout),
        }
    }

    /// Reaper sweep period.
    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_millis(self.cleanup_interval_ms)
    }

    /// Longest a single BQPOP may wait.
    pub fn max_block(&self) -> Duration {
        Duration::from_secs(self.max_block_timeout)
    }
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 8080,
            cleanup_interval_ms: 1000,
            max_block_timeout: 3600,
        }
    }
}
