//! Request DTOs for the RPC endpoint
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

/// Request body for the command endpoint (POST /)
///
/// # Fields
/// - `command`: A text command such as `SET key value EX 10`
#[derive(Debug, Clone, Deserialize)]
pub struct CommandRequest {
    /// The raw command line
    pub command: String,
}
