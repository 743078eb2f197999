//! API Module
//!
//! HTTP handlers and routing for the store's RPC endpoint.
//!
//! # Endpoints
//! - `POST /` - Run a text command (`{"command": "..."}`)
//! - `GET /stats` - Get store statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
