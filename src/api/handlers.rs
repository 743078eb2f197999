//! API Handlers
//!
//! HTTP request handlers for the command endpoint and the ambient endpoints.

use std::time::Duration;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::info;

use crate::command::Command;
use crate::error::{Result, StoreError};
use crate::models::{
    BlankResponse, CommandRequest, HealthResponse, StatsResponse, ValueResponse,
};
use crate::store::Store;

/// Application state shared across all handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Shared store handle
    pub store: Store,
    /// Cap on BQPOP timeouts
    pub max_block: Duration,
}

impl AppState {
    /// Creates a new AppState around the given store.
    pub fn new(store: Store) -> Self {
        Self {
            store,
            max_block: crate::config::Config::default().max_block(),
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &crate::config::Config) -> Self {
        Self {
            store: Store::new(),
            max_block: config.max_block(),
        }
    }
}

/// Handler for POST /
///
/// Parses `{"command": "..."}`, runs it against the store and encodes the result
/// as `{"value": ...}`, `{}` or `{"error": ...}`.
///
/// A rejected SET is always a 400, since the request itself was refused.
/// Read misses on GET, QPOP and BQPOP are 404.
pub async fn command_handler(
    State(state): State<AppState>,
    body: std::result::Result<Json<CommandRequest>, JsonRejection>,
) -> Result<Response> {
    let Json(req) =
        body.map_err(|_| StoreError::InvalidCommand("invalid request body".to_string()))?;

    let command = Command::parse(&req.command)?;
    info!(command = %req.command, "dispatching");

    let is_set = matches!(command, Command::Set { .. });
    let response = match command.execute(&state.store, state.max_block).await {
        Ok(Some(value)) => Json(ValueResponse::new(value)).into_response(),
        Ok(None) => Json(BlankResponse::default()).into_response(),
        Err(err) if is_set => err.into_response_with(StatusCode::BAD_REQUEST),
        Err(err) => return Err(err),
    };
    Ok(response)
}

/// Handler for GET /stats
///
/// Returns current store statistics.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(state.store.stats().await.into())
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
