//! Error types for the store and its HTTP dispatcher
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::models::ErrorResponse;
use thiserror::Error;

// == Store Error Enum ==
/// Unified error type for store operations and command dispatch.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Create-only SET on a key that already exists
    #[error("key already exists")]
    AlreadyExists,

    /// Key is absent (or expired)
    #[error("key not found")]
    NotFound,

    /// Queue exists but holds no tokens
    #[error("queue is empty")]
    QueueEmpty,

    /// Scalar operation on a queue, or queue operation on a scalar
    #[error("wrong kind of value for key: expected {expected}")]
    TypeMismatch { expected: &'static str },

    /// Command text could not be parsed or has the wrong arity
    #[error("{0}")]
    InvalidCommand(String),
}

impl StoreError {
    /// HTTP status this error reports when the command gives no other mapping.
    pub fn status_code(&self) -> StatusCode {
        match self {
            StoreError::NotFound | StoreError::QueueEmpty => StatusCode::NOT_FOUND,
            StoreError::AlreadyExists
            | StoreError::TypeMismatch { .. }
            | StoreError::InvalidCommand(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Encodes the error as `{"error": ...}` under an explicit status.
    pub fn into_response_with(self, status: StatusCode) -> Response {
        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for StoreError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        self.into_response_with(status)
    }
}

// == Result Type Alias ==
/// Convenience Result type for the store.
pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(StoreError::AlreadyExists.to_string(), "key already exists");
        assert_eq!(StoreError::NotFound.to_string(), "key not found");
        assert_eq!(StoreError::QueueEmpty.to_string(), "queue is empty");
        assert_eq!(
            StoreError::InvalidCommand("invalid command".into()).to_string(),
            "invalid command"
        );
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(StoreError::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(StoreError::QueueEmpty.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            StoreError::AlreadyExists.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            StoreError::TypeMismatch { expected: "queue" }.status_code(),
            StatusCode::BAD_REQUEST
        );
    }
}
