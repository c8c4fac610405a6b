//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Storage Error Enum ==
/// Failures raised by a durable storage backend.
///
/// The cache store never lets these escape: they are logged and the
/// operation falls back to memory-only behavior.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Writing would exceed the backend's byte quota
    #[error("Storage quota exceeded: {0}")]
    QuotaExceeded(String),

    /// Backend is not reachable or disabled
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// Underlying filesystem failure
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored item could not be encoded or decoded
    #[error("Storage encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

// == Cache Error Enum ==
/// Unified error type for the cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Value could not be encoded to, or decoded from, JSON
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A `get_or_set` factory or data fetcher failed
    #[error("Fetch failed: {0}")]
    Factory(#[source] anyhow::Error),

    /// No data source is configured for the requested operation
    #[error("Data source unavailable: {0}")]
    SourceUnavailable(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Durable storage failure surfaced outside the store
    #[error(transparent)]
    Storage(#[from] StorageError),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            CacheError::SourceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            CacheError::Factory(_) => StatusCode::BAD_GATEWAY,
            CacheError::Serialization(_) | CacheError::Storage(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
