//! Error types for the catalog service
//!
//! Three layers of errors live here:
//! - `CatalogError`: what callers (and the HTTP layer) see
//! - `StoreError`: failures reported by a backing store
//! - `CacheError`: failures reported by a cache backend; these never leave
//!   the coordinator

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Catalog Error Enum ==
/// Caller-visible error type for catalog and auth operations.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// No record exists for the requested id
    #[error("{0}")]
    NotFound(String),

    /// The acting user does not own the record
    #[error("{0}")]
    Forbidden(String),

    /// Malformed input (filter values, record fields, duplicate unique fields)
    #[error("{0}")]
    ValidationFailed(String),

    /// Missing or invalid credentials
    #[error("{0}")]
    Unauthorized(String),

    /// The backing store could not serve the request
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let status = match &self {
            CatalogError::NotFound(_) => StatusCode::NOT_FOUND,
            CatalogError::Forbidden(_) => StatusCode::FORBIDDEN,
            CatalogError::ValidationFailed(_) => StatusCode::BAD_REQUEST,
            CatalogError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            CatalogError::StoreUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CatalogError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

impl From<StoreError> for CatalogError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(msg) => CatalogError::ValidationFailed(msg),
            other => CatalogError::StoreUnavailable(other.to_string()),
        }
    }
}

// == Store Error Enum ==
/// Errors reported by a backing store.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    /// Transient I/O failure; the caller may retry
    #[error("backing store unavailable: {0}")]
    Unavailable(String),

    /// A unique field is already taken
    #[error("{0}")]
    Conflict(String),

    /// The store did not answer in time
    #[error("backing store timed out after {0}ms")]
    Timeout(u64),
}

// == Cache Error Enum ==
/// Errors reported by a cache backend.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CacheError {
    /// The backend could not be reached
    #[error("cache unavailable: {0}")]
    Unavailable(String),

    /// The backend did not answer in time
    #[error("cache timed out after {0}ms")]
    Timeout(u64),

    /// The backend refused the entry (oversize key or value)
    #[error("cache rejected entry: {0}")]
    Rejected(String),

    /// A cached payload could not be encoded or decoded
    #[error("cache serialization error: {0}")]
    Serialization(String),
}

impl From<redis::RedisError> for CacheError {
    fn from(err: redis::RedisError) -> Self {
        CacheError::Unavailable(err.to_string())
    }
}

impl From<serde_json::Error> for CacheError {
    fn from(err: serde_json::Error) -> Self {
        CacheError::Serialization(err.to_string())
    }
}

// == Result Type Aliases ==
/// Convenience Result type for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Result type for backing store calls.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Result type for cache backend calls.
pub type CacheResult<T> = std::result::Result<T, CacheError>;
