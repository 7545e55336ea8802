//! Error types for the station catalogue
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Station Error Enum ==
/// Unified error type for the station catalogue.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StationError {
    /// Initial dataset is missing, empty or malformed
    #[error("Invalid station data: {0}")]
    Data(String),

    /// A station with this number already exists
    #[error("Station with number {0} already exists")]
    Conflict(u32),

    /// No station with this number
    #[error("Station with number {0} not found")]
    NotFound(u32),

    /// A simulator pass failed; retried on the next tick
    #[error("Transient failure: {0}")]
    Transient(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for StationError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            StationError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            StationError::Conflict(_) => (StatusCode::CONFLICT, self.to_string()),
            StationError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            StationError::Transient(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Service temporarily unavailable".to_string(),
            ),
            StationError::Data(_) | StationError::Internal(_) => {
                tracing::error!("Request failed: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse::new(message));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the station catalogue.
pub type Result<T> = std::result::Result<T, StationError>;
