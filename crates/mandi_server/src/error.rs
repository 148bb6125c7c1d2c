//! API error responses
//!
//! Maps engine errors onto HTTP status codes with a JSON body:
//! `{"error": "unknown_commodity", "message": "Unknown commodity: quinoa"}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use mandi_engine::{QueryError, RegistryError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// JSON error body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine-readable error code
    pub error: String,
    /// Human-readable message
    pub message: String,
}

/// Errors returned by request handlers
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Query(#[from] QueryError),

    #[error("Commodity registry unavailable: {0}")]
    Unavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<RegistryError> for ApiError {
    fn from(err: RegistryError) -> Self {
        ApiError::Unavailable(err.to_string())
    }
}

impl ApiError {
    /// HTTP status and error code
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Query(QueryError::UnknownCommodity(_)) => {
                (StatusCode::NOT_FOUND, "unknown_commodity")
            }
            ApiError::Query(QueryError::InvalidHorizon { .. }) => {
                (StatusCode::BAD_REQUEST, "invalid_horizon")
            }
            ApiError::Query(QueryError::NotInitialized) | ApiError::Unavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "registry_unavailable")
            }
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let body = ErrorResponse {
            error: code.to_string(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
