//! Error handling module
//!
//! HTTP-facing error type and its response conversion.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::domain::AggregatorError;

/// Application-wide Result type
pub type AppResult<T> = Result<T, AppError>;

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Transport errors (4xx), raised before the service is called
    #[error("{0}")]
    InvalidRequest(String),

    #[error("method not supported")]
    MethodNotSupported,

    #[error("missing OBU ID")]
    MissingObuId,

    #[error("invalid OBU ID")]
    InvalidObuId,

    // Domain errors
    #[error(transparent)]
    Domain(#[from] AggregatorError),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_code: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_code) = match &self {
            // 400 Bad Request
            AppError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "invalid_request"),
            AppError::MethodNotSupported => (StatusCode::BAD_REQUEST, "method_not_supported"),
            AppError::MissingObuId => (StatusCode::BAD_REQUEST, "missing_obu_id"),
            AppError::InvalidObuId => (StatusCode::BAD_REQUEST, "invalid_obu_id"),

            // Domain errors. Only caller mistakes are 4xx; not-found stays a
            // server fault like every other service error.
            AppError::Domain(domain_err) => {
                let status = if domain_err.is_client_error() {
                    StatusCode::BAD_REQUEST
                } else {
                    StatusCode::INTERNAL_SERVER_ERROR
                };
                let code = match domain_err {
                    AggregatorError::Validation(_) => "validation_error",
                    AggregatorError::NotFound(_) => "not_found",
                    AggregatorError::Store(msg) => {
                        tracing::error!("Store error: {}", msg);
                        "store_error"
                    }
                };
                (status, code)
            }
        };

        let body = ErrorResponse {
            error: self.to_string(),
            error_code: error_code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
