//! Domain Error Types
//!
//! Errors raised by the aggregation core. They are independent of the
//! HTTP and gRPC transports, which map them to their own status codes.

use thiserror::Error;

use super::ObuId;

/// Errors returned by the Aggregator contract.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AggregatorError {
    /// Malformed or out-of-range input; nothing was written to the store
    #[error("Validation error: {0}")]
    Validation(String),

    /// Invoice requested for an OBU that never reported
    #[error("No aggregate found for OBU {0}")]
    NotFound(ObuId),

    /// Shared state could not be read or mutated
    #[error("Store error: {0}")]
    Store(String),
}

impl AggregatorError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a store error
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    /// Check if this is a client error (caller's fault, never retried)
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Short machine-readable label, used for logs and metrics
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::NotFound(_) => "not_found",
            Self::Store(_) => "store",
        }
    }
}
