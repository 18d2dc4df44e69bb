//! Configuration module
//!
//! Loads configuration from environment variables.

use std::env;
use std::net::SocketAddr;

use crate::domain::RatePerUnit;

/// gRPC listen address
pub const GRPC_ENDPOINT_ENV: &str = "AGG_GRPC_ENDPOINT";

/// HTTP listen address
pub const HTTP_ENDPOINT_ENV: &str = "AGG_HTTP_ENDPOINT";

/// Billing rate per meter
pub const RATE_PER_UNIT_ENV: &str = "AGG_RATE_PER_UNIT";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the gRPC server binds to
    pub grpc_addr: SocketAddr,

    /// Address the HTTP server binds to
    pub http_addr: SocketAddr,

    /// Process-wide billing rate
    pub rate_per_unit: RatePerUnit,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let grpc_addr = listen_addr(&lookup, GRPC_ENDPOINT_ENV)?;
        let http_addr = listen_addr(&lookup, HTTP_ENDPOINT_ENV)?;

        let rate_per_unit = match lookup(RATE_PER_UNIT_ENV) {
            Some(raw) => raw
                .parse()
                .map_err(|_| ConfigError::InvalidValue(RATE_PER_UNIT_ENV))?,
            None => RatePerUnit::default(),
        };

        Ok(Self {
            grpc_addr,
            http_addr,
            rate_per_unit,
        })
    }
}

/// Parse a listen address. A bare `:port` binds every interface.
fn listen_addr(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<SocketAddr, ConfigError> {
    let raw = lookup(key).ok_or(ConfigError::MissingEnv(key))?;
    let raw = raw.trim();

    let parsed = match raw.strip_prefix(':') {
        Some(port) => port.parse::<u16>().ok().map(|port| SocketAddr::from(([0, 0, 0, 0], port))),
        None => raw.parse().ok(),
    };
    parsed.ok_or(ConfigError::InvalidValue(key))
}

/// Configuration error types
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(&'static str),
}
