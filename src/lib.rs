//! obu-aggregator Library
//!
//! Distance aggregation and invoicing for vehicle On-Board Units.
//! Re-exports modules for the service binary, the simulator and
//! integration testing.

pub mod api;
pub mod config;
pub mod domain;
pub mod grpc;
pub mod service;
pub mod store;

mod error;

pub use config::{Config, ConfigError};
pub use domain::{AggregateState, AggregatorError, DistanceReport, Invoice, ObuId, RatePerUnit};
pub use error::{AppError, AppResult, ErrorResponse};
pub use service::{Aggregator, AggregatorService, LoggingAggregator, MetricsAggregator, SharedAggregator};
pub use store::{AggregateStore, MemoryStore};
