//! Aggregator service module
//!
//! The single domain contract consumed by the HTTP and gRPC transports,
//! its concrete implementation, and the decorators stacked around it.

mod aggregator;
mod logging;
mod metrics;

pub use aggregator::AggregatorService;
pub use logging::LoggingAggregator;
pub use metrics::MetricsAggregator;

use std::sync::Arc;

use crate::domain::{AggregatorError, DistanceReport, Invoice, ObuId};

/// Distance ingestion and invoice derivation.
///
/// Every operation is synchronous: the core never blocks on I/O, the only
/// wait is a short lock acquisition inside the store.
pub trait Aggregator: Send + Sync {
    /// Validate a report and add it to the OBU's running total.
    ///
    /// A rejected report leaves the store untouched.
    fn aggregate_distance(&self, report: DistanceReport) -> Result<(), AggregatorError>;

    /// Compute a fresh invoice from the OBU's current total. Read-only.
    fn calculate_invoice(&self, obu_id: ObuId) -> Result<Invoice, AggregatorError>;

    /// Compute a fresh invoice for every OBU seen so far. Read-only.
    fn calculate_all_invoices(&self) -> Result<Vec<Invoice>, AggregatorError>;
}

impl<A: Aggregator + ?Sized> Aggregator for Arc<A> {
    fn aggregate_distance(&self, report: DistanceReport) -> Result<(), AggregatorError> {
        (**self).aggregate_distance(report)
    }

    fn calculate_invoice(&self, obu_id: ObuId) -> Result<Invoice, AggregatorError> {
        (**self).calculate_invoice(obu_id)
    }

    fn calculate_all_invoices(&self) -> Result<Vec<Invoice>, AggregatorError> {
        (**self).calculate_all_invoices()
    }
}

/// Shared handle handed to both transports
pub type SharedAggregator = Arc<dyn Aggregator>;
