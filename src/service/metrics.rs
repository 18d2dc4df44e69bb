//! Metrics decorator
//!
//! Request, error and latency instruments per Aggregator operation,
//! recorded through the `metrics` facade.

use std::time::Instant;

use metrics::{counter, histogram};

use crate::domain::{AggregatorError, DistanceReport, Invoice, ObuId};

use super::Aggregator;

const REQUESTS_TOTAL: &str = "aggregator_requests_total";
const ERRORS_TOTAL: &str = "aggregator_errors_total";
const REQUEST_DURATION: &str = "aggregator_request_duration_seconds";

/// Wraps the next Aggregator in the chain with Prometheus instruments.
pub struct MetricsAggregator<A> {
    next: A,
}

impl<A: Aggregator> MetricsAggregator<A> {
    pub fn new(next: A) -> Self {
        Self { next }
    }
}

/// Record one call. `start` is taken before forwarding.
fn track<T>(operation: &'static str, start: Instant, result: &Result<T, AggregatorError>) {
    counter!(REQUESTS_TOTAL, "operation" => operation).increment(1);
    histogram!(REQUEST_DURATION, "operation" => operation).record(start.elapsed().as_secs_f64());

    if let Err(e) = result {
        counter!(ERRORS_TOTAL, "operation" => operation, "kind" => e.kind()).increment(1);
    }
}

impl<A: Aggregator> Aggregator for MetricsAggregator<A> {
    fn aggregate_distance(&self, report: DistanceReport) -> Result<(), AggregatorError> {
        let start = Instant::now();
        let result = self.next.aggregate_distance(report);
        track("aggregate_distance", start, &result);
        result
    }

    fn calculate_invoice(&self, obu_id: ObuId) -> Result<Invoice, AggregatorError> {
        let start = Instant::now();
        let result = self.next.calculate_invoice(obu_id);
        track("calculate_invoice", start, &result);
        result
    }

    fn calculate_all_invoices(&self) -> Result<Vec<Invoice>, AggregatorError> {
        let start = Instant::now();
        let result = self.next.calculate_all_invoices();
        track("calculate_all_invoices", start, &result);
        result
    }
}
