//! Logging decorator
//!
//! Emits one structured event per Aggregator call and forwards the result
//! unchanged.

use std::time::Instant;

use crate::domain::{AggregatorError, DistanceReport, Invoice, ObuId};

use super::Aggregator;

/// Wraps the next Aggregator in the chain with `tracing` events.
pub struct LoggingAggregator<A> {
    next: A,
}

impl<A: Aggregator> LoggingAggregator<A> {
    pub fn new(next: A) -> Self {
        Self { next }
    }
}

impl<A: Aggregator> Aggregator for LoggingAggregator<A> {
    fn aggregate_distance(&self, report: DistanceReport) -> Result<(), AggregatorError> {
        let obu_id = report.obu_id;
        let distance = report.value;
        let start = Instant::now();

        let result = self.next.aggregate_distance(report);

        let took_us = start.elapsed().as_micros() as u64;
        match &result {
            Ok(()) => tracing::info!(obu_id, %distance, took_us, "Aggregated distance"),
            Err(e) => tracing::warn!(
                obu_id,
                %distance,
                took_us,
                error = %e,
                kind = e.kind(),
                "Aggregate distance failed"
            ),
        }
        result
    }

    fn calculate_invoice(&self, obu_id: ObuId) -> Result<Invoice, AggregatorError> {
        let start = Instant::now();

        let result = self.next.calculate_invoice(obu_id);

        let took_us = start.elapsed().as_micros() as u64;
        match &result {
            Ok(invoice) => tracing::info!(
                %obu_id,
                total_distance = %invoice.total_distance,
                amount_due = %invoice.amount_due,
                took_us,
                "Calculated invoice"
            ),
            Err(e) => tracing::warn!(
                %obu_id,
                took_us,
                error = %e,
                kind = e.kind(),
                "Calculate invoice failed"
            ),
        }
        result
    }

    fn calculate_all_invoices(&self) -> Result<Vec<Invoice>, AggregatorError> {
        let start = Instant::now();

        let result = self.next.calculate_all_invoices();

        let took_us = start.elapsed().as_micros() as u64;
        match &result {
            Ok(invoices) => tracing::info!(count = invoices.len(), took_us, "Calculated all invoices"),
            Err(e) => tracing::warn!(took_us, error = %e, "Calculate all invoices failed"),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RatePerUnit;
    use crate::service::AggregatorService;
    use crate::store::MemoryStore;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn logged() -> LoggingAggregator<AggregatorService> {
        let store = Arc::new(MemoryStore::new());
        LoggingAggregator::new(AggregatorService::new(store, RatePerUnit::default()))
    }

    #[test]
    fn test_forwards_success() {
        let svc = logged();
        svc.aggregate_distance(DistanceReport::new(1, dec!(10))).unwrap();

        let invoice = svc.calculate_invoice(ObuId::from(1)).unwrap();
        assert_eq!(invoice.total_distance, dec!(10));
        assert_eq!(svc.calculate_all_invoices().unwrap().len(), 1);
    }

    #[test]
    fn test_forwards_errors_unchanged() {
        let svc = logged();

        let err = svc.aggregate_distance(DistanceReport::new(1, dec!(-1))).unwrap_err();
        assert!(matches!(err, AggregatorError::Validation(_)));

        let err = svc.calculate_invoice(ObuId::from(5)).unwrap_err();
        assert_eq!(err, AggregatorError::NotFound(ObuId::from(5)));
    }
}
