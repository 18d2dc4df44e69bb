//! Aggregator Service
//!
//! Validates reports, forwards them to the store and derives invoices from
//! store snapshots.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::{AggregatorError, DistanceReport, Invoice, ObuId, RatePerUnit};
use crate::store::AggregateStore;

use super::Aggregator;

/// The concrete Aggregator. Holds no state of its own besides the rate.
#[derive(Clone)]
pub struct AggregatorService {
    store: Arc<dyn AggregateStore>,
    rate: RatePerUnit,
}

impl AggregatorService {
    pub fn new(store: Arc<dyn AggregateStore>, rate: RatePerUnit) -> Self {
        Self { store, rate }
    }
}

impl Aggregator for AggregatorService {
    fn aggregate_distance(&self, report: DistanceReport) -> Result<(), AggregatorError> {
        let report = report.validate()?;
        self.store.accumulate(&report)
    }

    fn calculate_invoice(&self, obu_id: ObuId) -> Result<Invoice, AggregatorError> {
        let state = self.store.snapshot(obu_id)?;
        Ok(Invoice::calculate(&state, self.rate, Utc::now()))
    }

    fn calculate_all_invoices(&self) -> Result<Vec<Invoice>, AggregatorError> {
        let generated_at = Utc::now();
        let invoices = self
            .store
            .snapshot_all()?
            .iter()
            .map(|state| Invoice::calculate(state, self.rate, generated_at))
            .collect();
        Ok(invoices)
    }
}
