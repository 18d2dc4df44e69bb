//! Aggregate state
//!
//! Running distance total for a single OBU. Instances live inside the
//! aggregation store; everything outside the store only sees copies.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use super::{AggregatorError, ObuId, ValidReport, MAX_DISTANCE_METERS};

/// Per-OBU accumulator.
///
/// # Invariants
/// - `total_distance` is the exact sum of every accepted distance
/// - `total_distance` never exceeds `MAX_DISTANCE_METERS`
/// - `report_count` >= 1 (state only exists after a first report)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateState {
    #[serde(rename = "obuID")]
    pub obu_id: ObuId,
    pub total_distance: Decimal,
    pub report_count: u64,
    pub last_updated: DateTime<Utc>,
}

impl AggregateState {
    /// Start a new aggregate from the first accepted report
    pub fn open(report: &ValidReport) -> Self {
        Self {
            obu_id: report.obu_id,
            total_distance: report.distance,
            report_count: 1,
            last_updated: report.recorded_at,
        }
    }

    /// Add a report to the running total.
    ///
    /// The state is left untouched when the error is returned.
    pub fn accumulate(&mut self, report: &ValidReport) -> Result<(), AggregatorError> {
        let total = self
            .total_distance
            .checked_add(report.distance)
            .filter(|total| *total <= MAX_DISTANCE_METERS)
            .ok_or_else(|| {
                AggregatorError::store(format!(
                    "total distance for OBU {} would exceed {} meters",
                    self.obu_id, MAX_DISTANCE_METERS
                ))
            })?;

        self.total_distance = total;
        self.report_count += 1;
        if report.recorded_at > self.last_updated {
            self.last_updated = report.recorded_at;
        }
        Ok(())
    }
}
