//! Aggregation Store module
//!
//! Owns every `AggregateState` and serializes mutations to them.

mod memory;

pub use memory::MemoryStore;

use crate::domain::{AggregateState, AggregatorError, ObuId, ValidReport};

/// Shared per-OBU running totals.
///
/// Implementations must be linearizable per OBU: concurrent `accumulate`
/// calls for the same id never lose an update, and `snapshot` never sees a
/// half-applied one.
pub trait AggregateStore: Send + Sync {
    /// Add a validated report to the OBU's total, creating the state on the
    /// first report.
    fn accumulate(&self, report: &ValidReport) -> Result<(), AggregatorError>;

    /// Copy of the current state.
    ///
    /// # Errors
    /// - `AggregatorError::NotFound` if the OBU never reported
    fn snapshot(&self, obu_id: ObuId) -> Result<AggregateState, AggregatorError>;

    /// Copies of every state, ordered by OBU id.
    fn snapshot_all(&self) -> Result<Vec<AggregateState>, AggregatorError>;
}
