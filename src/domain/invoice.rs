//! Invoice calculation
//!
//! Invoices are never stored. Each one is derived from a snapshot of an
//! aggregate at the moment it is requested.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{AggregateState, ObuId, RatePerUnit};

/// Amount due for an OBU's accumulated distance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    #[serde(rename = "obuID")]
    pub obu_id: ObuId,
    pub total_distance: Decimal,
    pub amount_due: Decimal,
    pub generated_at: DateTime<Utc>,
}

impl Invoice {
    /// Derive an invoice from a state snapshot.
    ///
    /// Pure: the same snapshot and rate always give the same `amount_due`.
    /// Cannot overflow because `RatePerUnit` and the store both bound their
    /// operands.
    pub fn calculate(state: &AggregateState, rate: RatePerUnit, generated_at: DateTime<Utc>) -> Self {
        Self {
            obu_id: state.obu_id,
            total_distance: state.total_distance,
            amount_due: state.total_distance * rate.value(),
            generated_at,
        }
    }
}
