//! OBU identifiers and distance reports
//!
//! A report is the unit of ingestion: one distance measurement sent by a
//! vehicle-mounted On-Board Unit.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::AggregatorError;

/// Finest accepted distance resolution (millimetres)
pub const DISTANCE_SCALE: u32 = 3;

/// Upper bound for a single report and for any running total (1 billion km)
pub const MAX_DISTANCE_METERS: Decimal = Decimal::from_parts(3567587328, 232, 0, false, 0);

/// Identifier of a vehicle unit. Never reused across units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObuId(u64);

impl ObuId {
    /// Create an identifier from a signed wire integer.
    ///
    /// # Errors
    /// - `AggregatorError::Validation` if the value is negative
    pub fn new(value: i64) -> Result<Self, AggregatorError> {
        u64::try_from(value)
            .map(Self)
            .map_err(|_| AggregatorError::validation(format!("invalid OBU ID: {}", value)))
    }

    /// Get the raw identifier
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl From<u64> for ObuId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for ObuId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ObuId {
    type Err = AggregatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(Self)
            .map_err(|_| AggregatorError::validation(format!("invalid OBU ID: {:?}", s)))
    }
}

/// A distance measurement as decoded from the wire.
///
/// Field names follow the JSON produced by the OBU fleet:
/// `{"obuID": 7, "value": 12.5, "unix": 1700000000}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceReport {
    #[serde(rename = "obuID")]
    pub obu_id: i64,

    /// Distance travelled in meters
    pub value: Decimal,

    /// Unix timestamp (seconds) of the measurement; 0 when unknown
    #[serde(default)]
    pub unix: i64,
}

impl DistanceReport {
    pub fn new(obu_id: i64, value: Decimal) -> Self {
        Self {
            obu_id,
            value,
            unix: 0,
        }
    }

    pub fn with_unix(mut self, unix: i64) -> Self {
        self.unix = unix;
        self
    }

    /// Check the report and return it in the form the store accepts.
    ///
    /// # Errors
    /// - `AggregatorError::Validation` for a negative OBU id, a negative
    ///   distance, a distance finer than millimetres, or a distance above
    ///   `MAX_DISTANCE_METERS`
    pub fn validate(&self) -> Result<ValidReport, AggregatorError> {
        let obu_id = ObuId::new(self.obu_id)?;

        if self.value < Decimal::ZERO {
            return Err(AggregatorError::validation(format!(
                "distance must not be negative (got {})",
                self.value
            )));
        }
        let distance = self.value.normalize();
        if distance.scale() > DISTANCE_SCALE {
            return Err(AggregatorError::validation(format!(
                "distance has more than {} decimal places (got {})",
                DISTANCE_SCALE, self.value
            )));
        }
        if distance > MAX_DISTANCE_METERS {
            return Err(AggregatorError::validation(format!(
                "distance exceeds maximum of {} meters",
                MAX_DISTANCE_METERS
            )));
        }

        let recorded_at = if self.unix > 0 {
            DateTime::from_timestamp(self.unix, 0).unwrap_or_else(Utc::now)
        } else {
            Utc::now()
        };

        Ok(ValidReport {
            obu_id,
            distance,
            recorded_at,
        })
    }
}

/// A report that passed validation. Only this form reaches the store.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidReport {
    pub obu_id: ObuId,
    pub distance: Decimal,
    pub recorded_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_max_distance_constant() {
        assert_eq!(MAX_DISTANCE_METERS, dec!(1000000000000));
    }

    #[test]
    fn test_obu_id_from_str() {
        assert_eq!("17".parse::<ObuId>().unwrap(), ObuId::from(17));
        assert!(matches!("abc".parse::<ObuId>(), Err(AggregatorError::Validation(_))));
        assert!(matches!("-1".parse::<ObuId>(), Err(AggregatorError::Validation(_))));
        assert!(matches!("".parse::<ObuId>(), Err(AggregatorError::Validation(_))));
    }

    #[test]
    fn test_obu_id_negative_rejected() {
        let err = ObuId::new(-5).unwrap_err();
        assert!(err.to_string().contains("invalid OBU ID"));
    }

    #[test]
    fn test_report_from_json() {
        let report: DistanceReport =
            serde_json::from_str(r#"{"obuID": 3, "value": 12.5, "unix": 1700000000}"#).unwrap();

        assert_eq!(report.obu_id, 3);
        assert_eq!(report.value, dec!(12.5));
        assert_eq!(report.unix, 1700000000);
    }

    #[test]
    fn test_report_unix_optional() {
        let report: DistanceReport = serde_json::from_str(r#"{"obuID": 3, "value": 1}"#).unwrap();
        assert_eq!(report.unix, 0);
    }

    #[test]
    fn test_validate_accepts_zero() {
        let valid = DistanceReport::new(1, Decimal::ZERO).validate().unwrap();
        assert_eq!(valid.distance, Decimal::ZERO);
    }

    #[test]
    fn test_validate_rejects_negative_distance() {
        let result = DistanceReport::new(1, dec!(-0.5)).validate();
        assert!(matches!(result, Err(AggregatorError::Validation(_))));
    }

    #[test]
    fn test_validate_rejects_negative_obu() {
        let result = DistanceReport::new(-1, dec!(10)).validate();
        assert!(matches!(result, Err(AggregatorError::Validation(_))));
    }

    #[test]
    fn test_validate_rejects_huge_distance() {
        let result = DistanceReport::new(1, MAX_DISTANCE_METERS + dec!(1)).validate();
        assert!(matches!(result, Err(AggregatorError::Validation(_))));
    }

    #[test]
    fn test_validate_rejects_sub_millimetre_distance() {
        for value in [dec!(0.0004), dec!(1.0005), dec!(10.123456)] {
            let result = DistanceReport::new(1, value).validate();
            assert!(matches!(result, Err(AggregatorError::Validation(_))), "{} accepted", value);
        }
    }

    #[test]
    fn test_validate_keeps_distance_unchanged() {
        let valid = DistanceReport::new(1, dec!(10.123)).validate().unwrap();
        assert_eq!(valid.distance, dec!(10.123));

        // Trailing zeros are not extra precision
        let valid = DistanceReport::new(1, dec!(2.5000000)).validate().unwrap();
        assert_eq!(valid.distance, dec!(2.5));
        assert_eq!(valid.distance.scale(), 1);
    }

    #[test]
    fn test_validate_uses_report_timestamp() {
        let valid = DistanceReport::new(1, dec!(1)).with_unix(1700000000).validate().unwrap();
        assert_eq!(valid.recorded_at.timestamp(), 1700000000);
    }
}
