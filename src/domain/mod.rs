//! Domain module
//!
//! Core domain types and billing rules.

pub mod aggregate;
pub mod error;
pub mod invoice;
pub mod obu;
pub mod rate;

pub use aggregate::AggregateState;
pub use error::AggregatorError;
pub use invoice::Invoice;
pub use obu::{DistanceReport, ObuId, ValidReport, DISTANCE_SCALE, MAX_DISTANCE_METERS};
pub use rate::{RateError, RatePerUnit};
