//! hensachi-common: Shared types, errors, and decimal helpers used across all hensachi crates.

pub mod decimal;
pub mod entities;
pub mod error;

pub use decimal::{parse_decimal, parse_json_decimal, DecimalError};
pub use entities::{Dataset, Item, Metric, Privacy, UserMetric, UserValue, Value, ValueType};
pub use error::ApiError;
