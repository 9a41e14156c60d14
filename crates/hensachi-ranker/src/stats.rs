//! Aggregate statistics over a metric's observations.
//!
//! Mean and standard deviation are computed here, in decimal arithmetic,
//! rather than trusted from a storage engine. The standard deviation is the
//! population one (divide by N), which is what PostgreSQL's `STDDEV_POP`
//! returns for the same rows.

use rust_decimal::{Decimal, MathematicalOps};
use serde::Serialize;

use crate::error::{RankerError, Result};

/// One numeric measurement tied to an entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation<E> {
    pub entity: E,
    pub value: Decimal,
}

impl<E> Observation<E> {
    pub fn new(entity: E, value: Decimal) -> Self {
        Self { entity, value }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AggregateStats {
    pub count: usize,
    #[serde(with = "rust_decimal::serde::str")]
    pub mean: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub std: Decimal,
}

/// Population mean and standard deviation.
///
/// Fails with [`RankerError::NoData`] on an empty slice.
pub fn population_stats(values: &[Decimal]) -> Result<AggregateStats> {
    if values.is_empty() {
        return Err(RankerError::NoData);
    }
    let n = Decimal::from(values.len());

    let sum = values
        .iter()
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(*v))
        .ok_or_else(overflow)?;
    let mean = sum.checked_div(n).ok_or_else(overflow)?;

    let deviations: Vec<Decimal> = values
        .iter()
        .map(|v| v.checked_sub(mean))
        .collect::<Option<_>>()
        .ok_or_else(overflow)?;
    let std = scaled_rms(&deviations, n).ok_or_else(overflow)?;

    Ok(AggregateStats { count: values.len(), mean, std })
}

/// Root mean square of `deviations`.
///
/// Each term is divided by the largest magnitude before squaring, so the sum
/// of squares stays within `n` for any inputs that fit a decimal.
fn scaled_rms(deviations: &[Decimal], n: Decimal) -> Option<Decimal> {
    let scale = deviations.iter().map(|d| d.abs()).max().unwrap_or(Decimal::ZERO);
    if scale.is_zero() {
        return Some(Decimal::ZERO);
    }
    let sq_sum = deviations.iter().try_fold(Decimal::ZERO, |acc, d| {
        let r = d.checked_div(scale)?;
        acc.checked_add(r.checked_mul(r)?)
    })?;
    sq_sum.checked_div(n)?.sqrt()?.checked_mul(scale)
}

fn overflow() -> RankerError {
    RankerError::InvalidArgument("values out of range for aggregate statistics".into())
}

/// Read access to the stored observations of a metric.
///
/// Implementations can use:
/// - the in-process store (`hensachi-db`)
/// - a relational database
/// - mock data (testing)
///
/// Reads need not be isolated from concurrent writers: each call returns
/// whatever observations are visible at that moment.
pub trait ObservationSource: Send + Sync {
    type Entity: Clone + Send;
    type Error: From<RankerError>;

    /// All observations recorded for a metric, in storage order.
    /// An unknown metric yields an empty list.
    fn observations(&self, metric_id: u64) -> std::result::Result<Vec<Observation<Self::Entity>>, Self::Error>;

    /// Population statistics over the metric's observations.
    fn aggregate_stats(&self, metric_id: u64) -> std::result::Result<AggregateStats, Self::Error> {
        let values: Vec<Decimal> = self
            .observations(metric_id)?
            .into_iter()
            .map(|o| o.value)
            .collect();
        Ok(population_stats(&values)?)
    }
}

// ── Mock Implementation for Testing ────────────────────────────────────────

/// Mock source with hardcoded observations for unit tests.
#[derive(Debug, Default)]
pub struct MockObservationSource {
    data: std::collections::HashMap<u64, Vec<Observation<String>>>,
}

impl MockObservationSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an observation for a metric.
    pub fn with(mut self, metric_id: u64, entity: &str, value: Decimal) -> Self {
        self.data
            .entry(metric_id)
            .or_default()
            .push(Observation::new(entity.to_string(), value));
        self
    }
}

impl ObservationSource for MockObservationSource {
    type Entity = String;
    type Error = RankerError;

    fn observations(&self, metric_id: u64) -> Result<Vec<Observation<String>>> {
        Ok(self.data.get(&metric_id).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_population_std_of_ten_twenty_thirty() {
        let stats = population_stats(&[dec!(10), dec!(20), dec!(30)]).unwrap();
        assert_eq!(stats.count, 3);
        assert_eq!(stats.mean, dec!(20));
        // sqrt(200 / 3), not the sample value 10
        assert!((stats.std - dec!(8.164965809277260327)).abs() < dec!(0.000000000001));
    }

    #[test]
    fn test_single_value_has_zero_std() {
        let stats = population_stats(&[dec!(3776)]).unwrap();
        assert_eq!(stats.mean, dec!(3776));
        assert!(stats.std.is_zero());
    }

    #[test]
    fn test_widest_column_values_do_not_overflow() {
        let wide = dec!(99999999999999.999999);
        let mut values = vec![wide; 4];
        values.extend(vec![-wide; 4]);

        let stats = population_stats(&values).unwrap();
        assert_eq!(stats.count, 8);
        assert!(stats.mean.is_zero());
        assert!((stats.std - wide).abs() < dec!(0.000001), "{}", stats.std);
    }

    #[test]
    fn test_empty_is_no_data() {
        assert_eq!(population_stats(&[]), Err(RankerError::NoData));
    }

    #[test]
    fn test_mean_of_fractional_values() {
        let stats = population_stats(&[dec!(0.1), dec!(0.2), dec!(0.3)]).unwrap();
        assert_eq!(stats.mean, dec!(0.2));
    }

    #[test]
    fn test_mock_source_aggregates() {
        let source = MockObservationSource::new()
            .with(1, "a", dec!(2))
            .with(1, "b", dec!(4))
            .with(2, "c", dec!(100));

        let stats = source.aggregate_stats(1).unwrap();
        assert_eq!(stats.mean, dec!(3));
        assert!((stats.std - dec!(1)).abs() < dec!(0.000000001));
        assert_eq!(source.aggregate_stats(9), Err(RankerError::NoData));
    }
}
