//! Hensachi score computation.
//!
//! Raw values, means and standard deviations stay in decimal arithmetic so the
//! same inputs always print the same score. Binary floating point is only
//! used inside [`probit`].

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use std::str::FromStr;

use crate::error::{RankerError, Result};
use crate::probit::probit;
use crate::stats::AggregateStats;

const FIFTY: Decimal = dec!(50);
const TEN: Decimal = Decimal::TEN;
const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Smallest distance from 0 and 1 a probability is clamped to before
/// inversion; the normal model is unbounded at the 0th and 100th percentile.
pub const PROBABILITY_EPSILON: f64 = 1e-9;

/// `50 + 10 * (x - mean) / std`, or exactly 50 when `std` is zero.
///
/// Fails with `InvalidArgument` when an intermediate leaves the decimal range.
pub fn standard_score(x: Decimal, mean: Decimal, std: Decimal) -> Result<Decimal> {
    if std.is_zero() {
        return Ok(FIFTY);
    }
    x.checked_sub(mean)
        .and_then(|d| d.checked_mul(TEN))
        .and_then(|d| d.checked_div(std))
        .and_then(|z| z.checked_add(FIFTY))
        .ok_or_else(|| RankerError::InvalidArgument(format!("score out of range for x = {x}")))
}

/// A score together with the statistics it was computed from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreResult {
    #[serde(with = "rust_decimal::serde::str")]
    pub raw_input: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub hensachi_score: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub mean: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub std: Decimal,
    #[serde(with = "rust_decimal::serde::str_option", skip_serializing_if = "Option::is_none")]
    pub cdf_percent: Option<Decimal>,
}

impl ScoreResult {
    pub fn from_stats(x: Decimal, stats: &AggregateStats) -> Result<Self> {
        Ok(Self {
            raw_input: x,
            hensachi_score: standard_score(x, stats.mean, stats.std)?,
            mean: stats.mean,
            std: stats.std,
            cdf_percent: None,
        })
    }
}

/// Result of scoring a "top X%" standing.
#[derive(Debug, Clone, PartialEq)]
pub struct TopPercentScore {
    pub top_percent: Decimal,
    /// Share of the population below, `100 - top_percent`.
    pub bottom_percent: Decimal,
    pub hensachi: Decimal,
}

/// Score a standing given as "top `top_percent`%" (smaller is better).
///
/// The cumulative probability is clamped into `[ε, 1 - ε]` so inputs of
/// exactly 0 or 100 still produce a finite score.
pub fn score_from_top_percent(top_percent: Decimal) -> Result<TopPercentScore> {
    let bottom_percent = HUNDRED - top_percent;

    let mut p = (bottom_percent / HUNDRED)
        .to_f64()
        .ok_or_else(|| RankerError::InvalidArgument(format!("top_percent out of range: {top_percent}")))?;
    if p <= 0.0 {
        p = PROBABILITY_EPSILON;
    }
    if p >= 1.0 {
        p = 1.0 - PROBABILITY_EPSILON;
    }

    let z = probit(p)?;
    let hensachi = FIFTY + TEN * decimal_from_f64(z)?;

    Ok(TopPercentScore { top_percent, bottom_percent, hensachi })
}

/// Convert through the shortest round-trip text form, so `z` enters decimal
/// arithmetic with exactly the digits it prints as.
fn decimal_from_f64(z: f64) -> Result<Decimal> {
    Decimal::from_str(&z.to_string())
        .ok()
        .or_else(|| Decimal::from_f64(z))
        .ok_or_else(|| RankerError::InvalidArgument(format!("not representable as decimal: {z}")))
}
