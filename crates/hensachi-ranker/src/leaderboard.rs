//! Leaderboard assembly.
//!
//! Scores every observation of a metric against the population statistics of
//! that same set and orders the result best-first. Equal scores keep the
//! order the observations were fetched in; no secondary key is applied, so
//! ties between equal values follow storage order.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use tracing::debug;

use crate::error::{RankerError, Result};
use crate::score::{standard_score, ScoreResult};
use crate::stats::{population_stats, AggregateStats, Observation, ObservationSource};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardEntry<E> {
    pub entity: E,
    #[serde(with = "rust_decimal::serde::str")]
    pub value: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub score: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Leaderboard<E> {
    pub entries: Vec<LeaderboardEntry<E>>,
    pub count: usize,
    #[serde(with = "rust_decimal::serde::str")]
    pub mean: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub std: Decimal,
}

/// Score and sort a metric's observations.
///
/// Fails with `NoData` when `observations` is empty.
pub fn build_leaderboard<E>(observations: Vec<Observation<E>>) -> Result<Leaderboard<E>> {
    let values: Vec<Decimal> = observations.iter().map(|o| o.value).collect();
    let stats = population_stats(&values)?;
    rank_with_stats(observations, &stats)
}

/// Score observations against precomputed statistics.
///
/// The caller is responsible for `stats` describing the same observation set.
pub fn rank_with_stats<E>(observations: Vec<Observation<E>>, stats: &AggregateStats) -> Result<Leaderboard<E>> {
    let mut entries: Vec<LeaderboardEntry<E>> = observations
        .into_iter()
        .map(|o| {
            Ok(LeaderboardEntry {
                score: standard_score(o.value, stats.mean, stats.std)?,
                value: o.value,
                entity: o.entity,
            })
        })
        .collect::<Result<_>>()?;

    // stable: equal scores keep fetch order
    entries.sort_by(|a, b| b.score.cmp(&a.score));

    debug!(count = entries.len(), mean = %stats.mean, std = %stats.std, "leaderboard assembled");

    Ok(Leaderboard {
        count: entries.len(),
        entries,
        mean: stats.mean,
        std: stats.std,
    })
}

/// Fetch a metric's observations from `source` and build its leaderboard.
pub fn leaderboard_for<S: ObservationSource + ?Sized>(
    source: &S,
    metric_id: u64,
) -> std::result::Result<Leaderboard<S::Entity>, S::Error> {
    Ok(build_leaderboard(source.observations(metric_id)?)?)
}

/// Where a single value stands within a population.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Standing {
    pub score: ScoreResult,
    pub count: usize,
    /// `x - mean`.
    #[serde(with = "rust_decimal::serde::str")]
    pub diff: Decimal,
    /// 1 is best: one more than the number of strictly greater values.
    pub rank: usize,
    /// Share of the population strictly below `x`, 0–100.
    #[serde(with = "rust_decimal::serde::str")]
    pub percentile: Decimal,
    /// `rank / count * 100`, with `rank` capped at `count`; smaller is better.
    #[serde(with = "rust_decimal::serde::str")]
    pub top_percent: Decimal,
}

/// Score `x` against `values` and locate it within them.
///
/// `x` need not be one of `values`. Fails with `NoData` on an empty population
/// and with `InvalidArgument` when `x` is too far from the mean to score.
pub fn position_of(x: Decimal, values: &[Decimal]) -> Result<Standing> {
    let stats = population_stats(values)?;
    let score = ScoreResult::from_stats(x, &stats)?;
    let diff = x
        .checked_sub(stats.mean)
        .ok_or_else(|| RankerError::InvalidArgument(format!("x out of range: {x}")))?;
    let above = values.iter().filter(|v| **v > x).count();
    let below = values.iter().filter(|v| **v < x).count();
    let n = Decimal::from(stats.count);
    let rank = above + 1;

    Ok(Standing {
        score,
        count: stats.count,
        diff,
        rank,
        percentile: Decimal::from(below) * dec!(100) / n,
        top_percent: Decimal::from(rank.min(stats.count)) * dec!(100) / n,
    })
}
