//! hensachi-ranker: Standard score engine.
//!
//! Converts raw observations, or percentile-only inputs such as game ranks,
//! into hensachi scores (mean 50, scale 10) and assembles leaderboards.

pub mod error;
pub mod leaderboard;
pub mod probit;
pub mod rank_table;
pub mod score;
pub mod stats;

pub use error::{RankerError, Result};
pub use leaderboard::{
    build_leaderboard, leaderboard_for, position_of, rank_with_stats, Leaderboard, LeaderboardEntry, Standing,
};
pub use probit::probit;
pub use rank_table::{RankMeta, RankTable, APEX_RANKS};
pub use score::{score_from_top_percent, standard_score, ScoreResult, TopPercentScore};
pub use stats::{population_stats, AggregateStats, MockObservationSource, Observation, ObservationSource};
