//! hensachi-web: JSON API for hensachi scores.
//! Provides:
//!   - Dataset and metric listings
//!   - Per-metric leaderboards scored against live aggregates
//!   - Anonymous user submissions, scoring and history
//!   - Rank-only scores from published tier distributions

pub mod config;
pub mod handlers;
pub mod router;
pub mod state;
