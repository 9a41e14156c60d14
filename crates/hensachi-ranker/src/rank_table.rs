//! Static rank-code → "top %" tables.
//!
//! Some leaderboards only publish a tier distribution, never raw numbers.
//! Each tier maps to the share of players at or above it, which
//! [`score_from_top_percent`](crate::score::score_from_top_percent) turns
//! into a score.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::LazyLock;

use crate::error::{RankerError, Result};
use crate::score::{score_from_top_percent, TopPercentScore};

/// Provenance of a rank table. Informational only; never used in scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankMeta {
    pub season: &'static str,
    pub asof: &'static str,
    pub source_name: &'static str,
}

/// Immutable rank-code lookup, built once.
#[derive(Debug)]
pub struct RankTable {
    game: &'static str,
    entries: BTreeMap<&'static str, Decimal>,
    meta: RankMeta,
}

impl RankTable {
    pub fn new(game: &'static str, entries: &[(&'static str, Decimal)], meta: RankMeta) -> Self {
        Self {
            game,
            entries: entries.iter().copied().collect(),
            meta,
        }
    }

    pub fn game(&self) -> &'static str {
        self.game
    }

    pub fn meta(&self) -> &RankMeta {
        &self.meta
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Trimmed, lowercased form of a user-supplied code.
    pub fn normalize(rank_code: &str) -> String {
        rank_code.trim().to_lowercase()
    }

    /// "Top %" for a rank code. The code is normalized first; unknown codes
    /// fail with the full list of valid codes.
    pub fn lookup(&self, rank_code: &str) -> Result<Decimal> {
        let code = Self::normalize(rank_code);
        self.entries
            .get(code.as_str())
            .copied()
            .ok_or_else(|| RankerError::UnknownRankCode {
                rank_code: code,
                allowed: self.allowed(),
            })
    }

    /// Every valid code, sorted.
    pub fn allowed(&self) -> Vec<String> {
        self.entries.keys().map(|k| k.to_string()).collect()
    }

    /// Look up a code and score it.
    pub fn score(&self, rank_code: &str) -> Result<TopPercentScore> {
        score_from_top_percent(self.lookup(rank_code)?)
    }
}

// Top percentage of players per tier, Apex Legends season 27 (Dec 2025).
// "bronze-4" => 98.55 means 98.55% of players are at or above Bronze IV.
const APEX_RANK_TOP_PERCENT: [(&str, Decimal); 26] = [
    ("rookie-4", dec!(99.98)),
    ("rookie-3", dec!(99.67)),
    ("rookie-2", dec!(99.66)),
    ("rookie-1", dec!(99.65)),
    ("bronze-4", dec!(98.55)),
    ("bronze-3", dec!(94.92)),
    ("bronze-2", dec!(93.57)),
    ("bronze-1", dec!(91.96)),
    ("silver-4", dec!(90.53)),
    ("silver-3", dec!(83.55)),
    ("silver-2", dec!(79.75)),
    ("silver-1", dec!(77.18)),
    ("gold-4", dec!(74.78)),
    ("gold-3", dec!(63.76)),
    ("gold-2", dec!(57.55)),
    ("gold-1", dec!(53.65)),
    ("platinum-4", dec!(50.66)),
    ("platinum-3", dec!(38.47)),
    ("platinum-2", dec!(23.48)),
    ("platinum-1", dec!(15.57)),
    ("diamond-4", dec!(10.37)),
    ("diamond-3", dec!(5.68)),
    ("diamond-2", dec!(1.89)),
    ("diamond-1", dec!(0.73)),
    ("master", dec!(0.25)),
    ("predator", dec!(0.24)),
];

pub static APEX_RANKS: LazyLock<RankTable> = LazyLock::new(|| {
    RankTable::new(
        "apex-legends",
        &APEX_RANK_TOP_PERCENT,
        RankMeta {
            season: "27",
            asof: "Dec 2025",
            source_name: "EsportsTales (compiled from Apex Legends Status)",
        },
    )
});
