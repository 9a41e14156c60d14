//! Rank-only scores for Apex Legends tiers.

use axum::{extract::Path, Json};
use hensachi_common::error::ApiResult;
use hensachi_ranker::{RankMeta, RankerError, APEX_RANKS};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::warn;

#[derive(Debug, Serialize)]
pub struct RankHensachiResponse {
    pub game: &'static str,
    pub metric: &'static str,
    pub rank_code: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub top_percent: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub bottom_percent: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub hensachi: Decimal,
    pub meta: RankMeta,
}

/// Score a tier from its published top-percent share.
///
/// `GET /api/apex/rank/hensachi/{rank_code}/`
pub async fn apex_rank_hensachi(Path(rank_code): Path<String>) -> ApiResult<Json<RankHensachiResponse>> {
    let code = hensachi_ranker::RankTable::normalize(&rank_code);
    let scored = APEX_RANKS.score(&code).inspect_err(|e| {
        if matches!(e, RankerError::UnknownRankCode { .. }) {
            warn!(rank_code = %code, "unknown rank code");
        }
    })?;

    Ok(Json(RankHensachiResponse {
        game: APEX_RANKS.game(),
        metric: "rank",
        rank_code: code,
        top_percent: scored.top_percent,
        bottom_percent: scored.bottom_percent,
        hensachi: scored.hensachi,
        meta: APEX_RANKS.meta().clone(),
    }))
}
