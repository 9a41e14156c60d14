//! Anonymous user submissions: submit, score against everyone, history.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use hensachi_common::error::{ApiError, ApiResult};
use hensachi_common::{parse_decimal, parse_json_decimal};
use hensachi_ranker::{position_of, RankerError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::state::SharedState;

/// History page size when `limit` is absent or unparsable.
pub const DEFAULT_HISTORY_LIMIT: i64 = 10;

#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    pub user_hash: Option<String>,
    pub value: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct UserHensachiResponse {
    pub user_metric: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub x: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub hensachi: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub mean: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub std: Decimal,
    pub count: usize,
    pub unit: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub diff: Decimal,
    pub rank: usize,
    #[serde(with = "rust_decimal::serde::str")]
    pub percentile: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub top_percent: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub user_hash: Option<String>,
    /// Kept as text so a malformed limit falls back to the default.
    pub limit: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HistoryItem {
    pub id: u64,
    #[serde(with = "rust_decimal::serde::str")]
    pub value: Decimal,
    pub created_at: String,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub user_metric: String,
    pub user_hash: String,
    pub limit: usize,
    pub items: Vec<HistoryItem>,
}

/// Append one value.
///
/// `POST /api/u/{slug}/submit/`
pub async fn submit_user_value(
    State(state): State<SharedState>,
    Path(slug): Path<String>,
    body: Result<Json<SubmitRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<serde_json::Value>)> {
    let metric = state.user_metrics.get_by_slug(&slug)?;
    let Json(req) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let (user_hash, raw) = match (req.user_hash, req.value) {
        (Some(h), Some(v)) if !h.is_empty() && !v.is_null() => (h, v),
        _ => return Err(ApiError::BadRequest("user_hash and value required".into())),
    };
    let value = parse_json_decimal(&raw).map_err(|e| ApiError::BadRequest(format!("value {e}")))?;

    let row = state.user_values.append(metric.id, &user_hash, value)?;
    debug!(user_metric = %metric.slug, id = row.id, "user value submitted");

    Ok((StatusCode::CREATED, Json(json!({ "detail": "ok" }))))
}

/// Score `x` against all submissions.
///
/// `GET /api/u/{slug}/hensachi/{x}/`
pub async fn user_metric_hensachi(
    State(state): State<SharedState>,
    Path((slug, x)): Path<(String, String)>,
) -> ApiResult<Json<UserHensachiResponse>> {
    let metric = state.user_metrics.get_by_slug(&slug)?;
    let values = state.user_values.values(metric.id)?;
    if values.is_empty() {
        return Err(ApiError::BadRequest("no data yet".into()));
    }
    let x = parse_decimal(&x).map_err(|_| ApiError::BadRequest("x must be number".into()))?;

    let standing = position_of(x, &values).map_err(|e| match e {
        RankerError::InvalidArgument(_) => ApiError::BadRequest("x must be number".into()),
        other => other.into(),
    })?;

    Ok(Json(UserHensachiResponse {
        user_metric: metric.slug,
        x,
        hensachi: standing.score.hensachi_score,
        mean: standing.score.mean,
        std: standing.score.std,
        count: standing.count,
        unit: metric.unit,
        diff: standing.diff,
        rank: standing.rank,
        percentile: standing.percentile,
        top_percent: standing.top_percent,
    }))
}

/// One user's submissions, newest first.
///
/// `GET /api/u/{slug}/history/?user_hash=...&limit=10`
pub async fn user_metric_history(
    State(state): State<SharedState>,
    Path(slug): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> ApiResult<Json<HistoryResponse>> {
    let metric = state.user_metrics.get_by_slug(&slug)?;
    let user_hash = match query.user_hash {
        Some(h) if !h.is_empty() => h,
        _ => return Err(ApiError::BadRequest("user_hash required".into())),
    };
    let limit = parse_limit(query.limit.as_deref());

    let items = state
        .user_values
        .history(metric.id, &user_hash, limit)?
        .into_iter()
        .map(|row| HistoryItem {
            id: row.id,
            value: row.value,
            created_at: row.created_at.to_rfc3339(),
        })
        .collect();

    Ok(Json(HistoryResponse { user_metric: metric.slug, user_hash, limit, items }))
}

/// `limit` query value clamped to 1..=100; blank or malformed means 10.
fn parse_limit(raw: Option<&str>) -> usize {
    let limit = raw
        .filter(|s| !s.is_empty())
        .and_then(|s| s.trim().parse::<i64>().ok())
        .unwrap_or(DEFAULT_HISTORY_LIMIT);
    limit.clamp(1, hensachi_db::user_values::HISTORY_MAX_LIMIT as i64) as usize
}
