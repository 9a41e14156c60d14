//! Dataset listings and per-metric leaderboards.

use axum::{
    extract::{Path, State},
    Json,
};
use hensachi_common::error::ApiResult;
use hensachi_common::{Dataset, Item};
use hensachi_ranker::leaderboard_for;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use crate::state::SharedState;

#[derive(Debug, Serialize)]
pub struct MetricSummary {
    pub key: String,
    pub name: String,
    pub unit: String,
}

#[derive(Debug, Serialize)]
pub struct ItemSummary {
    pub key: String,
    pub name: String,
    pub meta: serde_json::Value,
}

impl From<Item> for ItemSummary {
    fn from(item: Item) -> Self {
        Self { key: item.key, name: item.name, meta: item.meta }
    }
}

#[derive(Debug, Serialize)]
pub struct RankedItem {
    pub item: ItemSummary,
    #[serde(with = "rust_decimal::serde::str")]
    pub value: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub hensachi: Decimal,
}

#[derive(Debug, Serialize)]
pub struct MetricHensachiResponse {
    pub dataset: String,
    pub metric: String,
    pub unit: String,
    pub count: usize,
    #[serde(with = "rust_decimal::serde::str")]
    pub mean: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub std: Decimal,
    pub results: Vec<RankedItem>,
}

/// All datasets ordered by id.
///
/// `GET /api/datasets/`
pub async fn list_datasets(State(state): State<SharedState>) -> ApiResult<Json<Vec<Dataset>>> {
    Ok(Json(state.datasets.list()?))
}

/// Metrics ordered by key.
///
/// `GET /api/datasets/{dataset_slug}/metrics/`
pub async fn list_dataset_metrics(
    State(state): State<SharedState>,
    Path(dataset_slug): Path<String>,
) -> ApiResult<Json<Vec<MetricSummary>>> {
    let dataset = state.datasets.get_by_slug(&dataset_slug)?;
    let metrics = state
        .datasets
        .list_metrics(dataset.id)?
        .into_iter()
        .map(|m| MetricSummary { key: m.key, name: m.name, unit: m.unit })
        .collect();
    Ok(Json(metrics))
}

/// Every item of a metric, scored and sorted best-first.
///
/// `GET /api/datasets/{dataset_slug}/metrics/{metric_key}/hensachi/`
pub async fn metric_hensachi(
    State(state): State<SharedState>,
    Path((dataset_slug, metric_key)): Path<(String, String)>,
) -> ApiResult<Json<MetricHensachiResponse>> {
    let (dataset, metric) = state.datasets.resolve_metric(&dataset_slug, &metric_key)?;
    let board = leaderboard_for(&state.values, metric.id)?;

    debug!(dataset = %dataset.slug, metric = %metric.key, count = board.count, "metric hensachi");

    Ok(Json(MetricHensachiResponse {
        dataset: dataset.slug,
        metric: metric.key,
        unit: metric.unit,
        count: board.count,
        mean: board.mean,
        std: board.std,
        results: board
            .entries
            .into_iter()
            .map(|e| RankedItem { item: e.entity.into(), value: e.value, hensachi: e.score })
            .collect(),
    }))
}
