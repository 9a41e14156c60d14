//! Liveness endpoint.

use axum::{extract::State, Json};
use hensachi_common::error::ApiResult;
use hensachi_db::DatabaseStats;
use serde::Serialize;

use crate::state::SharedState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub tables: DatabaseStats,
}

/// GET /health
pub async fn health(State(state): State<SharedState>) -> ApiResult<Json<HealthResponse>> {
    Ok(Json(HealthResponse { status: "ok", tables: state.db.stats()? }))
}
