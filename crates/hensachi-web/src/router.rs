//! Axum router: maps all URL paths to handlers.

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post, MethodRouter},
    Router,
};
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

use crate::config::CorsConfig;
use crate::handlers::{
    apex::apex_rank_hensachi,
    datasets::{list_dataset_metrics, list_datasets, metric_hensachi},
    system::health,
    user_metrics::{submit_user_value, user_metric_history, user_metric_hensachi},
};
use crate::state::{AppState, SharedState};

/// Build and return the full Axum router.
pub fn build_router(state: AppState, cors: &CorsConfig) -> Router {
    let shared: SharedState = Arc::new(state);

    let api = Router::new();
    let api = route_both(api, "/datasets", get(list_datasets));
    let api = route_both(api, "/datasets/{dataset_slug}/metrics", get(list_dataset_metrics));
    let api = route_both(
        api,
        "/datasets/{dataset_slug}/metrics/{metric_key}/hensachi",
        get(metric_hensachi),
    );
    let api = route_both(api, "/u/{slug}/submit", post(submit_user_value));
    let api = route_both(api, "/u/{slug}/hensachi/{x}", get(user_metric_hensachi));
    let api = route_both(api, "/u/{slug}/history", get(user_metric_history));
    let api = route_both(api, "/apex/rank/hensachi/{rank_code}", get(apex_rank_hensachi));

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        // Middleware
        .layer(cors_layer(cors))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(shared)
}

/// Register `path` with and without a trailing slash.
fn route_both(
    router: Router<SharedState>,
    path: &str,
    handler: MethodRouter<SharedState>,
) -> Router<SharedState> {
    router
        .route(path, handler.clone())
        .route(&format!("{path}/"), handler)
}

fn cors_layer(cors: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = cors
        .allowed_origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                warn!(origin = %o, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}
