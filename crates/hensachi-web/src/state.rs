//! Shared application state for the web server.

use hensachi_db::{Database, DatasetRepository, UserMetricRepository, UserValueRepository, ValueRepository};
use std::sync::Arc;

/// Shared state injected into every Axum handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub datasets: DatasetRepository,
    pub values: ValueRepository,
    pub user_metrics: UserMetricRepository,
    pub user_values: UserValueRepository,
}

impl AppState {
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            datasets: DatasetRepository::new(db.clone()),
            values: ValueRepository::new(db.clone()),
            user_metrics: UserMetricRepository::new(db.clone()),
            user_values: UserValueRepository::new(db.clone()),
            db,
        }
    }
}

pub type SharedState = Arc<AppState>;
