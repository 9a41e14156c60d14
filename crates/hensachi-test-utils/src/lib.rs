//! Shared fixtures for hensachi tests.

use hensachi_common::Privacy;
use hensachi_db::{
    Database, DatasetRepository, NewMetric, SeedFile, UserMetricRepository, ValueRepository,
};
use rust_decimal::Decimal;
use std::sync::Arc;

/// Dataset slug used by [`sample_database`].
pub const MOUNTAINS: &str = "japan-mountains";
/// Metric key used by [`sample_database`].
pub const HEIGHT: &str = "height_m";
/// User metric slug created by [`sample_database`], with no submissions.
pub const PUSHUPS: &str = "pushups";

/// A small, fully populated seed.
pub fn sample_seed() -> SeedFile {
    let raw = serde_json::json!({
        "datasets": [{
            "slug": MOUNTAINS,
            "name": "Mountains of Japan",
            "description": "Highest peaks",
            "metrics": [
                {"key": HEIGHT, "name": "Height", "unit": "m"},
                {"key": "prominence_m", "name": "Prominence", "unit": "m"}
            ],
            "items": [
                {"key": "fuji", "name": "Mt. Fuji", "meta": {"pref": "Shizuoka"}, "values": {"height_m": "3776"}},
                {"key": "kita", "name": "Mt. Kita", "values": {"height_m": "3193"}},
                {"key": "okuhotaka", "name": "Mt. Oku-Hotaka", "values": {"height_m": "3190"}}
            ]
        }],
        "user_metrics": [{"slug": PUSHUPS, "name": "Push-ups", "unit": "reps"}]
    });
    // the literal above always matches the seed schema
    SeedFile::from_json_str(&raw.to_string()).expect("sample seed is valid")
}

/// A database loaded with [`sample_seed`]. `prominence_m` has no values.
pub fn sample_database() -> Arc<Database> {
    let db = Arc::new(Database::new());
    sample_seed().apply(&db).expect("sample seed applies cleanly");
    db
}

/// A database with one dataset `ds`, one metric `m`, and one item per value.
pub fn database_with_values(values: &[(&str, Decimal)]) -> Arc<Database> {
    let db = Arc::new(Database::new());
    let datasets = DatasetRepository::new(db.clone());
    let repo = ValueRepository::new(db.clone());
    let ds = datasets.get_or_create("ds", "DS", "").expect("create dataset");
    let metric = datasets
        .get_or_create_metric(ds.id, NewMetric::new("m", "M"))
        .expect("create metric");
    for (key, v) in values {
        let item = datasets.upsert_item(ds.id, key, key, None).expect("create item");
        repo.upsert(item.id, metric.id, *v, "fixture").expect("upsert value");
    }
    UserMetricRepository::new(db.clone())
        .get_or_create(PUSHUPS, "Push-ups", "reps", "", Privacy::Public)
        .expect("create user metric");
    db
}
