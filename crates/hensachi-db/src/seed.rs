//! JSON seed files.
//!
//! A seed describes datasets (with their metrics, items and values) and user
//! metrics. Applying a seed is idempotent: datasets, metrics and items are
//! matched by key and values are upserted, so re-running it only refreshes.

use crate::database::Database;
use crate::datasets::{DatasetRepository, NewMetric};
use crate::error::{DbError, Result};
use crate::user_values::{UserMetricRepository, UserValueRepository};
use crate::values::ValueRepository;
use hensachi_common::{parse_json_decimal, Privacy, ValueType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedFile {
    #[serde(default)]
    pub datasets: Vec<SeedDataset>,
    #[serde(default)]
    pub user_metrics: Vec<SeedUserMetric>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedDataset {
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub metrics: Vec<SeedMetric>,
    #[serde(default)]
    pub items: Vec<SeedItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedMetric {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub value_type: ValueType,
    #[serde(default = "default_true")]
    pub higher_is_better: bool,
}

fn default_true() -> bool { true }

#[derive(Debug, Clone, Deserialize)]
pub struct SeedItem {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub meta: Option<serde_json::Map<String, serde_json::Value>>,
    /// Metric key → value (JSON number or decimal string).
    #[serde(default)]
    pub values: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub source: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedUserMetric {
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub privacy: Privacy,
    #[serde(default)]
    pub values: Vec<SeedUserValue>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedUserValue {
    pub user_hash: String,
    pub value: serde_json::Value,
}

/// What a seed run touched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub datasets: usize,
    pub metrics: usize,
    pub items: usize,
    pub values_upserted: usize,
    pub user_metrics: usize,
    pub user_values_appended: usize,
}

impl SeedFile {
    pub fn from_json_str(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Write the seed into `db`.
    pub fn apply(&self, db: &Arc<Database>) -> Result<SeedReport> {
        let datasets = DatasetRepository::new(db.clone());
        let values = ValueRepository::new(db.clone());
        let user_metrics = UserMetricRepository::new(db.clone());
        let user_values = UserValueRepository::new(db.clone());
        let mut report = SeedReport::default();

        for seed_ds in &self.datasets {
            let ds = datasets.get_or_create(&seed_ds.slug, &seed_ds.name, &seed_ds.description)?;
            report.datasets += 1;

            let mut metric_ids = BTreeMap::new();
            for m in &seed_ds.metrics {
                let spec = NewMetric {
                    key: m.key.clone(),
                    name: m.name.clone(),
                    unit: m.unit.clone(),
                    value_type: m.value_type,
                    higher_is_better: m.higher_is_better,
                };
                let metric = datasets.get_or_create_metric(ds.id, spec)?;
                metric_ids.insert(metric.key.clone(), metric.id);
                report.metrics += 1;
            }

            for seed_item in &seed_ds.items {
                let item = datasets.upsert_item(ds.id, &seed_item.key, &seed_item.name, seed_item.meta.clone())?;
                report.items += 1;

                for (metric_key, raw) in &seed_item.values {
                    let metric_id = match metric_ids.get(metric_key) {
                        Some(id) => *id,
                        None => datasets
                            .find_metric(ds.id, metric_key)?
                            .map(|m| m.id)
                            .ok_or_else(|| DbError::NotFound(format!("metric {}:{metric_key}", ds.slug)))?,
                    };
                    let value = parse_json_decimal(raw)?;
                    values.upsert(item.id, metric_id, value, &seed_item.source)?;
                    report.values_upserted += 1;
                }
            }
        }

        for seed_um in &self.user_metrics {
            let um = user_metrics.get_or_create(
                &seed_um.slug,
                &seed_um.name,
                &seed_um.unit,
                &seed_um.description,
                seed_um.privacy,
            )?;
            report.user_metrics += 1;
            for uv in &seed_um.values {
                let value = parse_json_decimal(&uv.value)?;
                user_values.append(um.id, &uv.user_hash, value)?;
                report.user_values_appended += 1;
            }
        }

        Ok(report)
    }
}

/// Read a JSON seed file and apply it.
pub fn load_seed(db: &Arc<Database>, path: impl AsRef<Path>) -> Result<SeedReport> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)?;
    let report = SeedFile::from_json_str(&raw)?.apply(db)?;
    info!(
        path = %path.display(),
        datasets = report.datasets,
        values = report.values_upserted,
        user_values = report.user_values_appended,
        "seed loaded"
    );
    Ok(report)
}
