//! Dataset repository.
//!
//! Datasets own their metrics and items; both are keyed by a slug that is
//! unique within the dataset.

use crate::database::{next_id, Database};
use crate::error::{DbError, Result};
use hensachi_common::entities::empty_meta;
use hensachi_common::{Dataset, Item, Metric, ValueType};
use std::sync::Arc;
use tracing::debug;

/// Fields for creating a metric.
#[derive(Debug, Clone)]
pub struct NewMetric {
    pub key: String,
    pub name: String,
    pub unit: String,
    pub value_type: ValueType,
    pub higher_is_better: bool,
}

impl NewMetric {
    pub fn new(key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            unit: String::new(),
            value_type: ValueType::Float,
            higher_is_better: true,
        }
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }
}

/// Repository for datasets, their metrics and their items.
#[derive(Clone)]
pub struct DatasetRepository {
    db: Arc<Database>,
}

impl DatasetRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// All datasets ordered by id.
    pub fn list(&self) -> Result<Vec<Dataset>> {
        let t = self.db.read()?;
        let mut out = t.datasets.clone();
        out.sort_by_key(|d| d.id);
        Ok(out)
    }

    /// Find a dataset by slug.
    pub fn find_by_slug(&self, slug: &str) -> Result<Option<Dataset>> {
        let t = self.db.read()?;
        Ok(t.datasets.iter().find(|d| d.slug == slug).cloned())
    }

    /// Find a dataset by slug, or fail with `NotFound`.
    pub fn get_by_slug(&self, slug: &str) -> Result<Dataset> {
        self.find_by_slug(slug)?
            .ok_or_else(|| DbError::NotFound(format!("dataset {slug}")))
    }

    /// Return the dataset with `slug`, creating it if missing. An existing
    /// dataset keeps its name and description.
    pub fn get_or_create(&self, slug: &str, name: &str, description: &str) -> Result<Dataset> {
        let mut t = self.db.write()?;
        if let Some(existing) = t.datasets.iter().find(|d| d.slug == slug) {
            return Ok(existing.clone());
        }
        let dataset = Dataset {
            id: next_id(&mut t.seq.dataset),
            slug: slug.to_string(),
            name: name.to_string(),
            description: description.to_string(),
        };
        debug!(slug = %dataset.slug, id = dataset.id, "dataset created");
        t.datasets.push(dataset.clone());
        Ok(dataset)
    }

    // ── Metrics ────────────────────────────────────────────────────────────

    /// Metrics of a dataset ordered by key.
    pub fn list_metrics(&self, dataset_id: u64) -> Result<Vec<Metric>> {
        let t = self.db.read()?;
        let mut out: Vec<Metric> = t
            .metrics
            .iter()
            .filter(|m| m.dataset_id == dataset_id)
            .cloned()
            .collect();
        out.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(out)
    }

    /// Find a metric by key within a dataset.
    pub fn find_metric(&self, dataset_id: u64, key: &str) -> Result<Option<Metric>> {
        let t = self.db.read()?;
        Ok(t.metrics
            .iter()
            .find(|m| m.dataset_id == dataset_id && m.key == key)
            .cloned())
    }

    /// Resolve `(dataset slug, metric key)` to both rows, or `NotFound`.
    pub fn resolve_metric(&self, dataset_slug: &str, metric_key: &str) -> Result<(Dataset, Metric)> {
        let dataset = self.get_by_slug(dataset_slug)?;
        let metric = self
            .find_metric(dataset.id, metric_key)?
            .ok_or_else(|| DbError::NotFound(format!("metric {dataset_slug}:{metric_key}")))?;
        Ok((dataset, metric))
    }

    /// Return the metric with `spec.key` in the dataset, creating it if missing.
    pub fn get_or_create_metric(&self, dataset_id: u64, spec: NewMetric) -> Result<Metric> {
        let mut t = self.db.write()?;
        if !t.datasets.iter().any(|d| d.id == dataset_id) {
            return Err(DbError::NotFound(format!("dataset id {dataset_id}")));
        }
        if let Some(existing) = t
            .metrics
            .iter()
            .find(|m| m.dataset_id == dataset_id && m.key == spec.key)
        {
            return Ok(existing.clone());
        }
        let metric = Metric {
            id: next_id(&mut t.seq.metric),
            dataset_id,
            key: spec.key,
            name: spec.name,
            unit: spec.unit,
            value_type: spec.value_type,
            higher_is_better: spec.higher_is_better,
        };
        debug!(key = %metric.key, id = metric.id, "metric created");
        t.metrics.push(metric.clone());
        Ok(metric)
    }

    // ── Items ──────────────────────────────────────────────────────────────

    /// Create or update an item by key. An existing item takes the new name;
    /// `meta` keys are merged into the existing object when given.
    pub fn upsert_item(
        &self,
        dataset_id: u64,
        key: &str,
        name: &str,
        meta: Option<serde_json::Map<String, serde_json::Value>>,
    ) -> Result<Item> {
        let mut t = self.db.write()?;
        if !t.datasets.iter().any(|d| d.id == dataset_id) {
            return Err(DbError::NotFound(format!("dataset id {dataset_id}")));
        }

        if let Some(existing) = t
            .items
            .iter_mut()
            .find(|i| i.dataset_id == dataset_id && i.key == key)
        {
            existing.name = name.to_string();
            if let Some(extra) = meta {
                if !existing.meta.is_object() {
                    existing.meta = empty_meta();
                }
                if let Some(obj) = existing.meta.as_object_mut() {
                    obj.extend(extra);
                }
            }
            return Ok(existing.clone());
        }

        let item = Item {
            id: next_id(&mut t.seq.item),
            dataset_id,
            key: key.to_string(),
            name: name.to_string(),
            meta: meta.map(serde_json::Value::Object).unwrap_or_else(empty_meta),
        };
        t.items.push(item.clone());
        Ok(item)
    }
}
