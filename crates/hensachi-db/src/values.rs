//! Value repository.
//!
//! Holds at most one value per (item, metric); writing again replaces it.

use crate::database::{next_id, Database};
use crate::error::{DbError, Result};
use chrono::Utc;
use hensachi_common::decimal::check_column;
use hensachi_common::{Item, Value};
use hensachi_ranker::{Observation, ObservationSource};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::debug;

/// Repository for item values.
#[derive(Clone)]
pub struct ValueRepository {
    db: Arc<Database>,
}

impl ValueRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Insert or replace the value for `(item_id, metric_id)`.
    pub fn upsert(&self, item_id: u64, metric_id: u64, value: Decimal, source: &str) -> Result<Value> {
        let value = check_column(value)?;
        let mut t = self.db.write()?;

        let item_dataset = t
            .items
            .iter()
            .find(|i| i.id == item_id)
            .map(|i| i.dataset_id)
            .ok_or_else(|| DbError::NotFound(format!("item id {item_id}")))?;
        let metric_dataset = t
            .metrics
            .iter()
            .find(|m| m.id == metric_id)
            .map(|m| m.dataset_id)
            .ok_or_else(|| DbError::NotFound(format!("metric id {metric_id}")))?;
        if item_dataset != metric_dataset {
            return Err(DbError::InvalidValue(format!(
                "item {item_id} and metric {metric_id} belong to different datasets"
            )));
        }

        let now = Utc::now();
        if let Some(existing) = t
            .values
            .iter_mut()
            .find(|v| v.item_id == item_id && v.metric_id == metric_id)
        {
            existing.value = value;
            existing.source = source.to_string();
            existing.updated_at = now;
            debug!(item_id, metric_id, value = %value, "value updated");
            return Ok(existing.clone());
        }

        let row = Value {
            id: next_id(&mut t.seq.value),
            item_id,
            metric_id,
            value,
            source: source.to_string(),
            updated_at: now,
        };
        debug!(item_id, metric_id, value = %value, "value inserted");
        t.values.push(row.clone());
        Ok(row)
    }

    /// Every value of a metric joined with its item, in storage order.
    pub fn for_metric(&self, metric_id: u64) -> Result<Vec<(Item, Value)>> {
        let t = self.db.read()?;
        let rows = t
            .values
            .iter()
            .filter(|v| v.metric_id == metric_id)
            .filter_map(|v| {
                t.items
                    .iter()
                    .find(|i| i.id == v.item_id)
                    .map(|i| (i.clone(), v.clone()))
            })
            .collect();
        Ok(rows)
    }
}

impl ObservationSource for ValueRepository {
    type Entity = Item;
    type Error = DbError;

    fn observations(&self, metric_id: u64) -> Result<Vec<Observation<Item>>> {
        Ok(self
            .for_metric(metric_id)?
            .into_iter()
            .map(|(item, v)| Observation::new(item, v.value))
            .collect())
    }
}
