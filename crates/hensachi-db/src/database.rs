//! Database handle and table storage.
//!
//! Provides the shared lock and id sequences the repositories build on.

use crate::error::{DbError, Result};
use hensachi_common::{Dataset, Item, Metric, UserMetric, UserValue, Value};
use serde::Serialize;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// All tables, in insertion order.
#[derive(Debug, Default)]
pub(crate) struct Tables {
    pub datasets: Vec<Dataset>,
    pub metrics: Vec<Metric>,
    pub items: Vec<Item>,
    pub values: Vec<Value>,
    pub user_metrics: Vec<UserMetric>,
    pub user_values: Vec<UserValue>,
    pub seq: Sequences,
}

/// Per-table id sequences. Ids start at 1 and are never reused.
#[derive(Debug, Default)]
pub(crate) struct Sequences {
    pub dataset: u64,
    pub metric: u64,
    pub item: u64,
    pub value: u64,
    pub user_metric: u64,
    pub user_value: u64,
}

pub(crate) fn next_id(counter: &mut u64) -> u64 {
    *counter += 1;
    *counter
}

/// Main database handle.
#[derive(Debug, Default)]
pub struct Database {
    tables: RwLock<Tables>,
}

/// Row counts per table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatabaseStats {
    pub datasets: usize,
    pub metrics: usize,
    pub items: usize,
    pub values: usize,
    pub user_metrics: usize,
    pub user_values: usize,
}

impl Database {
    /// Create an empty database.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn read(&self) -> Result<RwLockReadGuard<'_, Tables>> {
        self.tables.read().map_err(|_| DbError::LockPoisoned)
    }

    pub(crate) fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>> {
        self.tables.write().map_err(|_| DbError::LockPoisoned)
    }

    /// Get row counts for every table.
    pub fn stats(&self) -> Result<DatabaseStats> {
        let t = self.read()?;
        Ok(DatabaseStats {
            datasets: t.datasets.len(),
            metrics: t.metrics.len(),
            items: t.items.len(),
            values: t.values.len(),
            user_metrics: t.user_metrics.len(),
            user_values: t.user_values.len(),
        })
    }
}
