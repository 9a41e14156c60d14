//! User metric and user value repositories.
//!
//! User values are anonymous, append-only submissions: every submit adds a
//! row, nothing is deduplicated, and history reads newest first.

use crate::database::{next_id, Database};
use crate::error::{DbError, Result};
use chrono::Utc;
use hensachi_common::decimal::check_column;
use hensachi_common::entities::USER_HASH_MAX_LEN;
use hensachi_common::{Privacy, UserMetric, UserValue};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::debug;

/// Largest page a history query may request.
pub const HISTORY_MAX_LIMIT: usize = 100;

/// Repository for user metric definitions.
#[derive(Clone)]
pub struct UserMetricRepository {
    db: Arc<Database>,
}

impl UserMetricRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub fn find_by_slug(&self, slug: &str) -> Result<Option<UserMetric>> {
        let t = self.db.read()?;
        Ok(t.user_metrics.iter().find(|m| m.slug == slug).cloned())
    }

    /// Find a user metric by slug, or fail with `NotFound`.
    pub fn get_by_slug(&self, slug: &str) -> Result<UserMetric> {
        self.find_by_slug(slug)?
            .ok_or_else(|| DbError::NotFound(format!("user metric {slug}")))
    }

    pub fn get_or_create(
        &self,
        slug: &str,
        name: &str,
        unit: &str,
        description: &str,
        privacy: Privacy,
    ) -> Result<UserMetric> {
        let mut t = self.db.write()?;
        if let Some(existing) = t.user_metrics.iter().find(|m| m.slug == slug) {
            return Ok(existing.clone());
        }
        let metric = UserMetric {
            id: next_id(&mut t.seq.user_metric),
            slug: slug.to_string(),
            name: name.to_string(),
            unit: unit.to_string(),
            description: description.to_string(),
            privacy,
        };
        debug!(slug = %metric.slug, id = metric.id, "user metric created");
        t.user_metrics.push(metric.clone());
        Ok(metric)
    }
}

/// Repository for submitted user values.
#[derive(Clone)]
pub struct UserValueRepository {
    db: Arc<Database>,
}

impl UserValueRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Append a submission. Never replaces earlier rows.
    pub fn append(&self, user_metric_id: u64, user_hash: &str, value: Decimal) -> Result<UserValue> {
        if user_hash.is_empty() {
            return Err(DbError::InvalidValue("user_hash must not be empty".into()));
        }
        if user_hash.chars().count() > USER_HASH_MAX_LEN {
            return Err(DbError::InvalidValue(format!(
                "user_hash must be at most {USER_HASH_MAX_LEN} characters"
            )));
        }
        let value = check_column(value)?;

        let mut t = self.db.write()?;
        if !t.user_metrics.iter().any(|m| m.id == user_metric_id) {
            return Err(DbError::NotFound(format!("user metric id {user_metric_id}")));
        }
        let row = UserValue {
            id: next_id(&mut t.seq.user_value),
            user_metric_id,
            user_hash: user_hash.to_string(),
            value,
            created_at: Utc::now(),
        };
        debug!(user_metric_id, id = row.id, "user value appended");
        t.user_values.push(row.clone());
        Ok(row)
    }

    /// Every submitted value of a user metric, in submission order.
    pub fn values(&self, user_metric_id: u64) -> Result<Vec<Decimal>> {
        let t = self.db.read()?;
        Ok(t.user_values
            .iter()
            .filter(|v| v.user_metric_id == user_metric_id)
            .map(|v| v.value)
            .collect())
    }

    /// One user's submissions, newest first, at most `limit` rows.
    /// `limit` is clamped to `1..=HISTORY_MAX_LIMIT`.
    pub fn history(&self, user_metric_id: u64, user_hash: &str, limit: usize) -> Result<Vec<UserValue>> {
        let limit = limit.clamp(1, HISTORY_MAX_LIMIT);
        let t = self.db.read()?;
        let mut rows: Vec<UserValue> = t
            .user_values
            .iter()
            .filter(|v| v.user_metric_id == user_metric_id && v.user_hash == user_hash)
            .cloned()
            .collect();
        // ids break ties between submissions sharing a timestamp
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        rows.truncate(limit);
        Ok(rows)
    }
}
