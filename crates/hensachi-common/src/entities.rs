/// Core entity types for datasets, metrics and observations.
/// These are the Rust representations of the stored tables; the scoring core
/// only ever reads them.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Dataset
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub id: u64,
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

// ---------------------------------------------------------------------------
// Metric
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    Int,
    #[default]
    Float,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub id: u64,
    pub dataset_id: u64,
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub value_type: ValueType,
    /// Part of the metric's identity; scoring ignores it.
    #[serde(default = "default_true")]
    pub higher_is_better: bool,
}

fn default_true() -> bool { true }

// ---------------------------------------------------------------------------
// Item
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: u64,
    pub dataset_id: u64,
    pub key: String,
    pub name: String,
    #[serde(default = "empty_meta")]
    pub meta: serde_json::Value,
}

pub fn empty_meta() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

// ---------------------------------------------------------------------------
// Value: one per (item, metric)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Value {
    pub id: u64,
    pub item_id: u64,
    pub metric_id: u64,
    #[serde(with = "rust_decimal::serde::str")]
    pub value: Decimal,
    #[serde(default)]
    pub source: String,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// User metrics: anonymous, append-only submissions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Privacy {
    #[default]
    Public,
    Private,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserMetric {
    pub id: u64,
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub privacy: Privacy,
}

/// Longest accepted anonymous user id.
pub const USER_HASH_MAX_LEN: usize = 64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserValue {
    pub id: u64,
    pub user_metric_id: u64,
    pub user_hash: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub value: Decimal,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_value_serializes_decimal_as_string() {
        let v = Value {
            id: 1,
            item_id: 2,
            metric_id: 3,
            value: dec!(3776.000000),
            source: String::new(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json["value"], "3776.000000");
    }

    #[test]
    fn test_metric_defaults() {
        let m: Metric = serde_json::from_str(
            r#"{"id":1,"dataset_id":1,"key":"height_m","name":"Height"}"#,
        ).unwrap();
        assert_eq!(m.value_type, ValueType::Float);
        assert!(m.higher_is_better);
        assert_eq!(m.unit, "");
    }

    #[test]
    fn test_privacy_wire_names() {
        assert_eq!(serde_json::to_string(&Privacy::Private).unwrap(), "\"private\"");
        let p: Privacy = serde_json::from_str("\"public\"").unwrap();
        assert_eq!(p, Privacy::Public);
    }
}
