//! hensachi Database Layer
//!
//! An in-process store for datasets, metrics, items and their observations.
//! Tables live behind a single reader-writer lock: concurrent reads never
//! block each other, and each write holds the lock for one insert or upsert.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use hensachi_db::{Database, DatasetRepository, NewMetric, ValueRepository};
//! use rust_decimal::Decimal;
//!
//! let db = Arc::new(Database::new());
//! let datasets = DatasetRepository::new(db.clone());
//! let values = ValueRepository::new(db);
//!
//! let ds = datasets.get_or_create("japan-mountains", "Mountains of Japan", "").unwrap();
//! let metric = datasets
//!     .get_or_create_metric(ds.id, NewMetric::new("height_m", "Height").with_unit("m"))
//!     .unwrap();
//! let fuji = datasets.upsert_item(ds.id, "fuji", "Mt. Fuji", None).unwrap();
//! values.upsert(fuji.id, metric.id, Decimal::from(3776), "survey").unwrap();
//! ```

pub mod database;
pub mod datasets;
pub mod error;
pub mod seed;
pub mod user_values;
pub mod values;

pub use database::{Database, DatabaseStats};
pub use datasets::{DatasetRepository, NewMetric};
pub use error::{DbError, Result};
pub use seed::{load_seed, SeedFile, SeedReport};
pub use user_values::{UserMetricRepository, UserValueRepository};
pub use values::ValueRepository;
