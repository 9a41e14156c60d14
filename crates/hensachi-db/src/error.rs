//! Database error types.

use hensachi_common::{ApiError, DecimalError};
use hensachi_ranker::RankerError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DbError>;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Duplicate entry: {0}")]
    Duplicate(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Database lock poisoned")]
    LockPoisoned,

    #[error(transparent)]
    Ranker(#[from] RankerError),
}

impl From<DecimalError> for DbError {
    fn from(err: DecimalError) -> Self {
        DbError::InvalidValue(err.to_string())
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound(_) => ApiError::NotFound("not found".into()),
            DbError::InvalidValue(msg) | DbError::Duplicate(msg) => ApiError::BadRequest(msg),
            DbError::Ranker(e) => e.into(),
            other => ApiError::Internal(other.to_string()),
        }
    }
}
