//! Scoring errors and their mapping onto HTTP errors.

use hensachi_common::ApiError;
use serde_json::{json, Map};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RankerError>;

#[derive(Debug, Error, PartialEq)]
pub enum RankerError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Zero observations: mean and standard deviation are undefined.
    #[error("no data")]
    NoData,

    #[error("unknown rank_code")]
    UnknownRankCode { rank_code: String, allowed: Vec<String> },
}

/// Example codes shown to clients that sent an unknown rank code.
pub const RANK_CODE_HINT: &str = "examples: gold-2, platinum-4, diamond-1, master, predator";

impl From<RankerError> for ApiError {
    fn from(err: RankerError) -> Self {
        match err {
            RankerError::InvalidArgument(msg) => ApiError::BadRequest(msg),
            RankerError::NoData => ApiError::BadRequest("no data".into()),
            RankerError::UnknownRankCode { rank_code, allowed } => {
                let mut extra = Map::new();
                extra.insert("hint".into(), json!(RANK_CODE_HINT));
                extra.insert("rank_code".into(), json!(rank_code));
                extra.insert("allowed".into(), json!(allowed));
                ApiError::BadRequestWith { detail: "unknown rank_code".into(), extra }
            }
        }
    }
}
