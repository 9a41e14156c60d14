//! HTTP-facing error type.
//!
//! Every error body has the shape `{"detail": "...", ...extra}`; the extra
//! fields let a handler echo back context such as the list of valid keys.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    /// A 400 carrying extra context fields next to `detail`.
    #[error("{detail}")]
    BadRequestWith { detail: String, extra: Map<String, Value> },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) | ApiError::BadRequestWith { .. } => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Render the uniform `{detail, ...extra}` body.
    pub fn body(&self) -> Value {
        let mut body = Map::new();
        match self {
            ApiError::BadRequestWith { detail, extra } => {
                body.insert("detail".into(), Value::String(detail.clone()));
                for (k, v) in extra {
                    body.insert(k.clone(), v.clone());
                }
            }
            // internals are logged, not leaked
            ApiError::Internal(_) => {
                body.insert("detail".into(), Value::String("internal error".into()));
            }
            other => {
                body.insert("detail".into(), Value::String(other.to_string()));
            }
        }
        Value::Object(body)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(msg) = &self {
            tracing::error!(error = %msg, "request failed");
        }
        (self.status(), Json(self.body())).into_response()
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
