//! Error types for the ledger service.
//!
//! - [`StorageError`] - failures coming out of a [`crate::services::db_operations::LedgerStore`]
//! - [`ConfigError`] - missing or malformed environment settings
//! - [`ApiError`] - everything a handler can fail with
//!
//! Every [`ApiError`] is rendered as a 400 with a flat `{"error": "..."}` body.

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    /// Requested row does not exist.
    #[error("{entity} with {key} `{value}` was not found")]
    NotFound {
        entity: &'static str,
        key: &'static str,
        value: i64,
    },

    /// SQL statement or transaction failed.
    #[error("query failed: {0}")]
    Query(#[from] sqlx::Error),
}

impl StorageError {
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        Self::NotFound { entity, key: "id", value: id }
    }

    pub fn not_found_by(entity: &'static str, key: &'static str, value: i64) -> Self {
        Self::NotFound { entity, key, value }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable `{0}` must be set")]
    Missing(&'static str),

    #[error("environment variable `{name}` has an invalid value `{value}`")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("method `{0}` is not allowed")]
    MethodNotAllowed(Method),

    #[error(transparent)]
    Body(#[from] JsonRejection),

    #[error(transparent)]
    Path(#[from] PathRejection),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub type StorageResult<T> = Result<T, StorageError>;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::warn!("request failed: {}", self);
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorBody { error: self.body_text() }),
        )
            .into_response()
    }
}

impl ApiError {
    fn body_text(&self) -> String {
        match self {
            ApiError::Body(rejection) => rejection.body_text(),
            ApiError::Path(rejection) => rejection.body_text(),
            other => other.to_string(),
        }
    }
}
