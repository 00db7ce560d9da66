//! Error type returned by every handler, rendered as `{"error": "..."}`.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use db::DbError;
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Job not found")]
    NotFound,

    #[error("{0}")]
    InvalidInput(String),

    /// Any failure coming out of the storage layer. The message is passed
    /// through to the client.
    #[error("{0}")]
    Storage(DbError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

fn log_error(error: &ApiError) {
    match error {
        ApiError::NotFound => warn!("Job not found"),
        ApiError::InvalidInput(message) => warn!("Rejected request: {}", message),
        ApiError::Storage(e) => error!("Storage failure: {}", e),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        log_error(&self);

        let body = Json(json!({ "error": self.to_string() }));
        (self.status(), body).into_response()
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound => Self::NotFound,
            DbError::InvalidInput(message) => Self::InvalidInput(message),
            other => Self::Storage(other),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidInput(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::InvalidInput(rejection.body_text())
    }
}

/// An id segment that is not an integer cannot name a job.
impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        warn!("Unparseable job id: {}", rejection.body_text());
        Self::NotFound
    }
}
