use axum::{extract::State, http::StatusCode};
use tracing::debug;

use super::AppState;
use crate::error::ApiError;

/// Healthy when the database answers a trivial query.
pub async fn healthz(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    db::pool::ping(&state.pool).await?;
    debug!("service is healthy");
    Ok(StatusCode::OK)
}
