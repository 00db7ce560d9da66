use axum::{extract::State, Json};
use db::{models::JobStats, repository::stats as stats_repo};

use super::AppState;
use crate::error::ApiError;

pub async fn get(State(state): State<AppState>) -> Result<Json<JobStats>, ApiError> {
    let stats = stats_repo::job_stats(&state.pool).await?;
    Ok(Json(stats))
}
