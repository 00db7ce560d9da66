use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use db::models::{BulkDeleteResult, InsertedJob, Job, JobFilter, JobUpdate, NewJob};
use db::repository::jobs as job_repo;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::AppState;
use crate::error::ApiError;

#[derive(Debug, Serialize, Deserialize)]
pub struct BulkCreateResponse {
    pub success: bool,
    pub message: String,
    pub jobs: Vec<InsertedJob>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BulkDeleteResponse {
    pub success: bool,
    #[serde(flatten)]
    pub result: BulkDeleteResult,
}

/// Bulk delete accepts a bare array of ids or `{"ids": [...]}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BulkDeleteRequest {
    Ids(Vec<Value>),
    Wrapped { ids: Vec<Value> },
}

pub async fn list(
    State(state): State<AppState>,
    filter: Result<Query<JobFilter>, QueryRejection>,
) -> Result<Json<Vec<Job>>, ApiError> {
    let Query(filter) = filter?;
    let jobs = job_repo::list_jobs(&state.pool, &filter).await?;
    Ok(Json(jobs))
}

pub async fn get(
    id: Result<Path<i64>, PathRejection>,
    State(state): State<AppState>,
) -> Result<Json<Job>, ApiError> {
    let Path(id) = id?;
    let job = job_repo::get_job(&state.pool, id).await?;
    Ok(Json(job))
}

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<NewJob>, JsonRejection>,
) -> Result<(StatusCode, Json<Job>), ApiError> {
    let Json(payload) = payload?;
    let job = job_repo::create_job(&state.pool, &payload).await?;
    Ok((StatusCode::CREATED, Json(job)))
}

pub async fn update(
    id: Result<Path<i64>, PathRejection>,
    State(state): State<AppState>,
    payload: Result<Json<JobUpdate>, JsonRejection>,
) -> Result<Json<Job>, ApiError> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    let job = job_repo::update_job(&state.pool, id, &payload).await?;
    Ok(Json(job))
}

pub async fn delete(
    id: Result<Path<i64>, PathRejection>,
    State(state): State<AppState>,
) -> Result<Json<Value>, ApiError> {
    let Path(id) = id?;
    job_repo::delete_job(&state.pool, id).await?;
    Ok(Json(json!({ "success": true })))
}

pub async fn bulk_create(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<BulkCreateResponse>, ApiError> {
    let Json(payload) = payload?;
    if !payload.is_array() {
        return Err(ApiError::InvalidInput("Expected an array of jobs".into()));
    }

    let jobs: Vec<NewJob> = serde_json::from_value(payload)
        .map_err(|e| ApiError::InvalidInput(format!("Invalid job: {e}")))?;

    let inserted = job_repo::create_jobs(&state.pool, &jobs).await?;

    Ok(Json(BulkCreateResponse {
        success: true,
        message: format!("Added {} jobs", inserted.len()),
        jobs: inserted,
    }))
}

pub async fn bulk_delete(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<BulkDeleteResponse>, ApiError> {
    let Json(payload) = payload?;
    let raw_ids = match serde_json::from_value::<BulkDeleteRequest>(payload) {
        Ok(BulkDeleteRequest::Ids(ids)) | Ok(BulkDeleteRequest::Wrapped { ids }) if !ids.is_empty() => ids,
        _ => {
            return Err(ApiError::InvalidInput(
                "Expected a non-empty array of ids".into(),
            ))
        }
    };

    let ids: Vec<i64> = raw_ids.iter().filter_map(parse_id).collect();
    let result = job_repo::delete_jobs(&state.pool, &ids).await?;

    Ok(Json(BulkDeleteResponse {
        success: true,
        result,
    }))
}

/// Integers, integral floats and numeric strings are ids; anything else is
/// dropped. Sign is checked by the repository.
fn parse_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
