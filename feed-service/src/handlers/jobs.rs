use super::{fetch_document, require_id};
use crate::dtos::JobResponse;
use crate::middleware::VerifiedUser;
use crate::services::JOBS;
use crate::startup::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use service_core::error::AppError;

const JOB_ID_REQUIRED: &str = "Job ID is required";

pub async fn get_job(
    State(state): State<AppState>,
    user: VerifiedUser,
    Path(job_id): Path<String>,
) -> Result<Json<JobResponse>, AppError> {
    let job_id = require_id(&job_id, JOB_ID_REQUIRED)?;

    tracing::info!(job_id = %job_id, user_id = %user.id(), "Fetching job");
    let job = fetch_document(state.store.as_ref(), JOBS, job_id).await?;

    Ok(Json(JobResponse::from(job)))
}

/// `GET /jobs/` with an empty id segment.
pub async fn missing_job_id(_user: VerifiedUser) -> AppError {
    AppError::BadRequest(anyhow::anyhow!(JOB_ID_REQUIRED))
}
