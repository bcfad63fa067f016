//! Read-only handlers over the job registry: single-job status and the
//! active-jobs directory.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use compass_core::error::CoreError;
use compass_core::types::{CollectionId, JobId};
use serde::Serialize;

use crate::engine::{JobRecord, JobStatus};
use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Snapshot of a job's progress, as returned to pollers.
#[derive(Debug, Serialize)]
pub struct JobStatusResponse {
    pub job_id: JobId,
    pub status: JobStatus,
    pub progress: u8,
    pub current: u64,
    pub total: u64,
    pub added: u64,
    pub skipped_duplicates: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&JobRecord> for JobStatusResponse {
    fn from(record: &JobRecord) -> Self {
        Self {
            job_id: record.job_id,
            status: record.status,
            progress: record.progress,
            current: record.current,
            total: record.total,
            added: record.added,
            skipped_duplicates: record.skipped_duplicates,
            error: record.error.clone(),
        }
    }
}

/// A directory entry: job progress plus the collection context a client
/// needs to render an "A → B" label without a second round trip.
#[derive(Debug, Serialize)]
pub struct ActiveJobItem {
    pub job_id: JobId,
    pub status: JobStatus,
    pub progress: u8,
    pub current: u64,
    pub total: u64,
    pub added: u64,
    pub skipped_duplicates: u64,
    pub source_collection_id: Option<CollectionId>,
    pub source_collection_name: Option<String>,
    pub target_collection_id: CollectionId,
    pub target_collection_name: String,
}

impl From<&JobRecord> for ActiveJobItem {
    fn from(record: &JobRecord) -> Self {
        Self {
            job_id: record.job_id,
            status: record.status,
            progress: record.progress,
            current: record.current,
            total: record.total,
            added: record.added,
            skipped_duplicates: record.skipped_duplicates,
            source_collection_id: record.source_collection_id,
            source_collection_name: record.source_collection_name.clone(),
            target_collection_id: record.target_collection_id,
            target_collection_name: record.target_collection_name.clone(),
        }
    }
}

/// GET /api/v1/collections/jobs/{job_id}/status
///
/// Consistent snapshot of one job. 404 for an unknown id (never seen,
/// or lost to a restart).
pub async fn job_status(
    State(state): State<AppState>,
    Path(job_id): Path<JobId>,
) -> AppResult<impl IntoResponse> {
    let record = state
        .engine
        .registry()
        .get(job_id)
        .await
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Job",
            id: job_id.to_string(),
        }))?;

    Ok(Json(DataResponse {
        data: JobStatusResponse::from(&record),
    }))
}

/// GET /api/v1/collections/jobs/active
///
/// All currently-running jobs, stably ordered, so a client can
/// reconstruct in-flight work after a reload.
pub async fn active_jobs(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let records = state.engine.registry().list_active().await;
    let items: Vec<ActiveJobItem> = records.iter().map(ActiveJobItem::from).collect();

    Ok(Json(DataResponse { data: items }))
}
