//! Handlers for collections: listing, the paged membership read, and
//! the two add paths (synchronous and bulk).
//!
//! The synchronous path is meant for small id sets and performs the
//! membership mutation inline with the same dedup semantics as the
//! executor, just without a job record. The bulk path validates the
//! target, launches a job, and returns before any membership work
//! happens — response time does not scale with the id count.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use compass_core::bulk::distinct_ids;
use compass_core::error::CoreError;
use compass_core::types::{CollectionId, DbId, JobId};
use compass_db::models::collection::MemberListParams;
use compass_db::models::company::Company;
use compass_db::repositories::CollectionRepo;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::engine::{JobStatus, NewJob};
use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Listing and membership read
// ---------------------------------------------------------------------------

/// One page of a collection's members.
#[derive(Debug, Serialize)]
pub struct CollectionPage {
    pub id: CollectionId,
    pub collection_name: String,
    pub companies: Vec<Company>,
    pub total: i64,
}

/// GET /api/v1/collections
///
/// List all collections (metadata only).
pub async fn list_collections(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let collections = CollectionRepo::list_all(&state.pool).await?;

    Ok(Json(DataResponse { data: collections }))
}

/// GET /api/v1/collections/{id}
///
/// Paged membership read. Callers use this to resolve "select all" /
/// "select N" into a concrete id list before launching a bulk add.
pub async fn get_collection(
    State(state): State<AppState>,
    Path(collection_id): Path<CollectionId>,
    Query(params): Query<MemberListParams>,
) -> AppResult<impl IntoResponse> {
    let collection = CollectionRepo::find_by_id(&state.pool, collection_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Collection",
            id: collection_id.to_string(),
        }))?;

    let total = CollectionRepo::member_count(&state.pool, collection_id).await?;
    let companies =
        CollectionRepo::list_members(&state.pool, collection_id, params.offset, params.limit)
            .await?;

    Ok(Json(DataResponse {
        data: CollectionPage {
            id: collection.id,
            collection_name: collection.collection_name,
            companies,
            total,
        },
    }))
}

// ---------------------------------------------------------------------------
// Synchronous add
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct AddCompaniesRequest {
    pub company_ids: Vec<DbId>,
}

#[derive(Debug, Serialize)]
pub struct AddCompaniesResponse {
    pub companies_added: u64,
}

/// POST /api/v1/collections/{id}/companies
///
/// Add a small set of companies inline. Ids already present (or
/// repeated within the request) are skipped.
pub async fn add_companies(
    State(state): State<AppState>,
    Path(collection_id): Path<CollectionId>,
    Json(input): Json<AddCompaniesRequest>,
) -> AppResult<impl IntoResponse> {
    ensure_collection_exists(&state, collection_id).await?;

    let unique = distinct_ids(&input.company_ids);
    let companies_added = state
        .engine
        .store()
        .add_members(collection_id, &unique)
        .await?;

    tracing::info!(
        collection_id = %collection_id,
        requested = input.company_ids.len(),
        added = companies_added,
        "Companies added to collection",
    );

    Ok(Json(DataResponse {
        data: AddCompaniesResponse { companies_added },
    }))
}

// ---------------------------------------------------------------------------
// Bulk add (job launch)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct LaunchBulkAddRequest {
    pub company_ids: Vec<DbId>,
    /// Optional address to notify when the job completes.
    #[validate(email)]
    pub email: Option<String>,
    /// Collection the companies are being moved from, for display in
    /// the active-jobs directory. Never mutated.
    pub source_collection_id: Option<CollectionId>,
}

#[derive(Debug, Serialize)]
pub struct LaunchBulkAddResponse {
    pub job_id: JobId,
    pub status: JobStatus,
}

/// POST /api/v1/collections/{id}/companies/bulk
///
/// Launch a background bulk add and return its job id immediately.
/// Fails with 404 (and creates no job) when the target collection does
/// not exist.
pub async fn launch_bulk_add(
    State(state): State<AppState>,
    Path(collection_id): Path<CollectionId>,
    Json(input): Json<LaunchBulkAddRequest>,
) -> AppResult<impl IntoResponse> {
    input
        .validate()
        .map_err(|e| CoreError::Validation(e.to_string()))?;

    let target = CollectionRepo::find_by_id(&state.pool, collection_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Collection",
            id: collection_id.to_string(),
        }))?;

    // Source is display-only; an unknown source simply has no name.
    let source_collection_name = match input.source_collection_id {
        Some(source_id) => CollectionRepo::find_by_id(&state.pool, source_id)
            .await?
            .map(|c| c.collection_name),
        None => None,
    };

    let record = state
        .engine
        .launch(NewJob {
            source_collection_id: input.source_collection_id,
            source_collection_name,
            target_collection_id: target.id,
            target_collection_name: target.collection_name,
            requested_ids: input.company_ids,
            notify_email: input.email,
        })
        .await;

    tracing::info!(
        job_id = %record.job_id,
        collection_id = %record.target_collection_id,
        total = record.total,
        "Bulk add job launched",
    );

    Ok(Json(DataResponse {
        data: LaunchBulkAddResponse {
            job_id: record.job_id,
            status: record.status,
        },
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// 404 unless the collection exists.
async fn ensure_collection_exists(
    state: &AppState,
    collection_id: CollectionId,
) -> AppResult<()> {
    CollectionRepo::find_by_id(&state.pool, collection_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Collection",
            id: collection_id.to_string(),
        }))?;
    Ok(())
}
