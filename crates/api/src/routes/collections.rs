//! Routes for collections and their bulk jobs, mounted at `/collections`.
//!
//! The job routes live under the static `/jobs` prefix, which the
//! router matches ahead of the `/{id}` parameter.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{collections, jobs};
use crate::state::AppState;

/// ```text
/// GET  /                          -> list_collections
/// GET  /jobs/active               -> active_jobs
/// GET  /jobs/{job_id}/status      -> job_status
/// GET  /{id}                      -> get_collection
/// POST /{id}/companies            -> add_companies (synchronous)
/// POST /{id}/companies/bulk       -> launch_bulk_add
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(collections::list_collections))
        .route("/jobs/active", get(jobs::active_jobs))
        .route("/jobs/{job_id}/status", get(jobs::job_status))
        .route("/{id}", get(collections::get_collection))
        .route("/{id}/companies", post(collections::add_companies))
        .route("/{id}/companies/bulk", post(collections::launch_bulk_add))
}
