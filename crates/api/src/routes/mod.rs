pub mod collections;
pub mod companies;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /companies                                paged company listing
///
/// /collections                              collection metadata list
/// /collections/{id}                         paged membership read
/// /collections/{id}/companies               synchronous add (POST)
/// /collections/{id}/companies/bulk          bulk add launch (POST)
/// /collections/jobs/active                  running-jobs directory
/// /collections/jobs/{job_id}/status         single-job status
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/companies", companies::router())
        .nest("/collections", collections::router())
}
