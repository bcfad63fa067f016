//! Handlers for the company catalog.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use compass_db::models::company::{Company, CompanyListParams};
use compass_db::repositories::CompanyRepo;
use serde::Serialize;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// One page of the company catalog.
#[derive(Debug, Serialize)]
pub struct CompanyPage {
    pub companies: Vec<Company>,
    pub total: i64,
}

/// GET /api/v1/companies
///
/// Paged company listing, ordered by id. Each entry carries the `liked`
/// flag so the grid can render without a second lookup.
pub async fn list_companies(
    State(state): State<AppState>,
    Query(params): Query<CompanyListParams>,
) -> AppResult<impl IntoResponse> {
    let companies = CompanyRepo::list_paged(&state.pool, params.offset, params.limit).await?;
    let total = CompanyRepo::count(&state.pool).await?;

    Ok(Json(DataResponse {
        data: CompanyPage { companies, total },
    }))
}
