//! Routes for the company catalog, mounted at `/companies`.

use axum::routing::get;
use axum::Router;

use crate::handlers::companies;
use crate::state::AppState;

/// ```text
/// GET /    -> list_companies
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(companies::list_companies))
}
