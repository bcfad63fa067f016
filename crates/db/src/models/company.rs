//! Company models and DTOs.

use compass_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `companies` table.
///
/// Companies are read-only for the membership engine; only their
/// membership links are ever created or removed.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Company {
    pub id: DbId,
    pub company_name: String,
    pub liked: bool,
    pub created_at: Timestamp,
}

/// Query parameters for paged company listings.
#[derive(Debug, Deserialize)]
pub struct CompanyListParams {
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}
