//! Collection models and DTOs.

use compass_core::types::{CollectionId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `collections` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Collection {
    pub id: CollectionId,
    pub collection_name: String,
    pub created_at: Timestamp,
}

/// Query parameters for the paged membership read.
#[derive(Debug, Deserialize)]
pub struct MemberListParams {
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}
