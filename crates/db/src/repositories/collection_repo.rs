//! Repository for the `collections` table and its membership reads.

use compass_core::types::CollectionId;
use sqlx::PgPool;

use crate::models::collection::Collection;
use crate::models::company::Company;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, collection_name, created_at";

/// Default page size for the membership read.
const DEFAULT_LIMIT: i64 = 10;

/// Maximum page size for the membership read.
const MAX_LIMIT: i64 = 1000;

/// Provides read access to collections and their members.
pub struct CollectionRepo;

impl CollectionRepo {
    /// List all collections, oldest first.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Collection>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM collections ORDER BY created_at, id");
        sqlx::query_as::<_, Collection>(&query).fetch_all(pool).await
    }

    /// Find a single collection by ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: CollectionId,
    ) -> Result<Option<Collection>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM collections WHERE id = $1");
        sqlx::query_as::<_, Collection>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Page through a collection's member companies, ordered by company id.
    pub async fn list_members(
        pool: &PgPool,
        collection_id: CollectionId,
        offset: Option<i64>,
        limit: Option<i64>,
    ) -> Result<Vec<Company>, sqlx::Error> {
        let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
        let offset = offset.unwrap_or(0);

        sqlx::query_as::<_, Company>(
            "SELECT c.id, c.company_name, c.liked, c.created_at \
             FROM collection_memberships m \
             JOIN companies c ON c.id = m.company_id \
             WHERE m.collection_id = $1 \
             ORDER BY c.id \
             LIMIT $2 OFFSET $3",
        )
        .bind(collection_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
    }

    /// Total number of members in a collection.
    pub async fn member_count(
        pool: &PgPool,
        collection_id: CollectionId,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM collection_memberships WHERE collection_id = $1",
        )
        .bind(collection_id)
        .fetch_one(pool)
        .await
    }
}
