//! Repository for the `collection_memberships` table.

use compass_core::types::{CollectionId, DbId};
use sqlx::PgPool;

/// Provides membership mutation for collections.
pub struct MembershipRepo;

impl MembershipRepo {
    /// Insert membership rows for `company_ids`, skipping ids that are
    /// already members. Returns the number of rows actually inserted.
    ///
    /// The insert selects through `companies`, so ids that do not exist
    /// insert nothing, and `ON CONFLICT DO NOTHING` on the composite
    /// primary key makes the check-then-insert atomic per id even when
    /// concurrent jobs target the same collection.
    pub async fn add_members(
        pool: &PgPool,
        collection_id: CollectionId,
        company_ids: &[DbId],
    ) -> Result<u64, sqlx::Error> {
        if company_ids.is_empty() {
            return Ok(0);
        }

        let result = sqlx::query(
            "INSERT INTO collection_memberships (collection_id, company_id) \
             SELECT $1, c.id FROM companies c WHERE c.id = ANY($2) \
             ON CONFLICT (collection_id, company_id) DO NOTHING",
        )
        .bind(collection_id)
        .bind(company_ids)
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Whether a single company is a member of a collection.
    pub async fn is_member(
        pool: &PgPool,
        collection_id: CollectionId,
        company_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let exists: Option<i32> = sqlx::query_scalar(
            "SELECT 1 FROM collection_memberships \
             WHERE collection_id = $1 AND company_id = $2",
        )
        .bind(collection_id)
        .bind(company_id)
        .fetch_optional(pool)
        .await?;
        Ok(exists.is_some())
    }
}
