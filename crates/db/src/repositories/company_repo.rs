//! Repository for the `companies` table.

use sqlx::PgPool;

use crate::models::company::Company;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, company_name, liked, created_at";

/// Default page size for company listing.
const DEFAULT_LIMIT: i64 = 10;

/// Maximum page size for company listing.
const MAX_LIMIT: i64 = 1000;

/// Provides read access to companies.
pub struct CompanyRepo;

impl CompanyRepo {
    /// List companies ordered by id, with pagination.
    pub async fn list_paged(
        pool: &PgPool,
        offset: Option<i64>,
        limit: Option<i64>,
    ) -> Result<Vec<Company>, sqlx::Error> {
        let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
        let offset = offset.unwrap_or(0);

        let query = format!(
            "SELECT {COLUMNS} FROM companies \
             ORDER BY id \
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, Company>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Total number of companies.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM companies")
            .fetch_one(pool)
            .await
    }
}
