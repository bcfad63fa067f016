//! Membership store abstraction.
//!
//! The bulk job executor and the synchronous add path mutate membership
//! through [`MembershipStore`] rather than a concrete pool, so they can
//! be exercised against an in-memory store in tests. The production
//! implementation is [`PgMembershipStore`], a thin wrapper over
//! [`MembershipRepo`].

use async_trait::async_trait;
use compass_core::types::{CollectionId, DbId};

use crate::repositories::MembershipRepo;
use crate::DbPool;

/// Error type for membership store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A database error from sqlx.
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    /// The store rejected or could not service the request.
    #[error("Membership store unavailable: {0}")]
    Unavailable(String),
}

/// The persisted company-collection membership relation.
///
/// Implementations must make the per-id check-then-insert effectively
/// atomic: two callers racing to add the same company to the same
/// collection must not both observe it as newly added.
#[async_trait]
pub trait MembershipStore: Send + Sync {
    /// Add `company_ids` to `collection_id`, skipping existing members.
    ///
    /// Returns the number of ids that resulted in a new membership row.
    async fn add_members(
        &self,
        collection_id: CollectionId,
        company_ids: &[DbId],
    ) -> Result<u64, StoreError>;
}

/// Postgres-backed membership store.
pub struct PgMembershipStore {
    pool: DbPool,
}

impl PgMembershipStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MembershipStore for PgMembershipStore {
    async fn add_members(
        &self,
        collection_id: CollectionId,
        company_ids: &[DbId],
    ) -> Result<u64, StoreError> {
        let added = MembershipRepo::add_members(&self.pool, collection_id, company_ids).await?;
        Ok(added)
    }
}
