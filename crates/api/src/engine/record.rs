//! The job record: identity, inputs, and mutable progress for one bulk
//! membership-add operation.

use std::sync::Arc;

use compass_core::types::{CollectionId, DbId, JobId, Timestamp};
use serde::Serialize;

/// Lifecycle state of a bulk job.
///
/// `Running` is the only non-terminal state. A job reaches `Completed`
/// exactly when `current == total`; `Failed` is the terminal state for a
/// job whose store writes kept failing after retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Running,
    Completed,
    Failed,
}

impl JobStatus {
    /// Whether the job can make no further progress.
    pub fn is_terminal(self) -> bool {
        !matches!(self, JobStatus::Running)
    }
}

/// Inputs for creating a job record.
#[derive(Debug, Clone)]
pub struct NewJob {
    /// Collection the companies are being moved from. Display only;
    /// the mutation happens against the target.
    pub source_collection_id: Option<CollectionId>,
    pub source_collection_name: Option<String>,
    pub target_collection_id: CollectionId,
    pub target_collection_name: String,
    /// The company ids to add, exactly as the caller sent them.
    pub requested_ids: Vec<DbId>,
    /// Address to notify on completion, if any.
    pub notify_email: Option<String>,
}

/// One bulk operation's identity, inputs, and progress counters.
///
/// Owned by the [`JobRegistry`](super::registry::JobRegistry); mutated
/// only through the registry's write methods, by the single executor
/// that owns the job. Clones are cheap (`requested_ids` is shared), so
/// reads hand out full snapshots.
///
/// Counter invariants, maintained by the registry:
/// `current <= total` and `added + skipped_duplicates == current`.
#[derive(Debug, Clone)]
pub struct JobRecord {
    pub job_id: JobId,
    pub source_collection_id: Option<CollectionId>,
    pub source_collection_name: Option<String>,
    pub target_collection_id: CollectionId,
    pub target_collection_name: String,
    /// Immutable input sequence, fixed at creation.
    pub requested_ids: Arc<[DbId]>,
    /// `requested_ids.len()`, fixed at creation.
    pub total: u64,
    /// Requested entries processed so far.
    pub current: u64,
    /// Entries that produced a new membership row.
    pub added: u64,
    /// Entries skipped because the membership already existed (or the id
    /// was a duplicate within the request).
    pub skipped_duplicates: u64,
    /// `floor(current / total * 100)`; 100 for an empty job.
    pub progress: u8,
    pub status: JobStatus,
    pub notify_email: Option<String>,
    /// Failure message, set only when `status == Failed`.
    pub error: Option<String>,
    /// Creation time; used for directory ordering.
    pub created_at: Timestamp,
}

/// One batch's worth of progress, applied to a record as a unit.
#[derive(Debug, Clone, Copy)]
pub struct ProgressDelta {
    /// Requested entries consumed by the batch.
    pub processed: u64,
    /// Entries that produced a new membership row (`added <= processed`).
    pub added: u64,
}
