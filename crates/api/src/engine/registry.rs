//! Process-wide registry of bulk job records.
//!
//! The registry is the one shared mutable structure of the job engine:
//! many handler tasks read it concurrently while each record is written
//! by exactly one executor. All counter mutation for a record happens
//! under a single write-lock critical section, so readers always observe
//! `added + skipped_duplicates == current` — counter groups are never
//! torn across fields.
//!
//! Records live for the lifetime of the process. Terminal records are
//! retained so late polls still see the final snapshot.

use std::collections::HashMap;

use compass_core::bulk::progress_percent;
use compass_core::types::JobId;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::record::{JobRecord, JobStatus, NewJob, ProgressDelta};

/// Thread-safe storage and retrieval of job records.
///
/// Designed to be wrapped in `Arc` and shared across the application.
pub struct JobRegistry {
    jobs: RwLock<HashMap<JobId, JobRecord>>,
}

impl JobRegistry {
    /// Create a new, empty registry.
    pub fn new() -> Self {
        Self {
            jobs: RwLock::new(HashMap::new()),
        }
    }

    /// Allocate and store a new job record, returning its snapshot.
    ///
    /// The record starts in `Running` with zeroed counters. An empty
    /// request has nothing to process and is created already `Completed`
    /// with `progress == 100`. No I/O happens here.
    pub async fn create(&self, new: NewJob) -> JobRecord {
        let total = new.requested_ids.len() as u64;
        let status = if total == 0 {
            JobStatus::Completed
        } else {
            JobStatus::Running
        };

        let record = JobRecord {
            job_id: Uuid::new_v4(),
            source_collection_id: new.source_collection_id,
            source_collection_name: new.source_collection_name,
            target_collection_id: new.target_collection_id,
            target_collection_name: new.target_collection_name,
            requested_ids: new.requested_ids.into(),
            total,
            current: 0,
            added: 0,
            skipped_duplicates: 0,
            progress: progress_percent(0, total),
            status,
            notify_email: new.notify_email,
            error: None,
            created_at: chrono::Utc::now(),
        };

        self.jobs
            .write()
            .await
            .insert(record.job_id, record.clone());
        record
    }

    /// Snapshot of a single job, or `None` if the id is unknown.
    pub async fn get(&self, job_id: JobId) -> Option<JobRecord> {
        self.jobs.read().await.get(&job_id).cloned()
    }

    /// Snapshots of all `Running` jobs, in a stable order
    /// (`created_at`, then `job_id`) so pollers can re-render the
    /// directory without flicker.
    pub async fn list_active(&self) -> Vec<JobRecord> {
        let mut active: Vec<JobRecord> = self
            .jobs
            .read()
            .await
            .values()
            .filter(|record| record.status == JobStatus::Running)
            .cloned()
            .collect();
        active.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.job_id.cmp(&b.job_id))
        });
        active
    }

    /// Advance a job's counters by one batch, as a single atomic group.
    ///
    /// Recomputes `progress` and flips the status to `Completed` when
    /// `current` reaches `total`, all under the same write lock, so a
    /// poller that observes `completed` also observes the final
    /// counters. Returns the post-update snapshot, or `None` for an
    /// unknown id. A terminal record is left untouched.
    pub async fn apply(&self, job_id: JobId, delta: ProgressDelta) -> Option<JobRecord> {
        debug_assert!(delta.added <= delta.processed);

        let mut jobs = self.jobs.write().await;
        let record = jobs.get_mut(&job_id)?;

        if record.status.is_terminal() {
            return Some(record.clone());
        }

        record.current = (record.current + delta.processed).min(record.total);
        record.added += delta.added;
        record.skipped_duplicates = record.current - record.added;
        record.progress = progress_percent(record.current, record.total);
        if record.current == record.total {
            record.status = JobStatus::Completed;
        }

        Some(record.clone())
    }

    /// Terminal `Failed` transition, preserving the last good counters.
    ///
    /// Returns the post-update snapshot, or `None` for an unknown id.
    /// Has no effect on a record that is already terminal.
    pub async fn fail(&self, job_id: JobId, message: String) -> Option<JobRecord> {
        let mut jobs = self.jobs.write().await;
        let record = jobs.get_mut(&job_id)?;

        if !record.status.is_terminal() {
            record.status = JobStatus::Failed;
            record.error = Some(message);
        }

        Some(record.clone())
    }
}

impl Default for JobRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
