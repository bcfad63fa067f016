//! Bulk collection-membership job engine.
//!
//! The engine accepts a resolved set of company ids, creates a job
//! record, and processes the membership mutation on an independent
//! Tokio task so the launch path returns immediately — a 5-id request
//! and a 200,000-id request cost the caller the same. Progress is
//! readable at any time through the [`JobRegistry`]: per-job snapshots
//! for polling, and a directory of running jobs so a client can
//! reattach after navigating away.

use std::sync::Arc;

use compass_core::bulk::clamp_batch_size;
use compass_db::store::MembershipStore;
use compass_notify::CompletionNotifier;
use tokio_util::task::TaskTracker;

mod executor;
pub mod record;
pub mod registry;

pub use record::{JobRecord, JobStatus, NewJob, ProgressDelta};
pub use registry::JobRegistry;

/// Launches bulk jobs and owns the process-wide job registry.
///
/// Held in application state behind `Arc`. Every spawned executor task
/// is tracked so shutdown can drain in-flight jobs.
pub struct BulkJobEngine {
    registry: Arc<JobRegistry>,
    store: Arc<dyn MembershipStore>,
    notifier: Arc<dyn CompletionNotifier>,
    tracker: TaskTracker,
    batch_size: usize,
}

impl BulkJobEngine {
    /// Create an engine over the given store and notifier.
    pub fn new(
        store: Arc<dyn MembershipStore>,
        notifier: Arc<dyn CompletionNotifier>,
        batch_size: usize,
    ) -> Self {
        Self {
            registry: Arc::new(JobRegistry::new()),
            store,
            notifier,
            tracker: TaskTracker::new(),
            batch_size: clamp_batch_size(batch_size),
        }
    }

    /// The job registry, for status and directory reads.
    pub fn registry(&self) -> &JobRegistry {
        &self.registry
    }

    /// The membership store, shared with the synchronous add path.
    pub fn store(&self) -> &Arc<dyn MembershipStore> {
        &self.store
    }

    /// Create a job record and hand it to an executor task.
    ///
    /// Returns the initial snapshot as soon as the record exists —
    /// before any membership work happens. The caller is expected to
    /// have validated the target collection.
    pub async fn launch(&self, new: NewJob) -> JobRecord {
        let record = self.registry.create(new).await;

        let registry = Arc::clone(&self.registry);
        let store = Arc::clone(&self.store);
        let notifier = Arc::clone(&self.notifier);
        let job = record.clone();
        let batch_size = self.batch_size;
        self.tracker.spawn(async move {
            executor::run(registry, store, notifier, job, batch_size).await;
        });

        record
    }

    /// Wait for all in-flight jobs to reach a terminal state.
    ///
    /// Closes the task tracker, so this is a shutdown-only operation.
    pub async fn shutdown(&self) {
        self.tracker.close();
        self.tracker.wait().await;
    }
}
