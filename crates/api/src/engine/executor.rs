//! Bulk job executor.
//!
//! Runs one job to completion on its own task: iterates the requested
//! ids in fixed-size batches, deduplicates against existing membership
//! through the store's idempotent insert, and advances the job record's
//! counters one atomic group per batch. Store failures are retried a
//! bounded number of times with doubling backoff before the job is
//! marked `Failed`.

use std::sync::Arc;
use std::time::Duration;

use compass_core::bulk::distinct_ids;
use compass_core::types::{CollectionId, DbId, JobId};
use compass_db::store::{MembershipStore, StoreError};
use compass_notify::{CompletionNotifier, JobCompletion};

use super::record::{JobRecord, JobStatus, ProgressDelta};
use super::registry::JobRegistry;

/// Attempts per batch before the job is marked failed.
const MAX_BATCH_ATTEMPTS: u32 = 3;

/// Backoff before the first retry; doubles per attempt.
const RETRY_BASE_DELAY: Duration = Duration::from_millis(250);

/// Run a single bulk job to a terminal state.
///
/// `job` is the snapshot returned by the registry at creation; the
/// executor is the record's only writer from here on.
pub(super) async fn run(
    registry: Arc<JobRegistry>,
    store: Arc<dyn MembershipStore>,
    notifier: Arc<dyn CompletionNotifier>,
    job: JobRecord,
    batch_size: usize,
) {
    tracing::info!(
        job_id = %job.job_id,
        collection_id = %job.target_collection_id,
        total = job.total,
        batch_size,
        "Bulk add job started",
    );

    // An empty request is created already completed; only the
    // notification remains.
    if job.total == 0 {
        notify_completion(notifier.as_ref(), &job).await;
        return;
    }

    let ids = Arc::clone(&job.requested_ids);
    for batch in ids.chunks(batch_size) {
        // The membership contract is per distinct id: collapse repeats
        // within the batch so the store sees each id once. Repeats are
        // counted as duplicates via `processed - added`, as are repeats
        // that already landed in an earlier batch (the idempotent insert
        // reports them as not-added).
        let unique = distinct_ids(batch);

        let added = match insert_with_retry(
            store.as_ref(),
            job.job_id,
            job.target_collection_id,
            &unique,
        )
        .await
        {
            Ok(added) => added,
            Err(e) => {
                tracing::error!(
                    job_id = %job.job_id,
                    collection_id = %job.target_collection_id,
                    error = %e,
                    "Bulk add job failed; keeping last good counters",
                );
                registry.fail(job.job_id, e.to_string()).await;
                return;
            }
        };

        let delta = ProgressDelta {
            processed: batch.len() as u64,
            added,
        };
        let Some(snapshot) = registry.apply(job.job_id, delta).await else {
            // The registry owns records for the process lifetime, so a
            // missing record means the engine is being torn down.
            tracing::warn!(job_id = %job.job_id, "Job record vanished mid-run");
            return;
        };

        if snapshot.status == JobStatus::Completed {
            tracing::info!(
                job_id = %snapshot.job_id,
                collection_id = %snapshot.target_collection_id,
                added = snapshot.added,
                skipped_duplicates = snapshot.skipped_duplicates,
                "Bulk add job completed",
            );
            notify_completion(notifier.as_ref(), &snapshot).await;
        }
    }
}

/// Insert one batch, retrying transient store failures with backoff.
async fn insert_with_retry(
    store: &dyn MembershipStore,
    job_id: JobId,
    collection_id: CollectionId,
    company_ids: &[DbId],
) -> Result<u64, StoreError> {
    let mut attempt = 1;
    loop {
        match store.add_members(collection_id, company_ids).await {
            Ok(added) => return Ok(added),
            Err(e) if attempt < MAX_BATCH_ATTEMPTS => {
                let delay = RETRY_BASE_DELAY * 2u32.pow(attempt - 1);
                tracing::warn!(
                    job_id = %job_id,
                    collection_id = %collection_id,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "Batch insert failed, retrying",
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Fire the completion notification, if the job asked for one.
async fn notify_completion(notifier: &dyn CompletionNotifier, record: &JobRecord) {
    let Some(email) = &record.notify_email else {
        return;
    };

    let completion = JobCompletion {
        job_id: record.job_id,
        collection_name: record.target_collection_name.clone(),
        total: record.total,
        added: record.added,
        skipped_duplicates: record.skipped_duplicates,
        completed_at: chrono::Utc::now(),
    };
    notifier.notify(email, &completion).await;
}
