//! End-to-end tests for the bulk job engine against an in-memory
//! membership store: dedup counting, idempotence, failure policy,
//! concurrency, and completion notification.

mod common;

use std::sync::Arc;

use assert_matches::assert_matches;
use compass_api::engine::{BulkJobEngine, JobStatus, NewJob};
use compass_core::types::{CollectionId, DbId};
use compass_db::store::MembershipStore;
use compass_notify::CompletionNotifier;

use common::{
    wait_for_terminal, FailingStore, GatedStore, InMemoryMembershipStore, RecordingNotifier,
};

fn new_job(target: CollectionId, ids: Vec<DbId>) -> NewJob {
    NewJob {
        source_collection_id: None,
        source_collection_name: None,
        target_collection_id: target,
        target_collection_name: "My List".to_string(),
        requested_ids: ids,
        notify_email: None,
    }
}

fn engine_over(
    store: Arc<dyn MembershipStore>,
    notifier: Arc<dyn CompletionNotifier>,
    batch_size: usize,
) -> BulkJobEngine {
    BulkJobEngine::new(store, notifier, batch_size)
}

// ---------------------------------------------------------------------------
// Dedup counting
// ---------------------------------------------------------------------------

#[tokio::test]
async fn duplicate_ids_within_request_are_counted_once() {
    let store = Arc::new(InMemoryMembershipStore::new());
    let engine = engine_over(store.clone(), Arc::new(RecordingNotifier::new()), 500);
    let target = CollectionId::new_v4();

    let record = engine.launch(new_job(target, vec![7, 7, 9])).await;
    let done = wait_for_terminal(engine.registry(), record.job_id).await;

    assert_eq!(done.status, JobStatus::Completed);
    assert_eq!(done.total, 3);
    assert_eq!(done.current, 3);
    assert_eq!(done.added, 2);
    assert_eq!(done.skipped_duplicates, 1);
    assert_eq!(done.progress, 100);
    assert_eq!(store.member_count(target), 2);
}

#[tokio::test]
async fn repeated_id_across_batches_is_counted_once() {
    let store = Arc::new(InMemoryMembershipStore::new());
    // Batch size 2 puts the repeated id 5 into a later batch.
    let engine = engine_over(store.clone(), Arc::new(RecordingNotifier::new()), 2);
    let target = CollectionId::new_v4();

    let record = engine.launch(new_job(target, vec![5, 6, 7, 5])).await;
    let done = wait_for_terminal(engine.registry(), record.job_id).await;

    assert_eq!(done.status, JobStatus::Completed);
    assert_eq!(done.total, 4);
    assert_eq!(done.added, 3);
    assert_eq!(done.skipped_duplicates, 1);
    assert_eq!(store.member_count(target), 3);
}

#[tokio::test]
async fn second_identical_job_reports_all_duplicates() {
    let store = Arc::new(InMemoryMembershipStore::new());
    let engine = engine_over(store.clone(), Arc::new(RecordingNotifier::new()), 10);
    let target = CollectionId::new_v4();
    let ids: Vec<DbId> = (1..=50).collect();

    let first = engine.launch(new_job(target, ids.clone())).await;
    let first = wait_for_terminal(engine.registry(), first.job_id).await;
    assert_eq!(first.added, 50);
    assert_eq!(first.skipped_duplicates, 0);

    let second = engine.launch(new_job(target, ids)).await;
    let second = wait_for_terminal(engine.registry(), second.job_id).await;
    assert_eq!(second.status, JobStatus::Completed);
    assert_eq!(second.added, 0);
    assert_eq!(second.skipped_duplicates, 50);
    assert_eq!(store.member_count(target), 50);
}

// ---------------------------------------------------------------------------
// Empty input
// ---------------------------------------------------------------------------

#[tokio::test]
async fn empty_request_is_immediately_completed() {
    let engine = engine_over(
        Arc::new(InMemoryMembershipStore::new()),
        Arc::new(RecordingNotifier::new()),
        500,
    );

    let record = engine
        .launch(new_job(CollectionId::new_v4(), vec![]))
        .await;

    // The launch snapshot itself is already terminal.
    assert_eq!(record.status, JobStatus::Completed);
    assert_eq!(record.total, 0);
    assert_eq!(record.progress, 100);

    let fetched = engine.registry().get(record.job_id).await.unwrap();
    assert_eq!(fetched.status, JobStatus::Completed);
    assert!(engine.registry().list_active().await.is_empty());
}

// ---------------------------------------------------------------------------
// Failure policy
// ---------------------------------------------------------------------------

#[tokio::test]
async fn store_failure_after_retries_marks_job_failed_with_last_good_counters() {
    // First batch succeeds, every later call fails (including retries).
    let store = Arc::new(FailingStore::new(1));
    let engine = engine_over(store, Arc::new(RecordingNotifier::new()), 2);
    let target = CollectionId::new_v4();

    let record = engine.launch(new_job(target, vec![1, 2, 3, 4, 5, 6])).await;
    let done = wait_for_terminal(engine.registry(), record.job_id).await;

    assert_eq!(done.status, JobStatus::Failed);
    assert_eq!(done.current, 2);
    assert_eq!(done.added, 2);
    assert_eq!(done.skipped_duplicates, 0);
    assert_matches!(done.error.as_deref(), Some(message) if message.contains("unavailable"));
    assert_eq!(done.added + done.skipped_duplicates, done.current);

    // Failed jobs leave the directory.
    assert!(engine.registry().list_active().await.is_empty());
}

#[tokio::test]
async fn failed_job_sends_no_completion_notification() {
    let notifier = Arc::new(RecordingNotifier::new());
    let engine = engine_over(Arc::new(FailingStore::new(0)), notifier.clone(), 10);

    let mut job = new_job(CollectionId::new_v4(), vec![1, 2, 3]);
    job.notify_email = Some("ops@example.com".to_string());
    let record = engine.launch(job).await;
    wait_for_terminal(engine.registry(), record.job_id).await;

    assert!(notifier.sent().is_empty());
}

// ---------------------------------------------------------------------------
// Concurrency
// ---------------------------------------------------------------------------

#[tokio::test]
async fn concurrent_overlapping_jobs_never_double_count() {
    let store = Arc::new(InMemoryMembershipStore::new());
    let engine = engine_over(store.clone(), Arc::new(RecordingNotifier::new()), 25);
    let target = CollectionId::new_v4();

    // 1..=1000 and 500..=1500 overlap on 500..=1000.
    let a = engine
        .launch(new_job(target, (1..=1000).collect()))
        .await;
    let b = engine
        .launch(new_job(target, (500..=1500).collect()))
        .await;

    let a = wait_for_terminal(engine.registry(), a.job_id).await;
    let b = wait_for_terminal(engine.registry(), b.job_id).await;

    assert_eq!(a.status, JobStatus::Completed);
    assert_eq!(b.status, JobStatus::Completed);
    assert_eq!(a.added + a.skipped_duplicates, a.current);
    assert_eq!(b.added + b.skipped_duplicates, b.current);

    // Exactly the distinct ids across both requests, each added once.
    assert_eq!(store.member_count(target), 1500);
    assert_eq!(a.added + b.added, 1500);
}

// ---------------------------------------------------------------------------
// Progress observation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn snapshots_are_monotonic_and_internally_consistent() {
    let (store, _inner, gate) = GatedStore::new();
    let engine = engine_over(Arc::new(store), Arc::new(RecordingNotifier::new()), 1);
    let target = CollectionId::new_v4();

    let record = engine.launch(new_job(target, vec![10, 20, 30])).await;
    let registry = engine.registry();

    let mut last = registry.get(record.job_id).await.unwrap();
    assert_eq!(last.current, 0);
    assert_eq!(last.status, JobStatus::Running);

    // Step through one batch at a time, checking every snapshot.
    for step in 1..=3u64 {
        gate.add_permits(1);
        let snapshot = tokio::time::timeout(std::time::Duration::from_secs(5), async {
            loop {
                let snapshot = registry.get(record.job_id).await.unwrap();
                if snapshot.current >= step {
                    return snapshot;
                }
                tokio::time::sleep(std::time::Duration::from_millis(2)).await;
            }
        })
        .await
        .expect("batch did not land in time");

        assert!(snapshot.current >= last.current);
        assert!(snapshot.added >= last.added);
        assert!(snapshot.skipped_duplicates >= last.skipped_duplicates);
        assert_eq!(snapshot.added + snapshot.skipped_duplicates, snapshot.current);
        assert!(snapshot.progress <= 100);
        last = snapshot;
    }

    assert_eq!(last.status, JobStatus::Completed);
    assert_eq!(last.progress, 100);
}

#[tokio::test]
async fn job_leaves_directory_when_it_completes() {
    let (store, _inner, gate) = GatedStore::new();
    let engine = engine_over(Arc::new(store), Arc::new(RecordingNotifier::new()), 500);
    let target = CollectionId::new_v4();

    let record = engine.launch(new_job(target, vec![1, 2, 3])).await;

    // Held at the gate: the job is running and listed.
    let active = engine.registry().list_active().await;
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].job_id, record.job_id);

    gate.add_permits(1);
    let done = wait_for_terminal(engine.registry(), record.job_id).await;
    assert_eq!(done.status, JobStatus::Completed);
    assert!(engine.registry().list_active().await.is_empty());
}

// ---------------------------------------------------------------------------
// Notification
// ---------------------------------------------------------------------------

#[tokio::test]
async fn completion_notification_fires_exactly_once() {
    let notifier = Arc::new(RecordingNotifier::new());
    let engine = engine_over(
        Arc::new(InMemoryMembershipStore::new()),
        notifier.clone(),
        2,
    );
    let target = CollectionId::new_v4();

    let mut job = new_job(target, vec![1, 2, 3, 4, 5]);
    job.notify_email = Some("analyst@example.com".to_string());
    let record = engine.launch(job).await;
    let done = wait_for_terminal(engine.registry(), record.job_id).await;

    // Drain the executor task fully before inspecting the notifier.
    engine.shutdown().await;

    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    let (to, completion) = &sent[0];
    assert_eq!(to, "analyst@example.com");
    assert_eq!(completion.job_id, done.job_id);
    assert_eq!(completion.added, 5);
    assert_eq!(completion.skipped_duplicates, 0);
    assert_eq!(completion.collection_name, "My List");
}

#[tokio::test]
async fn no_notification_without_an_email() {
    let notifier = Arc::new(RecordingNotifier::new());
    let engine = engine_over(
        Arc::new(InMemoryMembershipStore::new()),
        notifier.clone(),
        500,
    );

    let record = engine
        .launch(new_job(CollectionId::new_v4(), vec![1, 2]))
        .await;
    wait_for_terminal(engine.registry(), record.job_id).await;
    engine.shutdown().await;

    assert!(notifier.sent().is_empty());
}

#[tokio::test]
async fn empty_job_with_email_still_notifies() {
    let notifier = Arc::new(RecordingNotifier::new());
    let engine = engine_over(
        Arc::new(InMemoryMembershipStore::new()),
        notifier.clone(),
        500,
    );

    let mut job = new_job(CollectionId::new_v4(), vec![]);
    job.notify_email = Some("analyst@example.com".to_string());
    let record = engine.launch(job).await;

    assert_eq!(record.status, JobStatus::Completed);
    engine.shutdown().await;

    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].1.total, 0);
    assert_eq!(sent[0].1.added, 0);
}
