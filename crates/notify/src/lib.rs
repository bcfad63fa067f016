//! Completion notification delivery.
//!
//! A bulk job that was launched with a notification address gets exactly
//! one notification when it reaches a terminal state. Delivery goes
//! through the [`CompletionNotifier`] trait:
//!
//! - [`email::EmailNotifier`] — SMTP delivery via `lettre`, used when
//!   `SMTP_HOST` is configured.
//! - [`LogNotifier`] — structured-log fallback so completions are still
//!   observable on unconfigured deployments.

use async_trait::async_trait;
use compass_core::types::{JobId, Timestamp};

pub mod email;

pub use email::{EmailConfig, EmailNotifier};

/// Summary of a finished bulk job, handed to the notifier.
#[derive(Debug, Clone)]
pub struct JobCompletion {
    pub job_id: JobId,
    /// Display name of the collection the companies were added to.
    pub collection_name: String,
    pub total: u64,
    pub added: u64,
    pub skipped_duplicates: u64,
    pub completed_at: Timestamp,
}

/// Delivers a one-shot notification for a finished bulk job.
///
/// Delivery is fire-and-forget: failures are the implementation's to
/// report (log), and never affect the job's recorded state.
#[async_trait]
pub trait CompletionNotifier: Send + Sync {
    async fn notify(&self, to_email: &str, completion: &JobCompletion);
}

/// Log-only notifier used when SMTP is not configured.
pub struct LogNotifier;

#[async_trait]
impl CompletionNotifier for LogNotifier {
    async fn notify(&self, to_email: &str, completion: &JobCompletion) {
        tracing::info!(
            to = to_email,
            job_id = %completion.job_id,
            collection = %completion.collection_name,
            added = completion.added,
            skipped_duplicates = completion.skipped_duplicates,
            "Bulk job completion notification (SMTP not configured, logged only)",
        );
    }
}
