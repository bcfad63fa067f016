//! Bulk membership-add arithmetic.
//!
//! Pure functions used by the job engine and the synchronous add path.
//! Lives in `core` to maintain the zero internal dependency constraint.

use crate::types::DbId;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Default number of company ids processed per store round-trip.
///
/// Large enough to amortize the round-trip, small enough that a progress
/// poll never lags a batch by more than a moment. Tunable via
/// `BULK_BATCH_SIZE`; correctness does not depend on the value.
pub const DEFAULT_BATCH_SIZE: usize = 500;

/// Lower bound for a configured batch size.
pub const MIN_BATCH_SIZE: usize = 1;

/// Upper bound for a configured batch size.
pub const MAX_BATCH_SIZE: usize = 10_000;

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

/// Integer progress percentage for a job, `floor(current / total * 100)`.
///
/// An empty job (`total == 0`) has nothing to do and reports 100.
pub fn progress_percent(current: u64, total: u64) -> u8 {
    if total == 0 {
        return 100;
    }
    ((current * 100) / total).min(100) as u8
}

// ---------------------------------------------------------------------------
// Request-level dedup
// ---------------------------------------------------------------------------

/// Return the distinct ids of `ids`, preserving first-occurrence order.
///
/// The membership contract is per distinct target id, not per request-list
/// entry: a repeated id must be inserted (and counted as added) at most
/// once, with later occurrences counted as duplicates.
pub fn distinct_ids(ids: &[DbId]) -> Vec<DbId> {
    let mut seen = std::collections::HashSet::with_capacity(ids.len());
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

// ---------------------------------------------------------------------------
// Batch sizing
// ---------------------------------------------------------------------------

/// Clamp a configured batch size into the supported range.
pub fn clamp_batch_size(requested: usize) -> usize {
    requested.clamp(MIN_BATCH_SIZE, MAX_BATCH_SIZE)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- progress_percent -----------------------------------------------------

    #[test]
    fn progress_empty_job_is_complete() {
        assert_eq!(progress_percent(0, 0), 100);
    }

    #[test]
    fn progress_zero_at_start() {
        assert_eq!(progress_percent(0, 1000), 0);
    }

    #[test]
    fn progress_floors_partial_batches() {
        // 999 / 1000 = 99.9% -> floor to 99.
        assert_eq!(progress_percent(999, 1000), 99);
        // 1 / 3 = 33.3% -> floor to 33.
        assert_eq!(progress_percent(1, 3), 33);
    }

    #[test]
    fn progress_full_is_100() {
        assert_eq!(progress_percent(1000, 1000), 100);
        assert_eq!(progress_percent(3, 3), 100);
    }

    #[test]
    fn progress_never_exceeds_100() {
        // current > total cannot happen under the registry invariant, but
        // the arithmetic still clamps.
        assert_eq!(progress_percent(7, 3), 100);
    }

    // -- distinct_ids ---------------------------------------------------------

    #[test]
    fn distinct_preserves_first_occurrence_order() {
        assert_eq!(distinct_ids(&[7, 7, 9]), vec![7, 9]);
        assert_eq!(distinct_ids(&[3, 1, 3, 2, 1]), vec![3, 1, 2]);
    }

    #[test]
    fn distinct_empty_input() {
        assert!(distinct_ids(&[]).is_empty());
    }

    #[test]
    fn distinct_no_duplicates_is_identity() {
        assert_eq!(distinct_ids(&[1, 2, 3]), vec![1, 2, 3]);
    }

    // -- clamp_batch_size -----------------------------------------------------

    #[test]
    fn clamp_accepts_in_range_values() {
        assert_eq!(clamp_batch_size(DEFAULT_BATCH_SIZE), DEFAULT_BATCH_SIZE);
    }

    #[test]
    fn clamp_rejects_zero() {
        assert_eq!(clamp_batch_size(0), MIN_BATCH_SIZE);
    }

    #[test]
    fn clamp_caps_oversized_values() {
        assert_eq!(clamp_batch_size(usize::MAX), MAX_BATCH_SIZE);
    }
}
