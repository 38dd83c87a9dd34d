//! Candidate comparison and ordering logic.

use std::cmp::Ordering;

use crate::topology::Candidate;
use crate::DeviceId;

/// Compares by device id for deterministic tie-breaking.
pub fn compare_by_id(a: DeviceId, b: DeviceId) -> Ordering {
    a.cmp(&b)
}

/// Higher score first, then lower device id.
///
/// Scores use the IEEE total order, the same order mappings are sorted by.
pub fn compare_scored(a_score: f64, a_id: DeviceId, b_score: f64, b_id: DeviceId) -> Ordering {
    b_score
        .total_cmp(&a_score)
        .then_with(|| compare_by_id(a_id, b_id))
}

/// Main comparison function for sorting matcher output.
pub fn compare_candidates(a: &Candidate, b: &Candidate) -> Ordering {
    compare_scored(a.fit_score, a.device_id, b.fit_score, b.device_id)
}
