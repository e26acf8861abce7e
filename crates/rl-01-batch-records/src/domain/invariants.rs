//! # Domain Invariants
//!
//! Integrity rules every batch file must satisfy.

use super::records::{BatchTrailer, DetailRecord};

/// Trailer count expected for `detail_count` detail records.
///
/// The header record is counted too.
pub fn expected_record_count(detail_count: usize) -> u32 {
    u32::try_from(detail_count).map_or(u32::MAX, |n| n.saturating_add(1))
}

/// Invariant: trailer record count equals detail count + 1.
pub fn invariant_record_count(trailer: &BatchTrailer, details: &[DetailRecord]) -> bool {
    trailer.record_count == expected_record_count(details.len())
}
