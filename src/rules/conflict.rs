use serde::Serialize;
use ulid::Ulid;

use crate::model::{AvailabilityBlock, Booking, BookingCandidate, RecurringBooking};

/// Why a candidate was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictKind {
    /// Overlaps an active booking or recurring-booking instance.
    TimeOverlap,
    /// No published available block fully covers the candidate.
    AvailabilityUnavailable,
}

/// Detector verdict in the shape the HTTP layer serializes as-is.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictReport {
    pub has_conflict: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conflict_type: Option<ConflictKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conflicting_booking_id: Option<Ulid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ConflictReport {
    pub fn clear() -> Self {
        Self {
            has_conflict: false,
            conflict_type: None,
            conflicting_booking_id: None,
            message: None,
        }
    }

    fn time_overlap(booking_id: Ulid) -> Self {
        Self {
            has_conflict: true,
            conflict_type: Some(ConflictKind::TimeOverlap),
            conflicting_booking_id: Some(booking_id),
            message: Some("requested time overlaps an existing booking".into()),
        }
    }

    fn unavailable() -> Self {
        Self {
            has_conflict: true,
            conflict_type: Some(ConflictKind::AvailabilityUnavailable),
            conflicting_booking_id: None,
            message: Some("venue is not open for the requested time".into()),
        }
    }
}

/// Decide whether `candidate` may occupy its slot, given row snapshots for
/// the venue. Checks run in order and short-circuit at the first hit:
///
/// 1. Active bookings on the same venue/date (minus `exclude_booking_id`,
///    for edit-in-place checks) — any half-open overlap conflicts.
/// 2. Active recurring-booking instances, same rule, no exclude support.
/// 3. The candidate must sit entirely inside at least one available block on
///    the venue/date. No published blocks means nothing is accepted.
///
/// Pure function of its inputs; O(n) over the three collections.
pub fn detect_conflicts(
    candidate: &BookingCandidate,
    exclude_booking_id: Option<Ulid>,
    bookings: &[Booking],
    recurring: &[RecurringBooking],
    blocks: &[AvailabilityBlock],
) -> ConflictReport {
    let range = candidate.time_range();

    for b in bookings {
        if b.venue_id != candidate.venue_id || b.date != candidate.date {
            continue;
        }
        if !b.status.blocks_slot() || exclude_booking_id == Some(b.id) {
            continue;
        }
        if b.time_range().overlaps(&range) {
            return ConflictReport::time_overlap(b.id);
        }
    }

    for r in recurring {
        if r.venue_id != candidate.venue_id || r.date != candidate.date {
            continue;
        }
        if !r.status.blocks_slot() {
            continue;
        }
        if r.time_range().overlaps(&range) {
            return ConflictReport::time_overlap(r.id);
        }
    }

    let covered = blocks.iter().any(|blk| {
        blk.venue_id == candidate.venue_id
            && blk.date == candidate.date
            && blk.is_available
            && blk.time_range().contains(&range)
    });
    if !covered {
        return ConflictReport::unavailable();
    }

    ConflictReport::clear()
}
