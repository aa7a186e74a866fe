use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Minutes since midnight — the only intra-day time type.
pub type Minutes = i32;

/// Returns true if `t` looks like `HH:MM` or `HH:MM:SS` (digits and colons
/// in the right places; field ranges are not checked).
pub fn is_clock_time(t: &str) -> bool {
    let b = t.as_bytes();
    match b.len() {
        5 => {}
        8 => {
            if b[5] != b':' || !b[6].is_ascii_digit() || !b[7].is_ascii_digit() {
                return false;
            }
        }
        _ => return false,
    }
    b[0].is_ascii_digit()
        && b[1].is_ascii_digit()
        && b[2] == b':'
        && b[3].is_ascii_digit()
        && b[4].is_ascii_digit()
}

/// Convert `HH:MM[:SS]` to minutes since midnight. Seconds are truncated.
///
/// Malformed input is a caller contract violation — times reach this point
/// only after upstream schema validation.
pub fn clock_minutes(t: &str) -> Minutes {
    debug_assert!(is_clock_time(t), "malformed clock time: {t}");
    let b = t.as_bytes();
    let hours = (b[0] - b'0') as Minutes * 10 + (b[1] - b'0') as Minutes;
    let mins = (b[3] - b'0') as Minutes * 10 + (b[4] - b'0') as Minutes;
    hours * 60 + mins
}

/// Half-open wall-clock interval `[start, end)` in minutes since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: Minutes,
    pub end: Minutes,
}

impl TimeRange {
    pub fn new(start: Minutes, end: Minutes) -> Self {
        Self { start, end }
    }

    pub fn from_clock(start: &str, end: &str) -> Self {
        Self::new(clock_minutes(start), clock_minutes(end))
    }

    /// Strict half-open overlap — touching endpoints do not conflict.
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Closed containment of `inner` — equal bounds count as contained.
    pub fn contains(&self, inner: &TimeRange) -> bool {
        inner.start >= self.start && inner.end <= self.end
    }
}

/// Booking lifecycle status as persisted by the row-store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    /// Only pending/confirmed bookings occupy their slot for conflict
    /// purposes; cancelled/completed are inert.
    pub fn blocks_slot(&self) -> bool {
        matches!(self, BookingStatus::Pending | BookingStatus::Confirmed)
    }
}

/// A reserved time range on a venue. Times are `HH:MM:SS` wall-clock strings
/// scoped to the venue's local `date`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: Ulid,
    pub venue_id: Ulid,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub status: BookingStatus,
}

impl Booking {
    pub fn time_range(&self) -> TimeRange {
        TimeRange::from_clock(&self.start_time, &self.end_time)
    }
}

/// A generated instance of a repeating reservation pattern. Checked for
/// conflicts exactly like a regular booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurringBooking {
    pub id: Ulid,
    pub parent_booking_id: Ulid,
    pub venue_id: Ulid,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub status: BookingStatus,
}

impl RecurringBooking {
    pub fn time_range(&self) -> TimeRange {
        TimeRange::from_clock(&self.start_time, &self.end_time)
    }
}

/// A published open (or closed) window on a venue's calendar. A candidate
/// booking must fit entirely inside an `is_available` block to be accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityBlock {
    pub id: Ulid,
    pub venue_id: Ulid,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub is_available: bool,
}

impl AvailabilityBlock {
    pub fn time_range(&self) -> TimeRange {
        TimeRange::from_clock(&self.start_time, &self.end_time)
    }
}

/// A proposed reservation, before any row exists for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingCandidate {
    pub venue_id: Ulid,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
}

impl BookingCandidate {
    pub fn time_range(&self) -> TimeRange {
        TimeRange::from_clock(&self.start_time, &self.end_time)
    }
}

/// The venue fields the completeness scorer reads. The full marketing row
/// (photos, description, location) lives with the row-store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    pub id: Ulid,
    pub name: String,
    pub hourly_rate: Option<f64>,
    pub amenities: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_minutes_basics() {
        assert_eq!(clock_minutes("00:00"), 0);
        assert_eq!(clock_minutes("09:30"), 570);
        assert_eq!(clock_minutes("23:59"), 1439);
    }

    #[test]
    fn clock_minutes_truncates_seconds() {
        assert_eq!(clock_minutes("18:00:00"), clock_minutes("18:00"));
        assert_eq!(clock_minutes("18:00:59"), clock_minutes("18:00"));
    }

    #[test]
    fn is_clock_time_shapes() {
        assert!(is_clock_time("09:30"));
        assert!(is_clock_time("09:30:00"));
        assert!(!is_clock_time("9:30"));
        assert!(!is_clock_time("09-30"));
        assert!(!is_clock_time("09:30:0"));
        assert!(!is_clock_time("morning"));
        assert!(!is_clock_time(""));
    }

    #[test]
    fn range_overlap() {
        let a = TimeRange::from_clock("10:00", "11:00");
        let b = TimeRange::from_clock("10:30", "11:30");
        let c = TimeRange::from_clock("11:00", "12:00");
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c)); // adjacent, not overlapping
        assert!(!c.overlaps(&a));
    }

    #[test]
    fn range_containment_is_closed() {
        let outer = TimeRange::from_clock("18:00", "22:00");
        assert!(outer.contains(&TimeRange::from_clock("18:00", "22:00")));
        assert!(outer.contains(&TimeRange::from_clock("19:00", "20:00")));
        assert!(!outer.contains(&TimeRange::from_clock("19:00", "22:01")));
        assert!(!outer.contains(&TimeRange::from_clock("17:59", "20:00")));
    }

    #[test]
    fn status_blocks_slot() {
        assert!(BookingStatus::Pending.blocks_slot());
        assert!(BookingStatus::Confirmed.blocks_slot());
        assert!(!BookingStatus::Cancelled.blocks_slot());
        assert!(!BookingStatus::Completed.blocks_slot());
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&BookingStatus::Confirmed).unwrap(),
            "\"confirmed\""
        );
        let s: BookingStatus = serde_json::from_str("\"cancelled\"").unwrap();
        assert_eq!(s, BookingStatus::Cancelled);
    }
}
