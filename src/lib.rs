//! Booking-rules core for a venue-rental marketplace: conflict detection
//! against existing and recurring bookings, availability-block coverage,
//! venue policy normalization and enforcement (lead time, cutoffs, blackout
//! and holiday dates, operating hours), and a configuration-completeness
//! score for the admin side.
//!
//! The rules in [`rules`] are pure, synchronous functions over row snapshots.
//! [`store`] is the seam to the external row-store, [`service`] the
//! request-scoped orchestration the HTTP layer calls.

pub mod config;
pub mod model;
pub mod rules;
pub mod service;
pub mod store;

pub use config::{HourWindow, RawHourWindow, RawVenueConfig, VenueConfig};
pub use model::{
    AvailabilityBlock, Booking, BookingCandidate, BookingStatus, RecurringBooking, TimeRange, Venue,
};
pub use rules::{
    CompletenessReport, ConflictKind, ConflictReport, PolicyViolation, assess_completeness,
    detect_conflicts, evaluate_policy, normalize_config,
};
pub use service::{BookingAssessment, BookingService, ServiceError};
pub use store::{MemoryStore, StoreError, VenueStore};
