use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::{debug, info};
use ulid::Ulid;

use crate::config::{RawVenueConfig, VenueConfig};
use crate::model::{Booking, BookingCandidate, BookingStatus};
use crate::rules::{
    CompletenessReport, ConflictReport, PolicyViolation, assess_completeness, detect_conflicts,
    evaluate_policy, normalize_config,
};
use crate::store::{StoreError, VenueStore};

#[derive(Debug)]
pub enum ServiceError {
    VenueNotFound(Ulid),
    /// The candidate collides with existing rows.
    Conflict(ConflictReport),
    /// The candidate breaks venue policy.
    Policy(PolicyViolation),
    Store(StoreError),
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceError::VenueNotFound(id) => write!(f, "venue not found: {id}"),
            ServiceError::Conflict(report) => write!(
                f,
                "booking conflict: {}",
                report.message.as_deref().unwrap_or("slot unavailable")
            ),
            ServiceError::Policy(v) => write!(f, "policy violation: {v}"),
            ServiceError::Store(e) => write!(f, "store error: {e}"),
        }
    }
}

impl std::error::Error for ServiceError {}

impl From<StoreError> for ServiceError {
    fn from(e: StoreError) -> Self {
        ServiceError::Store(e)
    }
}

/// Combined verdict for the pre-booking check endpoint: the conflict report
/// always, plus the first policy violation if any. Serialized as-is.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingAssessment {
    pub conflict: ConflictReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy_violation: Option<PolicyViolation>,
}

impl BookingAssessment {
    pub fn is_bookable(&self) -> bool {
        !self.conflict.has_conflict && self.policy_violation.is_none()
    }
}

/// Request-scoped orchestration over a [`VenueStore`]: fetch the day's row
/// snapshots, run the pure rules, write results back. One instance per
/// backing store; handlers clone the `Arc` they wrap it in.
///
/// There is no atomicity between the conflict check and the insert — two
/// racing writers can both pass the check. The row-store's uniqueness
/// constraint is the backstop, exactly as with the managed backend.
pub struct BookingService<S> {
    store: S,
}

impl<S: VenueStore> BookingService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Evaluate a candidate without writing anything. `exclude_booking_id`
    /// lets an edit-in-place check skip the booking being edited.
    pub async fn assess(
        &self,
        candidate: &BookingCandidate,
        exclude_booking_id: Option<Ulid>,
        now: NaiveDateTime,
    ) -> Result<BookingAssessment, ServiceError> {
        let bookings = self
            .store
            .bookings_on(candidate.venue_id, candidate.date)
            .await?;
        let recurring = self
            .store
            .recurring_on(candidate.venue_id, candidate.date)
            .await?;
        let blocks = self
            .store
            .blocks_on(candidate.venue_id, candidate.date)
            .await?;

        let conflict = detect_conflicts(
            candidate,
            exclude_booking_id,
            &bookings,
            &recurring,
            &blocks,
        );

        let config = self.venue_config(candidate.venue_id).await?;
        let policy_violation = evaluate_policy(candidate, &config, now);

        if conflict.has_conflict {
            debug!(
                venue = %candidate.venue_id,
                date = %candidate.date,
                kind = ?conflict.conflict_type,
                "candidate conflicts"
            );
        } else if let Some(v) = &policy_violation {
            debug!(
                venue = %candidate.venue_id,
                date = %candidate.date,
                rule = v.code(),
                "candidate violates policy"
            );
        }

        Ok(BookingAssessment {
            conflict,
            policy_violation,
        })
    }

    /// Assess, then insert a pending booking. Rejections surface as
    /// [`ServiceError::Conflict`] / [`ServiceError::Policy`].
    pub async fn place_booking(
        &self,
        candidate: BookingCandidate,
        now: NaiveDateTime,
    ) -> Result<Booking, ServiceError> {
        let assessment = self.assess(&candidate, None, now).await?;
        if assessment.conflict.has_conflict {
            return Err(ServiceError::Conflict(assessment.conflict));
        }
        if let Some(v) = assessment.policy_violation {
            return Err(ServiceError::Policy(v));
        }

        let booking = Booking {
            id: Ulid::new(),
            venue_id: candidate.venue_id,
            date: candidate.date,
            start_time: candidate.start_time,
            end_time: candidate.end_time,
            status: BookingStatus::Pending,
        };
        self.store.insert_booking(booking.clone()).await?;
        info!(
            booking = %booking.id,
            venue = %booking.venue_id,
            date = %booking.date,
            "booking placed"
        );
        Ok(booking)
    }

    /// Normalize-on-read: venues without a persisted config row get the
    /// defaults.
    pub async fn venue_config(&self, venue_id: Ulid) -> Result<VenueConfig, ServiceError> {
        let raw = self.store.config(venue_id).await?;
        Ok(normalize_config(venue_id, raw.as_ref()))
    }

    /// Normalize an admin edit and persist the cleaned row.
    pub async fn save_config(
        &self,
        venue_id: Ulid,
        raw: &RawVenueConfig,
    ) -> Result<VenueConfig, ServiceError> {
        let config = normalize_config(venue_id, Some(raw));
        self.store
            .upsert_config(venue_id, RawVenueConfig::from(&config))
            .await?;
        info!(venue = %venue_id, "venue config saved");
        Ok(config)
    }

    /// The one path that refreshes `last_reviewed_at` — an explicit admin
    /// action, never a side effect of reads or edits.
    pub async fn mark_reviewed(
        &self,
        venue_id: Ulid,
        now: NaiveDateTime,
    ) -> Result<VenueConfig, ServiceError> {
        let mut config = self.venue_config(venue_id).await?;
        config.last_reviewed_at = Some(now);
        self.store
            .upsert_config(venue_id, RawVenueConfig::from(&config))
            .await?;
        info!(venue = %venue_id, "venue marked reviewed");
        Ok(config)
    }

    pub async fn completeness(
        &self,
        venue_id: Ulid,
        now: NaiveDateTime,
    ) -> Result<CompletenessReport, ServiceError> {
        let venue = self
            .store
            .venue(venue_id)
            .await?
            .ok_or(ServiceError::VenueNotFound(venue_id))?;
        let config = self.venue_config(venue_id).await?;
        Ok(assess_completeness(&venue, &config, now))
    }
}
