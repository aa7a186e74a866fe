use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use dashmap::DashMap;
use tokio::sync::RwLock;
use ulid::Ulid;

use crate::config::RawVenueConfig;
use crate::model::{AvailabilityBlock, Booking, RecurringBooking, Venue};

#[derive(Debug)]
pub enum StoreError {
    VenueNotFound(Ulid),
    /// Row-store/network failure in a real backend implementation.
    Backend(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::VenueNotFound(id) => write!(f, "venue not found: {id}"),
            StoreError::Backend(e) => write!(f, "store backend error: {e}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// The row-store seam. Handlers get a request-scoped store handle injected
/// rather than reaching for a process-wide client singleton; the production
/// implementation wraps the managed database client, `MemoryStore` serves
/// tests and local runs.
///
/// Reads are day-scoped snapshots: the rules modules only ever look at one
/// venue/date at a time.
#[async_trait]
pub trait VenueStore: Send + Sync {
    async fn venue(&self, id: Ulid) -> Result<Option<Venue>, StoreError>;

    async fn bookings_on(&self, venue_id: Ulid, date: NaiveDate)
    -> Result<Vec<Booking>, StoreError>;

    async fn recurring_on(
        &self,
        venue_id: Ulid,
        date: NaiveDate,
    ) -> Result<Vec<RecurringBooking>, StoreError>;

    async fn blocks_on(
        &self,
        venue_id: Ulid,
        date: NaiveDate,
    ) -> Result<Vec<AvailabilityBlock>, StoreError>;

    /// The raw config row, if one has been persisted yet.
    async fn config(&self, venue_id: Ulid) -> Result<Option<RawVenueConfig>, StoreError>;

    /// Upsert keyed on venue id.
    async fn upsert_config(&self, venue_id: Ulid, raw: RawVenueConfig) -> Result<(), StoreError>;

    async fn insert_booking(&self, booking: Booking) -> Result<(), StoreError>;
}

/// Everything the store holds for one venue.
#[derive(Debug, Default)]
struct VenueState {
    venue: Option<Venue>,
    config: Option<RawVenueConfig>,
    bookings: Vec<Booking>,
    recurring: Vec<RecurringBooking>,
    blocks: Vec<AvailabilityBlock>,
}

type SharedVenueState = Arc<RwLock<VenueState>>;

/// In-memory [`VenueStore`]. Venue rows live behind per-venue locks so
/// concurrent requests against different venues never contend.
#[derive(Default)]
pub struct MemoryStore {
    venues: DashMap<Ulid, SharedVenueState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&self, venue_id: Ulid) -> SharedVenueState {
        self.venues.entry(venue_id).or_default().value().clone()
    }

    fn existing(&self, venue_id: Ulid) -> Option<SharedVenueState> {
        self.venues.get(&venue_id).map(|e| e.value().clone())
    }

    // ── Seeding ──────────────────────────────────────────────

    pub async fn add_venue(&self, venue: Venue) {
        let state = self.entry(venue.id);
        state.write().await.venue = Some(venue);
    }

    pub async fn add_booking(&self, booking: Booking) {
        let state = self.entry(booking.venue_id);
        state.write().await.bookings.push(booking);
    }

    pub async fn add_recurring(&self, recurring: RecurringBooking) {
        let state = self.entry(recurring.venue_id);
        state.write().await.recurring.push(recurring);
    }

    pub async fn add_block(&self, block: AvailabilityBlock) {
        let state = self.entry(block.venue_id);
        state.write().await.blocks.push(block);
    }
}

#[async_trait]
impl VenueStore for MemoryStore {
    async fn venue(&self, id: Ulid) -> Result<Option<Venue>, StoreError> {
        match self.existing(id) {
            Some(state) => Ok(state.read().await.venue.clone()),
            None => Ok(None),
        }
    }

    async fn bookings_on(
        &self,
        venue_id: Ulid,
        date: NaiveDate,
    ) -> Result<Vec<Booking>, StoreError> {
        let Some(state) = self.existing(venue_id) else {
            return Ok(Vec::new());
        };
        let guard = state.read().await;
        Ok(guard
            .bookings
            .iter()
            .filter(|b| b.date == date)
            .cloned()
            .collect())
    }

    async fn recurring_on(
        &self,
        venue_id: Ulid,
        date: NaiveDate,
    ) -> Result<Vec<RecurringBooking>, StoreError> {
        let Some(state) = self.existing(venue_id) else {
            return Ok(Vec::new());
        };
        let guard = state.read().await;
        Ok(guard
            .recurring
            .iter()
            .filter(|r| r.date == date)
            .cloned()
            .collect())
    }

    async fn blocks_on(
        &self,
        venue_id: Ulid,
        date: NaiveDate,
    ) -> Result<Vec<AvailabilityBlock>, StoreError> {
        let Some(state) = self.existing(venue_id) else {
            return Ok(Vec::new());
        };
        let guard = state.read().await;
        Ok(guard
            .blocks
            .iter()
            .filter(|b| b.date == date)
            .cloned()
            .collect())
    }

    async fn config(&self, venue_id: Ulid) -> Result<Option<RawVenueConfig>, StoreError> {
        match self.existing(venue_id) {
            Some(state) => Ok(state.read().await.config.clone()),
            None => Ok(None),
        }
    }

    async fn upsert_config(&self, venue_id: Ulid, raw: RawVenueConfig) -> Result<(), StoreError> {
        let state = self.entry(venue_id);
        state.write().await.config = Some(raw);
        Ok(())
    }

    async fn insert_booking(&self, booking: Booking) -> Result<(), StoreError> {
        let state = self.entry(booking.venue_id);
        state.write().await.bookings.push(booking);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BookingStatus;
    use chrono::NaiveDate;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, d).unwrap()
    }

    fn booking(venue_id: Ulid, d: u32) -> Booking {
        Booking {
            id: Ulid::new(),
            venue_id,
            date: date(d),
            start_time: "10:00:00".into(),
            end_time: "11:00:00".into(),
            status: BookingStatus::Confirmed,
        }
    }

    #[tokio::test]
    async fn reads_are_scoped_to_venue_and_date() {
        let store = MemoryStore::new();
        let vid = Ulid::new();
        store.add_booking(booking(vid, 21)).await;
        store.add_booking(booking(vid, 22)).await;
        store.add_booking(booking(Ulid::new(), 21)).await;

        let rows = store.bookings_on(vid, date(21)).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].date, date(21));
    }

    #[tokio::test]
    async fn unknown_venue_reads_empty() {
        let store = MemoryStore::new();
        let vid = Ulid::new();
        assert!(store.bookings_on(vid, date(21)).await.unwrap().is_empty());
        assert!(store.blocks_on(vid, date(21)).await.unwrap().is_empty());
        assert!(store.config(vid).await.unwrap().is_none());
        assert!(store.venue(vid).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn upsert_config_overwrites() {
        let store = MemoryStore::new();
        let vid = Ulid::new();
        let first = RawVenueConfig {
            review_cadence_days: Some(7),
            ..Default::default()
        };
        let second = RawVenueConfig {
            review_cadence_days: Some(14),
            ..Default::default()
        };
        store.upsert_config(vid, first).await.unwrap();
        store.upsert_config(vid, second).await.unwrap();
        let stored = store.config(vid).await.unwrap().unwrap();
        assert_eq!(stored.review_cadence_days, Some(14));
    }
}
