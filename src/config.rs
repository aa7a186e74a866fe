use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Defaults applied when a venue has no persisted config row.
pub const DEFAULT_REVIEW_CADENCE_DAYS: i64 = 30;
pub const MIN_REVIEW_CADENCE_DAYS: i64 = 1;

/// One weekly operating window. `day_of_week` is 0–6 with Sunday = 0, and
/// `start_time < end_time` holds after normalization. A day may carry several
/// windows (split morning/evening hours); its open time is their union.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HourWindow {
    pub day_of_week: u8,
    pub start_time: String,
    pub end_time: String,
}

/// An operating window exactly as the row-store handed it over — every field
/// may be missing or junk. Windows failing validation are dropped during
/// normalization rather than failing the whole config read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawHourWindow {
    pub day_of_week: Option<i64>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

/// Per-venue policy row as persisted — a loosely-typed snapshot. Admin UIs
/// and seed scripts have written partial rows over time, so everything is
/// optional and `drop_in_price` is whatever JSON the row carries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawVenueConfig {
    pub drop_in_enabled: Option<bool>,
    pub drop_in_price: Option<serde_json::Value>,
    pub min_advance_lead_time_hours: Option<i64>,
    pub same_day_cutoff_time: Option<String>,
    pub operating_hours: Vec<RawHourWindow>,
    pub blackout_dates: Vec<NaiveDate>,
    pub holiday_dates: Vec<NaiveDate>,
    pub insurance_required: Option<bool>,
    pub insurance_document_types: Vec<String>,
    pub insurance_requires_manual_approval: Option<bool>,
    pub review_cadence_days: Option<i64>,
    pub last_reviewed_at: Option<NaiveDateTime>,
}

/// Fully-defaulted, validated venue policy. Produced by
/// [`normalize_config`](crate::rules::normalize_config); everything
/// downstream (policy evaluator, completeness scorer) assumes this shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VenueConfig {
    pub venue_id: Ulid,
    pub drop_in_enabled: bool,
    /// Finite and positive, or absent.
    pub drop_in_price: Option<f64>,
    /// Floored at 0.
    pub min_advance_lead_time_hours: i64,
    /// `HH:MM:SS`, or absent when no same-day cutoff applies.
    pub same_day_cutoff_time: Option<String>,
    /// Validated windows, sorted by `(day_of_week, start_time)`, deduplicated.
    pub operating_hours: Vec<HourWindow>,
    pub blackout_dates: Vec<NaiveDate>,
    pub holiday_dates: Vec<NaiveDate>,
    pub insurance_required: bool,
    pub insurance_document_types: Vec<String>,
    pub insurance_requires_manual_approval: bool,
    /// Floored at 1.
    pub review_cadence_days: i64,
    /// Refreshed only by an explicit admin review action, never implicitly.
    pub last_reviewed_at: Option<NaiveDateTime>,
}

impl VenueConfig {
    /// The config a venue gets before any row has been persisted for it.
    pub fn defaults(venue_id: Ulid) -> Self {
        Self {
            venue_id,
            drop_in_enabled: false,
            drop_in_price: None,
            min_advance_lead_time_hours: 0,
            same_day_cutoff_time: None,
            operating_hours: Vec::new(),
            blackout_dates: Vec::new(),
            holiday_dates: Vec::new(),
            insurance_required: false,
            insurance_document_types: Vec::new(),
            insurance_requires_manual_approval: true,
            review_cadence_days: DEFAULT_REVIEW_CADENCE_DAYS,
            last_reviewed_at: None,
        }
    }
}

impl From<&VenueConfig> for RawVenueConfig {
    /// The row shape written back on upsert. Round-tripping a normalized
    /// config through this and normalizing again is a no-op.
    fn from(cfg: &VenueConfig) -> Self {
        RawVenueConfig {
            drop_in_enabled: Some(cfg.drop_in_enabled),
            drop_in_price: cfg.drop_in_price.map(|p| serde_json::json!(p)),
            min_advance_lead_time_hours: Some(cfg.min_advance_lead_time_hours),
            same_day_cutoff_time: cfg.same_day_cutoff_time.clone(),
            operating_hours: cfg
                .operating_hours
                .iter()
                .map(|w| RawHourWindow {
                    day_of_week: Some(w.day_of_week as i64),
                    start_time: Some(w.start_time.clone()),
                    end_time: Some(w.end_time.clone()),
                })
                .collect(),
            blackout_dates: cfg.blackout_dates.clone(),
            holiday_dates: cfg.holiday_dates.clone(),
            insurance_required: Some(cfg.insurance_required),
            insurance_document_types: cfg.insurance_document_types.clone(),
            insurance_requires_manual_approval: Some(cfg.insurance_requires_manual_approval),
            review_cadence_days: Some(cfg.review_cadence_days),
            last_reviewed_at: cfg.last_reviewed_at,
        }
    }
}
