use ulid::Ulid;

use crate::config::{
    DEFAULT_REVIEW_CADENCE_DAYS, HourWindow, MIN_REVIEW_CADENCE_DAYS, RawHourWindow,
    RawVenueConfig, VenueConfig,
};
use crate::model::is_clock_time;

/// `HH:MM` → `HH:MM:SS`; valid `HH:MM:SS` passes through. Anything else is
/// returned unchanged — shape validation happened upstream, and what slipped
/// past it is handled by the per-field checks below, not here.
pub fn normalize_clock(t: &str) -> String {
    if is_clock_time(t) && t.len() == 5 {
        format!("{t}:00")
    } else {
        t.to_string()
    }
}

/// Build the fully-defaulted, validated policy for a venue from whatever row
/// the store holds (or none at all).
///
/// Invalid operating-hour windows are dropped silently: a corrupt window in
/// a persisted admin row degrades that one window, never the whole read.
/// Numeric fields are floored at their valid minimum, and the drop-in price
/// survives only if it coerces to a finite positive number.
pub fn normalize_config(venue_id: Ulid, raw: Option<&RawVenueConfig>) -> VenueConfig {
    let Some(raw) = raw else {
        return VenueConfig::defaults(venue_id);
    };

    let mut windows: Vec<HourWindow> = raw
        .operating_hours
        .iter()
        .filter_map(validate_window)
        .collect();
    // Fixed-width digit strings, so lexicographic order is chronological.
    windows.sort();
    windows.dedup();

    VenueConfig {
        venue_id,
        drop_in_enabled: raw.drop_in_enabled.unwrap_or(false),
        drop_in_price: coerce_price(raw.drop_in_price.as_ref()),
        min_advance_lead_time_hours: raw.min_advance_lead_time_hours.unwrap_or(0).max(0),
        // Same posture as invalid windows: a cutoff that is still not a
        // full clock string after normalization is dropped, not kept.
        same_day_cutoff_time: raw
            .same_day_cutoff_time
            .as_deref()
            .map(normalize_clock)
            .filter(|t| is_full_clock(t)),
        operating_hours: windows,
        blackout_dates: raw.blackout_dates.clone(),
        holiday_dates: raw.holiday_dates.clone(),
        insurance_required: raw.insurance_required.unwrap_or(false),
        insurance_document_types: raw.insurance_document_types.clone(),
        insurance_requires_manual_approval: raw
            .insurance_requires_manual_approval
            .unwrap_or(true),
        review_cadence_days: raw
            .review_cadence_days
            .unwrap_or(DEFAULT_REVIEW_CADENCE_DAYS)
            .max(MIN_REVIEW_CADENCE_DAYS),
        last_reviewed_at: raw.last_reviewed_at,
    }
}

fn validate_window(raw: &RawHourWindow) -> Option<HourWindow> {
    let day = raw.day_of_week?;
    if !(0..=6).contains(&day) {
        return None;
    }
    let start = normalize_clock(raw.start_time.as_deref()?);
    let end = normalize_clock(raw.end_time.as_deref()?);
    if !is_full_clock(&start) || !is_full_clock(&end) || start >= end {
        return None;
    }
    Some(HourWindow {
        day_of_week: day as u8,
        start_time: start,
        end_time: end,
    })
}

fn is_full_clock(t: &str) -> bool {
    t.len() == 8 && is_clock_time(t)
}

/// Best-effort numeric coercion for the loosely-typed price column: JSON
/// numbers and numeric strings count, everything else is absent. Only finite
/// positive values survive.
fn coerce_price(value: Option<&serde_json::Value>) -> Option<f64> {
    let n = match value? {
        serde_json::Value::Number(n) => n.as_f64()?,
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    (n.is_finite() && n > 0.0).then_some(n)
}
