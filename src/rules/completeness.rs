use chrono::{Duration, NaiveDateTime};
use serde::Serialize;

use crate::config::VenueConfig;
use crate::model::Venue;

const CHECKLIST_LEN: usize = 9;

/// How fully configured a venue is, for the admin dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletenessReport {
    /// `round(100 * passed / 9)`.
    pub score: u8,
    /// Checklist keys that failed, in checklist order.
    pub missing_fields: Vec<&'static str>,
    pub review_due: bool,
    pub next_review_at: Option<NaiveDateTime>,
}

/// Run the fixed 9-item configuration checklist and the review-cadence
/// computation. `now` is venue-local wall-clock time.
///
/// A venue that has never been reviewed is always review-due, whatever its
/// cadence.
pub fn assess_completeness(
    venue: &Venue,
    config: &VenueConfig,
    now: NaiveDateTime,
) -> CompletenessReport {
    let checklist: [(&'static str, bool); CHECKLIST_LEN] = [
        (
            "hourly_rate",
            venue.hourly_rate.is_some_and(|r| r.is_finite() && r > 0.0),
        ),
        (
            "drop_in_price",
            !config.drop_in_enabled || config.drop_in_price.is_some(),
        ),
        ("operating_hours", !config.operating_hours.is_empty()),
        (
            "min_advance_lead_time_hours",
            config.min_advance_lead_time_hours >= 0,
        ),
        ("same_day_cutoff_time", config.same_day_cutoff_time.is_some()),
        ("amenities", !venue.amenities.is_empty()),
        ("review_cadence_days", config.review_cadence_days > 0),
        (
            "insurance_document_types",
            !config.insurance_required || !config.insurance_document_types.is_empty(),
        ),
        ("last_reviewed_at", config.last_reviewed_at.is_some()),
    ];

    let passed = checklist.iter().filter(|(_, ok)| *ok).count();
    let missing_fields: Vec<&'static str> = checklist
        .iter()
        .filter(|(_, ok)| !ok)
        .map(|(key, _)| *key)
        .collect();
    let score = (100.0 * passed as f64 / CHECKLIST_LEN as f64).round() as u8;

    let (review_due, next_review_at) = match config.last_reviewed_at {
        None => (true, None),
        Some(last) => {
            let next = last + Duration::days(config.review_cadence_days);
            (now >= next, Some(next))
        }
    };

    CompletenessReport {
        score,
        missing_fields,
        review_due,
        next_review_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use ulid::Ulid;

    fn venue() -> Venue {
        Venue {
            id: Ulid::new(),
            name: "Test Court".into(),
            hourly_rate: Some(80.0),
            amenities: vec!["parking".into()],
        }
    }

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn full_config(venue_id: Ulid) -> VenueConfig {
        VenueConfig {
            drop_in_enabled: true,
            drop_in_price: Some(15.0),
            same_day_cutoff_time: Some("14:00:00".into()),
            operating_hours: vec![crate::config::HourWindow {
                day_of_week: 1,
                start_time: "08:00:00".into(),
                end_time: "22:00:00".into(),
            }],
            insurance_required: true,
            insurance_document_types: vec!["liability".into()],
            last_reviewed_at: Some(at(2026, 2, 1, 9)),
            ..VenueConfig::defaults(venue_id)
        }
    }

    #[test]
    fn fully_configured_scores_100() {
        let v = venue();
        let cfg = full_config(v.id);
        let report = assess_completeness(&v, &cfg, at(2026, 2, 10, 12));
        assert_eq!(report.score, 100);
        assert!(report.missing_fields.is_empty());
        assert!(!report.review_due); // cadence 30d, reviewed 9 days ago
        assert_eq!(report.next_review_at, Some(at(2026, 3, 3, 9)));
    }

    #[test]
    fn defaults_report_missing_fields() {
        let v = Venue {
            id: Ulid::new(),
            name: "Bare Court".into(),
            hourly_rate: None,
            amenities: vec![],
        };
        let cfg = VenueConfig::defaults(v.id);
        let report = assess_completeness(&v, &cfg, at(2026, 2, 10, 12));
        assert_eq!(
            report.missing_fields,
            vec![
                "hourly_rate",
                "operating_hours",
                "same_day_cutoff_time",
                "amenities",
                "last_reviewed_at",
            ]
        );
        // 4 of 9 pass
        assert_eq!(report.score, 44);
        assert!(report.review_due);
        assert!(report.next_review_at.is_none());
    }

    #[test]
    fn drop_in_enabled_without_price_fails_that_check() {
        let v = venue();
        let mut cfg = full_config(v.id);
        cfg.drop_in_price = None;
        let report = assess_completeness(&v, &cfg, at(2026, 2, 10, 12));
        assert_eq!(report.missing_fields, vec!["drop_in_price"]);
        assert_eq!(report.score, 89);
    }

    #[test]
    fn never_reviewed_is_always_due() {
        let v = venue();
        let mut cfg = full_config(v.id);
        cfg.last_reviewed_at = None;
        cfg.review_cadence_days = 10_000;
        let report = assess_completeness(&v, &cfg, at(2026, 2, 10, 12));
        assert!(report.review_due);
        assert!(report.next_review_at.is_none());
    }

    #[test]
    fn review_due_at_exact_cadence_boundary() {
        let v = venue();
        let mut cfg = full_config(v.id);
        cfg.review_cadence_days = 9;
        // reviewed 2026-02-01 09:00, cadence 9d → due from 2026-02-10 09:00
        let report = assess_completeness(&v, &cfg, at(2026, 2, 10, 9));
        assert!(report.review_due);
        let report = assess_completeness(&v, &cfg, at(2026, 2, 10, 8));
        assert!(!report.review_due);
    }
}
