use chrono::{Datelike, NaiveDateTime, NaiveTime, Timelike};
use serde::Serialize;

use crate::config::VenueConfig;
use crate::model::{BookingCandidate, Minutes, clock_minutes};

/// The first policy rule a candidate booking violates. Evaluation order is
/// fixed: lead time, same-day cutoff, blackout, holiday, operating hours.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum PolicyViolation {
    MinLeadTime { required_hours: i64 },
    SameDayCutoff { cutoff: String },
    Blackout { date: chrono::NaiveDate },
    Holiday { date: chrono::NaiveDate },
    OperatingHours { day_of_week: u8 },
}

impl PolicyViolation {
    /// Stable rule code for API payloads and logs.
    pub fn code(&self) -> &'static str {
        match self {
            PolicyViolation::MinLeadTime { .. } => "min_lead_time",
            PolicyViolation::SameDayCutoff { .. } => "same_day_cutoff",
            PolicyViolation::Blackout { .. } => "blackout",
            PolicyViolation::Holiday { .. } => "holiday",
            PolicyViolation::OperatingHours { .. } => "operating_hours",
        }
    }
}

impl std::fmt::Display for PolicyViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PolicyViolation::MinLeadTime { required_hours } => {
                write!(f, "bookings require at least {required_hours}h advance notice")
            }
            PolicyViolation::SameDayCutoff { cutoff } => {
                write!(f, "same-day bookings close at {cutoff}")
            }
            PolicyViolation::Blackout { date } => write!(f, "venue is blacked out on {date}"),
            PolicyViolation::Holiday { date } => write!(f, "venue is closed for holiday on {date}"),
            PolicyViolation::OperatingHours { day_of_week } => {
                write!(f, "outside operating hours for weekday {day_of_week}")
            }
        }
    }
}

/// Check `candidate` against the venue's normalized policy at wall-clock
/// time `now` (venue-local, naive). Returns the first violated rule, or
/// `None` when the booking is allowed.
///
/// An empty `operating_hours` list skips the hours check entirely:
/// unconfigured means unrestricted, not closed. A venue that wants to be
/// closed outright has to use blackout or holiday dates.
pub fn evaluate_policy(
    candidate: &BookingCandidate,
    config: &VenueConfig,
    now: NaiveDateTime,
) -> Option<PolicyViolation> {
    let start_minutes = clock_minutes(&candidate.start_time);
    let start_at = candidate
        .date
        .and_time(time_from_minutes(start_minutes));

    let hours_until = (start_at - now).num_minutes() as f64 / 60.0;
    if hours_until < config.min_advance_lead_time_hours as f64 {
        return Some(PolicyViolation::MinLeadTime {
            required_hours: config.min_advance_lead_time_hours,
        });
    }

    if let Some(cutoff) = &config.same_day_cutoff_time
        && candidate.date == now.date()
    {
        let now_minutes = (now.time().hour() * 60 + now.time().minute()) as Minutes;
        if now_minutes >= clock_minutes(cutoff) {
            return Some(PolicyViolation::SameDayCutoff {
                cutoff: cutoff.clone(),
            });
        }
    }

    if config.blackout_dates.contains(&candidate.date) {
        return Some(PolicyViolation::Blackout {
            date: candidate.date,
        });
    }

    if config.holiday_dates.contains(&candidate.date) {
        return Some(PolicyViolation::Holiday {
            date: candidate.date,
        });
    }

    if !config.operating_hours.is_empty() {
        let day = candidate.date.weekday().num_days_from_sunday() as u8;
        let range = candidate.time_range();
        let inside = config.operating_hours.iter().any(|w| {
            w.day_of_week == day
                && range.start >= clock_minutes(&w.start_time)
                && range.end <= clock_minutes(&w.end_time)
        });
        if !inside {
            return Some(PolicyViolation::OperatingHours { day_of_week: day });
        }
    }

    None
}

fn time_from_minutes(m: Minutes) -> NaiveTime {
    NaiveTime::from_num_seconds_from_midnight_opt(m as u32 * 60, 0)
        .unwrap_or(NaiveTime::MIN)
}
