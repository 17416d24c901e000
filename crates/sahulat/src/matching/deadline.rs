use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

const NANOS_PER_DAY: i128 = 86_400_000_000_000;

pub const URGENT_WITHIN_DAYS: i64 = 7;
pub const WARNING_WITHIN_DAYS: i64 = 14;

/// Whole days from `now` until midnight at the start of `deadline`, rounded up.
///
/// Any fraction of a day left counts as a full day, so a deadline later today
/// reads as `1` and a deadline at today's midnight reads as `0`. Once the
/// midnight has passed the count goes negative.
pub fn days_until_deadline(deadline: NaiveDate, now: NaiveDateTime) -> i64 {
    let midnight = deadline.and_time(chrono::NaiveTime::MIN);
    let delta = midnight - now;
    // nanosecond count overflows past ~292 years; millisecond precision is plenty there
    let nanos = match delta.num_nanoseconds() {
        Some(nanos) => i128::from(nanos),
        None => i128::from(delta.num_milliseconds()) * 1_000_000,
    };
    let days = if nanos >= 0 {
        (nanos + NANOS_PER_DAY - 1) / NANOS_PER_DAY
    } else {
        // ceil for negatives is truncation toward zero
        nanos / NANOS_PER_DAY
    };
    days as i64
}

pub fn is_expired(days: i64) -> bool {
    days < 0
}

/// True for expired deadlines as well; use [`DeadlineUrgency::classify`]
/// when a single label is needed.
pub fn is_urgent(days: i64) -> bool {
    days <= URGENT_WITHIN_DAYS
}

pub fn is_warning(days: i64) -> bool {
    days > URGENT_WITHIN_DAYS && days <= WARNING_WITHIN_DAYS
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeadlineUrgency {
    Expired,
    Urgent,
    Warning,
    Normal,
}

impl DeadlineUrgency {
    pub fn classify(days: i64) -> Self {
        if is_expired(days) {
            Self::Expired
        } else if is_urgent(days) {
            Self::Urgent
        } else if is_warning(days) {
            Self::Warning
        } else {
            Self::Normal
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Expired => "Expired",
            Self::Urgent => "Closing soon",
            Self::Warning => "Closing in two weeks",
            Self::Normal => "Open",
        }
    }
}

/// Banner data for a scholarship card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeadlineStatus {
    pub days_remaining: i64,
    pub urgency: DeadlineUrgency,
}

impl DeadlineStatus {
    pub fn evaluate(deadline: NaiveDate, now: NaiveDateTime) -> Self {
        let days_remaining = days_until_deadline(deadline, now);
        Self {
            days_remaining,
            urgency: DeadlineUrgency::classify(days_remaining),
        }
    }
}
