//! Week-over-week event counts.
//!
//! Weeks start at local midnight on Monday. "This week" runs from that
//! boundary to now; "last week" is the seven days before it.

use chrono::{Datelike, Duration, NaiveDateTime, NaiveTime};
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WeeklyComparison {
    pub this_week: i64,
    pub last_week: i64,
    /// Percent change rounded to one decimal, `None` without a baseline
    pub change_percent: Option<f64>,
}

impl WeeklyComparison {
    pub fn new(this_week: i64, last_week: i64) -> Self {
        Self {
            this_week,
            last_week,
            change_percent: change_percent(this_week, last_week),
        }
    }
}

/// `(start_of_this_week, start_of_last_week)` for a given instant.
pub fn week_bounds(now: NaiveDateTime) -> (NaiveDateTime, NaiveDateTime) {
    let days_since_monday = i64::from(now.weekday().num_days_from_monday());
    let this_week = (now.date() - Duration::days(days_since_monday)).and_time(NaiveTime::MIN);
    (this_week, this_week - Duration::days(7))
}

fn change_percent(this_week: i64, last_week: i64) -> Option<f64> {
    if last_week <= 0 {
        return None;
    }
    let change = 100.0 * (this_week - last_week) as f64 / last_week as f64;
    Some((change * 10.0).round() / 10.0)
}
