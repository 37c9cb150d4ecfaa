//! Formatting helpers for terminal output.

use crate::types::local_now;
use chrono::NaiveDateTime;

/// Format a timestamp as relative time (e.g., "2m ago").
pub fn format_relative_time(ts: NaiveDateTime) -> String {
    format_relative_time_from(ts, local_now())
}

fn format_relative_time_from(ts: NaiveDateTime, now: NaiveDateTime) -> String {
    let duration = now.signed_duration_since(ts);

    if duration.num_seconds() < 0 {
        "just now".to_string()
    } else if duration.num_seconds() < 60 {
        format!("{}s ago", duration.num_seconds())
    } else if duration.num_minutes() < 60 {
        format!("{}m ago", duration.num_minutes())
    } else if duration.num_hours() < 24 {
        format!("{}h ago", duration.num_hours())
    } else if duration.num_days() < 7 {
        format!("{}d ago", duration.num_days())
    } else {
        ts.format("%b %d").to_string()
    }
}

/// Signed percent change, or "n/a" without a baseline.
pub fn format_change_percent(change: Option<f64>) -> String {
    match change {
        Some(pct) => format!("{:+.1}%", pct),
        None => "n/a".to_string(),
    }
}

/// Session length as "1h 05m" or "12.5m".
pub fn format_minutes(minutes: f64) -> String {
    if minutes < 60.0 {
        return format!("{:.1}m", minutes);
    }
    let total = minutes.round() as i64;
    format!("{}h {:02}m", total / 60, total % 60)
}

/// Cut `text` to at most `max` characters, ending in "..." when shortened.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let keep = max.saturating_sub(3);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 20)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_relative_time() {
        let now = noon();
        assert_eq!(format_relative_time_from(now + Duration::seconds(5), now), "just now");
        assert_eq!(format_relative_time_from(now - Duration::seconds(30), now), "30s ago");
        assert_eq!(format_relative_time_from(now - Duration::minutes(5), now), "5m ago");
        assert_eq!(format_relative_time_from(now - Duration::hours(3), now), "3h ago");
        assert_eq!(format_relative_time_from(now - Duration::days(2), now), "2d ago");
        assert_eq!(format_relative_time_from(now - Duration::days(10), now), "May 10");
    }

    #[test]
    fn test_change_percent() {
        assert_eq!(format_change_percent(Some(50.0)), "+50.0%");
        assert_eq!(format_change_percent(Some(-12.34)), "-12.3%");
        assert_eq!(format_change_percent(None), "n/a");
    }

    #[test]
    fn test_minutes() {
        assert_eq!(format_minutes(12.5), "12.5m");
        assert_eq!(format_minutes(65.0), "1h 05m");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a long command line", 10), "a long ...");
        assert_eq!(truncate("héllo wörld", 8), "héllo...");
    }
}
