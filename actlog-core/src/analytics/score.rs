//! Productivity score.
//!
//! A 0-100 composite over a trailing window of `days`:
//!
//! - density: `min(1, events / (days * 20))`
//! - continuity: `min(1, active_hours / (days * 8))`
//! - score: `round(100 * (0.6 * density + 0.4 * continuity))`
//!
//! An active hour is a distinct (date, hour) bucket with at least one event.

/// Events per day that saturate the density term
pub const EVENTS_PER_DAY_TARGET: f64 = 20.0;

/// Active hours per day that saturate the continuity term
pub const ACTIVE_HOURS_PER_DAY_TARGET: f64 = 8.0;

const DENSITY_WEIGHT: f64 = 0.6;
const CONTINUITY_WEIGHT: f64 = 0.4;

/// Score from raw window totals. `days == 0` scores 0.
pub fn productivity_score(total_events: i64, active_hours: i64, days: u32) -> u8 {
    if days == 0 {
        return 0;
    }
    let days = f64::from(days);

    let density = (total_events.max(0) as f64 / (days * EVENTS_PER_DAY_TARGET)).min(1.0);
    let continuity = (active_hours.max(0) as f64 / (days * ACTIVE_HOURS_PER_DAY_TARGET)).min(1.0);

    let score = (100.0 * (DENSITY_WEIGHT * density + CONTINUITY_WEIGHT * continuity)).round();
    score.clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_events_scores_zero() {
        assert_eq!(productivity_score(0, 0, 7), 0);
    }

    #[test]
    fn test_zero_days_scores_zero() {
        assert_eq!(productivity_score(500, 40, 0), 0);
    }

    #[test]
    fn test_saturated_window_scores_hundred() {
        assert_eq!(productivity_score(140, 56, 7), 100);
        assert_eq!(productivity_score(10_000, 168, 7), 100);
    }

    #[test]
    fn test_partial_window() {
        // density 70/140 = 0.5, continuity 14/56 = 0.25 -> 30 + 10
        assert_eq!(productivity_score(70, 14, 7), 40);
    }

    #[test]
    fn test_rounds_to_nearest() {
        // density 1/20 = 0.05 -> 3.0, continuity 1/8 = 0.125 -> 5.0
        assert_eq!(productivity_score(1, 1, 1), 8);
        // density 3/20 -> 9.0, continuity 1/8 -> 5.0 => 14
        assert_eq!(productivity_score(3, 1, 1), 14);
    }
}
