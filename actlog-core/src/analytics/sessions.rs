//! Work session segmentation.
//!
//! A work session is a maximal run of events in which no two consecutive
//! events are further apart than the gap threshold. Sessions are derived on
//! demand and never persisted.

use chrono::{Duration, NaiveDateTime};
use serde::Serialize;

/// A derived run of activity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkSession {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// Minutes between first and last event, one decimal place
    pub duration_minutes: f64,
    pub event_count: usize,
}

impl WorkSession {
    fn open(at: NaiveDateTime) -> Self {
        Self {
            start: at,
            end: at,
            duration_minutes: 0.0,
            event_count: 1,
        }
    }

    fn extend(&mut self, at: NaiveDateTime) {
        self.end = at;
        self.event_count += 1;
    }

    fn close(mut self) -> Self {
        let seconds = (self.end - self.start).num_seconds() as f64;
        self.duration_minutes = (seconds / 60.0 * 10.0).round() / 10.0;
        self
    }
}

/// Split ascending timestamps into sessions separated by gaps above `gap`.
///
/// A gap exactly equal to `gap` keeps the session open.
pub fn segment_sessions(timestamps: &[NaiveDateTime], gap: Duration) -> Vec<WorkSession> {
    let mut sessions = Vec::new();
    let mut iter = timestamps.iter();

    let Some(first) = iter.next() else {
        return sessions;
    };
    let mut current = WorkSession::open(*first);

    for &ts in iter {
        if ts - current.end <= gap {
            current.extend(ts);
        } else {
            sessions.push(current.close());
            current = WorkSession::open(ts);
        }
    }
    sessions.push(current.close());

    sessions
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 6)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn test_empty_input() {
        assert!(segment_sessions(&[], Duration::minutes(30)).is_empty());
    }

    #[test]
    fn test_single_event_session() {
        let sessions = segment_sessions(&[at(9, 0)], Duration::minutes(30));
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].start, sessions[0].end);
        assert_eq!(sessions[0].duration_minutes, 0.0);
        assert_eq!(sessions[0].event_count, 1);
    }

    #[test]
    fn test_gap_splits_sessions() {
        let sessions = segment_sessions(
            &[at(10, 0), at(10, 10), at(10, 45), at(12, 0)],
            Duration::minutes(30),
        );

        let summary: Vec<_> = sessions
            .iter()
            .map(|s| (s.start, s.end, s.event_count))
            .collect();
        assert_eq!(
            summary,
            vec![
                (at(10, 0), at(10, 10), 2),
                (at(10, 45), at(10, 45), 1),
                (at(12, 0), at(12, 0), 1),
            ]
        );
        assert_eq!(sessions[0].duration_minutes, 10.0);
    }

    #[test]
    fn test_gap_equal_to_threshold_extends() {
        let sessions = segment_sessions(&[at(9, 0), at(9, 30), at(10, 0)], Duration::minutes(30));
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].event_count, 3);
        assert_eq!(sessions[0].duration_minutes, 60.0);
    }

    #[test]
    fn test_duration_rounded_to_one_decimal() {
        let start = at(9, 0);
        let end = start + Duration::seconds(100);
        let sessions = segment_sessions(&[start, end], Duration::minutes(30));
        assert_eq!(sessions[0].duration_minutes, 1.7);
    }
}
