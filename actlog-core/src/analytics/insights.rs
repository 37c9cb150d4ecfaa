//! Rule-based recommendations derived from the other analytics.

use super::sessions::WorkSession;
use serde::Serialize;

/// Score below this is "low activity"
pub const LOW_SCORE: u8 = 40;

/// Score at or above this is "high productivity"
pub const HIGH_SCORE: u8 = 70;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightCategory {
    Focus,
    Improve,
    Great,
    Break,
    Timing,
}

impl InsightCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightCategory::Focus => "Focus",
            InsightCategory::Improve => "Improve",
            InsightCategory::Great => "Great",
            InsightCategory::Break => "Break",
            InsightCategory::Timing => "Timing",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            InsightCategory::Focus => "⚠️",
            InsightCategory::Improve => "💡",
            InsightCategory::Great => "🎯",
            InsightCategory::Break => "⏰",
            InsightCategory::Timing => "📈",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Insight {
    pub icon: &'static str,
    pub category: InsightCategory,
    pub message: String,
}

impl Insight {
    fn new(category: InsightCategory, message: impl Into<String>) -> Self {
        Self {
            icon: category.icon(),
            category,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Insight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}: {}", self.icon, self.category.as_str(), self.message)
    }
}

/// Build the ordered insight list.
///
/// Rules in order: one score-tier message, a break warning if any session
/// lasted at least `long_session_minutes`, then the peak hours if known.
pub fn generate_insights(
    score: u8,
    sessions: &[WorkSession],
    top_hours: &[String],
    long_session_minutes: u32,
) -> Vec<Insight> {
    let mut insights = Vec::new();

    insights.push(if score < LOW_SCORE {
        Insight::new(
            InsightCategory::Focus,
            "Low activity: consider scheduling focused work blocks and reducing distractions.",
        )
    } else if score < HIGH_SCORE {
        Insight::new(
            InsightCategory::Improve,
            "Moderate activity: try breaking tasks into 25-50 minute sessions.",
        )
    } else {
        Insight::new(
            InsightCategory::Great,
            "High productivity: keep a similar cadence and take regular short breaks.",
        )
    });

    let threshold = f64::from(long_session_minutes);
    if sessions.iter().any(|s| s.duration_minutes >= threshold) {
        insights.push(Insight::new(
            InsightCategory::Break,
            "Detected long sessions: remember to take longer breaks to avoid burnout.",
        ));
    }

    if !top_hours.is_empty() {
        insights.push(Insight::new(
            InsightCategory::Timing,
            format!("You are most active around hours: {}.", top_hours.join(", ")),
        ));
    }

    insights
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn session(minutes: f64) -> WorkSession {
        let start = NaiveDate::from_ymd_opt(2024, 5, 6)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        WorkSession {
            start,
            end: start,
            duration_minutes: minutes,
            event_count: 2,
        }
    }

    fn categories(insights: &[Insight]) -> Vec<InsightCategory> {
        insights.iter().map(|i| i.category).collect()
    }

    #[test]
    fn test_score_tiers() {
        assert_eq!(categories(&generate_insights(0, &[], &[], 120)), vec![InsightCategory::Focus]);
        assert_eq!(categories(&generate_insights(39, &[], &[], 120)), vec![InsightCategory::Focus]);
        assert_eq!(categories(&generate_insights(40, &[], &[], 120)), vec![InsightCategory::Improve]);
        assert_eq!(categories(&generate_insights(69, &[], &[], 120)), vec![InsightCategory::Improve]);
        assert_eq!(categories(&generate_insights(70, &[], &[], 120)), vec![InsightCategory::Great]);
    }

    #[test]
    fn test_break_warning_emitted_once() {
        let sessions = vec![session(130.0), session(10.0), session(120.0)];
        let insights = generate_insights(50, &sessions, &[], 120);
        assert_eq!(
            categories(&insights),
            vec![InsightCategory::Improve, InsightCategory::Break]
        );

        let short = generate_insights(50, &[session(119.9)], &[], 120);
        assert_eq!(categories(&short), vec![InsightCategory::Improve]);
    }

    #[test]
    fn test_timing_lists_hours_in_order() {
        let hours = vec!["14".to_string(), "09".to_string()];
        let insights = generate_insights(80, &[session(200.0)], &hours, 120);

        assert_eq!(
            categories(&insights),
            vec![
                InsightCategory::Great,
                InsightCategory::Break,
                InsightCategory::Timing
            ]
        );
        assert_eq!(
            insights[2].message,
            "You are most active around hours: 14, 09."
        );
        assert_eq!(insights[2].icon, "📈");
    }
}
