//! Analytics engine over the event store.
//!
//! Every operation reads the store, derives its result with the pure
//! functions of the sibling modules, and degrades to an empty default when
//! a query fails. Failures are logged with the failing operation so an
//! all-zero report stays diagnosable.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use actlog_core::analytics::AnalyticsEngine;
//! use actlog_core::{Config, Database};
//!
//! let config = Config::load().expect("failed to load config");
//! let db = Database::open(&Config::database_path()).expect("failed to open database");
//! db.migrate().expect("failed to run migrations");
//!
//! let report = AnalyticsEngine::new(&db, config.analytics).generate_summary_report();
//! println!("score: {}", report.productivity_score);
//! ```

use super::insights::{generate_insights, Insight};
use super::patterns::{extension_breakdown, CommandPattern, FilePattern, FilePatterns};
use super::score::productivity_score;
use super::sessions::{segment_sessions, WorkSession};
use super::weekly::{week_bounds, WeeklyComparison};
use crate::config::AnalyticsConfig;
use crate::db::Database;
use crate::error::Result;
use crate::types::{local_now, EventType};
use chrono::{Duration, NaiveDateTime};
use serde::Serialize;

/// Event count for one hour of the day
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HourActivity {
    /// Two-digit hour, `"00"`..`"23"`
    pub hour: String,
    pub count: i64,
}

/// Everything the engine computes, in one snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryReport {
    pub generated_at: NaiveDateTime,
    pub productivity_score: u8,
    pub top_hours: Vec<HourActivity>,
    pub command_patterns: Vec<CommandPattern>,
    pub file_patterns: FilePatterns,
    pub weekly: WeeklyComparison,
    pub sessions: Vec<WorkSession>,
    pub insights: Vec<Insight>,
}

/// Read-only analytics over a [`Database`].
pub struct AnalyticsEngine<'a> {
    db: &'a Database,
    config: AnalyticsConfig,
    now: Option<NaiveDateTime>,
}

impl<'a> AnalyticsEngine<'a> {
    pub fn new(db: &'a Database, config: AnalyticsConfig) -> Self {
        Self {
            db,
            config,
            now: None,
        }
    }

    /// Pin "now" instead of reading the local clock.
    pub fn at(mut self, now: NaiveDateTime) -> Self {
        self.now = Some(now);
        self
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    fn now(&self) -> NaiveDateTime {
        self.now.unwrap_or_else(local_now)
    }

    /// Start of a trailing window; windows reaching past the calendar
    /// range start at its beginning.
    fn window_start(&self, days: u32) -> NaiveDateTime {
        self.now()
            .checked_sub_signed(Duration::days(i64::from(days)))
            .unwrap_or(NaiveDateTime::MIN)
    }

    /// Log a failed query and fall back to the default.
    fn or_default<T: Default>(operation: &str, result: Result<T>) -> T {
        result.unwrap_or_else(|e| {
            tracing::warn!(operation, error = %e, "Analytics query failed, using default");
            T::default()
        })
    }

    /// 0-100 score over the trailing `days`
    pub fn productivity_score(&self, days: u32) -> u8 {
        if days == 0 {
            return 0;
        }
        let since = self.window_start(days);
        let totals = self
            .db
            .count_since(since)
            .and_then(|total| Ok((total, self.db.count_active_hours(since)?)));

        match totals {
            Ok((total, active_hours)) => productivity_score(total, active_hours, days),
            Err(e) => {
                tracing::warn!(operation = "productivity_score", error = %e, "Analytics query failed, using default");
                0
            }
        }
    }

    /// Busiest hours of day over the trailing `days`
    pub fn most_productive_hours(&self, days: u32, n: usize) -> Vec<HourActivity> {
        let rows = Self::or_default(
            "most_productive_hours",
            self.db.hourly_activity(self.window_start(days), n),
        );
        rows.into_iter()
            .map(|(hour, count)| HourActivity { hour, count })
            .collect()
    }

    /// Most frequent shell commands
    pub fn command_patterns(&self, n: usize) -> Vec<CommandPattern> {
        let rows = Self::or_default(
            "command_patterns",
            self.db.top_details(&EventType::BashCommand, n),
        );
        rows.into_iter()
            .map(|(command, count)| CommandPattern { command, count })
            .collect()
    }

    /// Most frequently opened files and their extension mix
    pub fn file_patterns(&self, n: usize) -> FilePatterns {
        let rows = Self::or_default(
            "file_patterns",
            self.db.top_details(&EventType::FileAccess, n),
        );
        let top_files: Vec<FilePattern> = rows
            .into_iter()
            .map(|(path, count)| FilePattern { path, count })
            .collect();
        let file_types = extension_breakdown(&top_files);

        FilePatterns {
            top_files,
            file_types,
        }
    }

    /// Events this calendar week against the previous one
    pub fn weekly_comparison(&self) -> WeeklyComparison {
        let now = self.now();
        let (this_week_start, last_week_start) = week_bounds(now);
        let last_week_end = this_week_start - Duration::seconds(1);

        let counts = self
            .db
            .count_between(this_week_start, now)
            .and_then(|this| Ok((this, self.db.count_between(last_week_start, last_week_end)?)));

        match counts {
            Ok((this_week, last_week)) => WeeklyComparison::new(this_week, last_week),
            Err(e) => {
                tracing::warn!(operation = "weekly_comparison", error = %e, "Analytics query failed, using default");
                WeeklyComparison::default()
            }
        }
    }

    /// Sessions over the whole store, split on gaps larger than `gap`
    pub fn work_sessions(&self, gap: Duration) -> Vec<WorkSession> {
        let timestamps = Self::or_default("work_sessions", self.db.event_timestamps());
        segment_sessions(&timestamps, gap)
    }

    fn session_gap(&self) -> Duration {
        Duration::minutes(i64::from(self.config.session_gap_minutes))
    }

    /// Recommendations from the configured windows
    pub fn insights(&self) -> Vec<Insight> {
        let score = self.productivity_score(self.config.score_window_days);
        let sessions = self.work_sessions(self.session_gap());
        let hours = self.most_productive_hours(self.config.score_window_days, self.config.top_hours);
        self.build_insights(score, &sessions, &hours)
    }

    fn build_insights(
        &self,
        score: u8,
        sessions: &[WorkSession],
        hours: &[HourActivity],
    ) -> Vec<Insight> {
        let hour_labels: Vec<String> = hours.iter().map(|h| h.hour.clone()).collect();
        generate_insights(
            score,
            sessions,
            &hour_labels,
            self.config.long_session_minutes,
        )
    }

    /// Run every analysis once and collect the results.
    pub fn generate_summary_report(&self) -> SummaryReport {
        let generated_at = self.now();
        let engine = Self {
            db: self.db,
            config: self.config.clone(),
            now: Some(generated_at),
        };

        let days = engine.config.score_window_days;
        let productivity_score = engine.productivity_score(days);
        let top_hours = engine.most_productive_hours(days, engine.config.top_hours);
        let sessions = engine.work_sessions(engine.session_gap());
        let insights = engine.build_insights(productivity_score, &sessions, &top_hours);

        let report = SummaryReport {
            generated_at,
            productivity_score,
            top_hours,
            command_patterns: engine.command_patterns(engine.config.top_commands),
            file_patterns: engine.file_patterns(engine.config.top_files),
            weekly: engine.weekly_comparison(),
            sessions,
            insights,
        };

        tracing::debug!(
            score = report.productivity_score,
            sessions = report.sessions.len(),
            insights = report.insights.len(),
            "Summary report generated"
        );
        report
    }
}
