//! Plain-text rendering of reports for the terminal.

use actlog_core::analytics::{EventStatistics, SummaryReport};
use actlog_core::format::{format_change_percent, format_minutes, format_relative_time, truncate};
use actlog_core::{format_timestamp, ActivityEvent};
use std::fmt::Write;

const DETAIL_WIDTH: usize = 80;

/// Sessions listed in the text report (newest last)
const RECENT_SESSIONS: usize = 5;

pub fn event_line(event: &ActivityEvent) -> String {
    format!(
        "{:>6}  {}  {:<10}  {:<16}  {}",
        event.id,
        format_timestamp(&event.timestamp),
        format_relative_time(event.timestamp),
        event.event_type,
        truncate(&event.details, DETAIL_WIDTH)
    )
}

pub fn report(report: &SummaryReport) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Activity report ({})", format_timestamp(&report.generated_at));
    let _ = writeln!(out);
    let _ = writeln!(out, "Productivity score: {}/100", report.productivity_score);

    let weekly = &report.weekly;
    let _ = writeln!(
        out,
        "This week: {} events, last week: {} ({})",
        weekly.this_week,
        weekly.last_week,
        format_change_percent(weekly.change_percent)
    );

    if !report.top_hours.is_empty() {
        let hours: Vec<String> = report
            .top_hours
            .iter()
            .map(|h| format!("{}:00 ({})", h.hour, h.count))
            .collect();
        let _ = writeln!(out, "Most active hours: {}", hours.join(", "));
    }

    if !report.command_patterns.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Top commands:");
        for pattern in &report.command_patterns {
            let _ = writeln!(
                out,
                "  {:>5}  {}",
                pattern.count,
                truncate(&pattern.command, DETAIL_WIDTH)
            );
        }
    }

    let files = &report.file_patterns;
    if !files.top_files.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Top files:");
        for file in &files.top_files {
            let _ = writeln!(out, "  {:>5}  {}", file.count, truncate(&file.path, DETAIL_WIDTH));
        }
        let types: Vec<String> = files
            .file_types
            .iter()
            .map(|t| format!("{} ({})", t.extension, t.files))
            .collect();
        let _ = writeln!(out, "  File types: {}", types.join(", "));
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Work sessions: {}", report.sessions.len());
    let skip = report.sessions.len().saturating_sub(RECENT_SESSIONS);
    for session in &report.sessions[skip..] {
        let _ = writeln!(
            out,
            "  {} - {}  {:>8}  {} events",
            format_timestamp(&session.start),
            session.end.format("%H:%M:%S"),
            format_minutes(session.duration_minutes),
            session.event_count
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Insights:");
    for insight in &report.insights {
        let _ = writeln!(out, "  {}", insight);
    }

    out
}

pub fn stats(stats: &EventStatistics) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Total events:     {}", stats.total_events);
    let _ = writeln!(out, "Shell commands:   {}", stats.bash_commands);
    let _ = writeln!(out, "Process samples:  {}", stats.processes);
    let _ = writeln!(out, "File accesses:    {}", stats.file_accesses);

    if !stats.top_commands.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Top commands:");
        for pattern in &stats.top_commands {
            let _ = writeln!(out, "  {:>5}  {}", pattern.count, truncate(&pattern.command, DETAIL_WIDTH));
        }
    }

    if !stats.top_files.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Top files:");
        for file in &stats.top_files {
            let _ = writeln!(out, "  {:>5}  {}", file.count, truncate(&file.path, DETAIL_WIDTH));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use actlog_core::analytics::{CommandPattern, WeeklyComparison};
    use actlog_core::analytics::{FilePatterns, HourActivity, Insight};
    use actlog_core::analytics::generate_insights;
    use chrono::NaiveDate;

    #[test]
    fn test_report_text() {
        let generated_at = NaiveDate::from_ymd_opt(2024, 5, 8)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let insights: Vec<Insight> = generate_insights(10, &[], &["09".to_string()], 120);
        let report = SummaryReport {
            generated_at,
            productivity_score: 10,
            top_hours: vec![HourActivity {
                hour: "09".to_string(),
                count: 4,
            }],
            command_patterns: vec![CommandPattern {
                command: "ls".to_string(),
                count: 3,
            }],
            file_patterns: FilePatterns::default(),
            weekly: WeeklyComparison::new(5, 0),
            sessions: vec![],
            insights,
        };

        let text = super::report(&report);
        assert!(text.contains("Productivity score: 10/100"));
        assert!(text.contains("last week: 0 (n/a)"));
        assert!(text.contains("Most active hours: 09:00 (4)"));
        assert!(text.contains("Top commands:"));
        assert!(!text.contains("Top files:"));
        assert!(text.contains("Timing: You are most active around hours: 09."));
    }

    #[test]
    fn test_stats_text() {
        let text = super::stats(&EventStatistics::default());
        assert!(text.contains("Total events:     0"));
        assert!(!text.contains("Top commands:"));
    }
}
