//! Analytics module for actlog
//!
//! Derived views over the event store:
//! - Work sessions (gap-based segmentation)
//! - Productivity score (density and continuity over a trailing window)
//! - Command, file and hour-of-day frequency tables
//! - Week-over-week comparison
//! - Rule-based insights
//!
//! The pure computations live in their own modules and take plain values;
//! [`AnalyticsEngine`] wires them to the [`crate::Database`] queries.

pub mod engine;
pub mod insights;
pub mod patterns;
pub mod score;
pub mod sessions;
pub mod stats;
pub mod weekly;

pub use engine::{AnalyticsEngine, HourActivity, SummaryReport};
pub use insights::{generate_insights, Insight, InsightCategory};
pub use patterns::{extension_breakdown, CommandPattern, ExtensionCount, FilePattern, FilePatterns};
pub use score::productivity_score;
pub use sessions::{segment_sessions, WorkSession};
pub use stats::EventStatistics;
pub use weekly::{week_bounds, WeeklyComparison};
