//! Core domain types for actlog
//!
//! These types describe the single persisted entity, the activity event,
//! and the parameters used to append and query it.
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Event** | One recorded activity occurrence: a type tag plus free-text details |
//! | **Event type** | Open-ended tag (`bash_command`, `file_access`, `running_process`, `logged_user`, ...) |
//! | **Hash** | Fingerprint of `event_type` + `details`, used only to suppress repeats |
//! | **Work session** | Derived run of events with no large gap; never persisted (see [`crate::analytics`]) |
//!
//! Timestamps are local wall-clock time with second resolution. They are
//! stored as `YYYY-MM-DD HH:MM:SS` text so that lexical and chronological
//! order agree inside SQLite.

use chrono::{Local, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// On-disk timestamp format for `activity_log.timestamp`
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Current local time truncated to whole seconds.
pub fn local_now() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

/// Render a timestamp in the on-disk format.
pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a timestamp from the on-disk format.
pub fn parse_timestamp(value: &str) -> crate::Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT).map_err(|source| {
        crate::Error::Timestamp {
            value: value.to_string(),
            source,
        }
    })
}

// ============================================
// Event type
// ============================================

/// Kind of recorded activity.
///
/// The set is open-ended: unknown tags read back from the store are kept
/// verbatim in [`EventType::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventType {
    /// A line from the shell history
    BashCommand,
    /// A file held open by the user
    FileAccess,
    /// A process table snapshot entry
    RunningProcess,
    /// A logged-in user session line
    LoggedUser,
    /// Any other tag
    Other(String),
}

impl EventType {
    pub fn as_str(&self) -> &str {
        match self {
            EventType::BashCommand => "bash_command",
            EventType::FileAccess => "file_access",
            EventType::RunningProcess => "running_process",
            EventType::LoggedUser => "logged_user",
            EventType::Other(tag) => tag,
        }
    }
}

impl std::str::FromStr for EventType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "bash_command" => EventType::BashCommand,
            "file_access" => EventType::FileAccess,
            "running_process" => EventType::RunningProcess,
            "logged_user" => EventType::LoggedUser,
            other => EventType::Other(other.to_string()),
        })
    }
}

impl From<&str> for EventType {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(event_type) => event_type,
            Err(never) => match never {},
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl Serialize for EventType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EventType {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(EventType::from(tag.as_str()))
    }
}

// ============================================
// Events
// ============================================

/// A persisted row of `activity_log`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityEvent {
    /// Surrogate key, strictly increasing in insertion order
    pub id: i64,
    /// Local wall-clock time of insertion
    pub timestamp: NaiveDateTime,
    /// Type tag
    pub event_type: EventType,
    /// Free-text payload (command line, file path, JSON process info, ...)
    pub details: String,
    /// Dedup fingerprint, absent for event types that don't dedup
    pub hash: Option<String>,
    /// Reserved grouping key
    pub session_id: Option<String>,
}

/// An event about to be appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    pub event_type: EventType,
    pub details: String,
    pub hash: Option<String>,
    pub session_id: Option<String>,
}

impl NewEvent {
    /// Event without a dedup hash; every append inserts a row.
    pub fn new(event_type: EventType, details: impl Into<String>) -> Self {
        Self {
            event_type,
            details: details.into(),
            hash: None,
            session_id: None,
        }
    }

    /// Attach the content hash so repeats inside the dedup window are dropped.
    pub fn hashed(mut self) -> Self {
        self.hash = Some(crate::dedup::event_hash(
            self.event_type.as_str(),
            &self.details,
        ));
        self
    }

    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }
}

/// Result of an append.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    /// A row was written with this id
    Inserted(i64),
    /// An equal hash exists inside the dedup window; nothing was written
    Duplicate,
}

impl AppendOutcome {
    pub fn inserted(&self) -> bool {
        matches!(self, AppendOutcome::Inserted(_))
    }
}

// ============================================
// Query parameters
// ============================================

/// Sort direction on `timestamp` (ties broken by `id` in the same direction).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    pub(crate) fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "ASC",
            SortOrder::Descending => "DESC",
        }
    }
}

/// Filter for listing events.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Only events with this type tag
    pub event_type: Option<EventType>,
    /// Only events at or after this time
    pub since: Option<NaiveDateTime>,
    /// Only events at or before this time
    pub until: Option<NaiveDateTime>,
    /// Timestamp ordering
    pub order: SortOrder,
    /// Maximum number of events returned
    pub limit: Option<usize>,
}

impl EventFilter {
    /// Newest events first, at most `limit` of them.
    pub fn recent(limit: usize) -> Self {
        Self {
            order: SortOrder::Descending,
            limit: Some(limit),
            ..Default::default()
        }
    }

    pub fn of_type(mut self, event_type: EventType) -> Self {
        self.event_type = Some(event_type);
        self
    }
}
