//! Activity collectors
//!
//! Each collector takes a snapshot of one activity source and turns it into
//! [`NewEvent`]s; [`Collector::collect_and_save`] forwards them to an
//! [`EventSink`], normally the [`Database`].
//!
//! Collectors never fail their caller: a source that can't be read (missing
//! history file, `lsof` not installed, ...) is logged and yields an empty
//! batch.
//!
//! | Collector | Source | Event type | Hashed |
//! |-----------|--------|------------|--------|
//! | [`BashHistoryCollector`] | `~/.bash_history` | `bash_command` | no |
//! | [`ProcessCollector`] | process table (`sysinfo`) | `running_process` | no |
//! | [`UserCollector`] | `w -h` | `logged_user` | no |
//! | [`OpenFileCollector`] | `lsof -u $USER -F n` | `file_access` | yes |

mod bash_history;
mod files;
mod process;
mod scheduler;
mod users;

pub use bash_history::BashHistoryCollector;
pub use files::{parse_lsof_names, OpenFileCollector};
pub use process::{ProcessCollector, ProcessInfo};
pub use scheduler::PeriodicCollector;
pub use users::UserCollector;

use crate::config::CollectionConfig;
use crate::db::Database;
use crate::error::{Error, Result};
use crate::types::{EventType, NewEvent};
use serde::Serialize;

/// Destination for collected events.
///
/// `save` returns `true` only when the event was actually recorded.
pub trait EventSink {
    fn save(&mut self, event: NewEvent) -> bool;
}

impl EventSink for &Database {
    fn save(&mut self, event: NewEvent) -> bool {
        self.save_event(&event)
    }
}

impl<F> EventSink for F
where
    F: FnMut(NewEvent) -> bool,
{
    fn save(&mut self, event: NewEvent) -> bool {
        self(event)
    }
}

/// A source of activity events.
pub trait Collector: Send + Sync {
    /// Short name used in logs and CLI output
    fn name(&self) -> &'static str;

    /// Type tag of the events this collector produces
    fn event_type(&self) -> EventType;

    /// Snapshot the source, returning at most `limit` events.
    fn gather(&self, limit: usize) -> Result<Vec<NewEvent>>;

    /// Gather and forward to `sink`; returns the number actually inserted.
    fn collect_and_save(&self, sink: &mut dyn EventSink, limit: usize) -> usize {
        if limit == 0 {
            return 0;
        }

        let events = match self.gather(limit) {
            Ok(events) => events,
            Err(e) => {
                tracing::warn!(collector = self.name(), error = %e, "Collection failed");
                return 0;
            }
        };

        let gathered = events.len();
        let mut inserted = 0;
        for event in events {
            if sink.save(event) {
                inserted += 1;
            }
        }

        tracing::debug!(collector = self.name(), gathered, inserted, "Collection finished");
        inserted
    }
}

/// Inserted count for one collector in a cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionSummary {
    pub collector: &'static str,
    pub inserted: usize,
}

/// The built-in collectors paired with their per-cycle limits.
pub fn default_collectors(config: &CollectionConfig) -> Vec<(Box<dyn Collector>, usize)> {
    vec![
        (
            Box::new(BashHistoryCollector::new(config.history_path())) as Box<dyn Collector>,
            config.bash_commands,
        ),
        (Box::new(ProcessCollector::new()), config.processes),
        (Box::new(UserCollector::new()), usize::MAX),
        (Box::new(OpenFileCollector::new()), config.files),
    ]
}

/// Run every built-in collector once.
pub fn collect_all(sink: &mut dyn EventSink, config: &CollectionConfig) -> Vec<CollectionSummary> {
    let mut summaries = Vec::new();
    for (collector, limit) in default_collectors(config) {
        summaries.push(CollectionSummary {
            collector: collector.name(),
            inserted: collector.collect_and_save(&mut *sink, limit),
        });
    }

    let total: usize = summaries.iter().map(|s| s.inserted).sum();
    tracing::info!(total, "Collection cycle complete");
    summaries
}

/// Run an external command and return its stdout as lossy UTF-8.
pub(crate) fn run_command(program: &str, args: &[&str]) -> Result<String> {
    let output = std::process::Command::new(program)
        .args(args)
        .stderr(std::process::Stdio::null())
        .output()
        .map_err(|e| Error::Collector(format!("failed to run {}: {}", program, e)))?;

    if !output.status.success() && output.stdout.is_empty() {
        return Err(Error::Collector(format!(
            "{} exited with {}",
            program, output.status
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Trimmed, non-empty lines.
pub(crate) fn non_empty_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines().map(str::trim).filter(|line| !line.is_empty())
}
