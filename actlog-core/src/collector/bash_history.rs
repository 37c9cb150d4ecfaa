use super::{non_empty_lines, Collector};
use crate::error::Result;
use crate::types::{EventType, NewEvent};
use std::path::PathBuf;

/// Records the most recent lines of the shell history file.
///
/// History lines are not hashed: re-running the same command is new
/// activity, and the same tail is recorded again on every cycle.
pub struct BashHistoryCollector {
    history_file: PathBuf,
}

impl BashHistoryCollector {
    pub fn new(history_file: PathBuf) -> Self {
        Self { history_file }
    }
}

impl Collector for BashHistoryCollector {
    fn name(&self) -> &'static str {
        "bash_history"
    }

    fn event_type(&self) -> EventType {
        EventType::BashCommand
    }

    fn gather(&self, limit: usize) -> Result<Vec<NewEvent>> {
        if !self.history_file.exists() {
            tracing::debug!(path = %self.history_file.display(), "No shell history file");
            return Ok(Vec::new());
        }

        let bytes = std::fs::read(&self.history_file)?;
        let text = String::from_utf8_lossy(&bytes);
        let lines: Vec<&str> = non_empty_lines(&text).collect();
        let skip = lines.len().saturating_sub(limit);

        Ok(lines[skip..]
            .iter()
            .map(|line| NewEvent::new(EventType::BashCommand, *line))
            .collect())
    }
}
