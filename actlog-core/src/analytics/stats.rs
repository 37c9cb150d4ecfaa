//! Store-wide totals for the statistics view.

use super::patterns::{CommandPattern, FilePattern};
use crate::db::Database;
use crate::error::Result;
use crate::types::EventType;
use serde::Serialize;

/// Rows in each top list
pub const STATS_TOP_N: usize = 5;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EventStatistics {
    pub total_events: i64,
    pub bash_commands: i64,
    pub processes: i64,
    pub file_accesses: i64,
    pub top_commands: Vec<CommandPattern>,
    pub top_files: Vec<FilePattern>,
}

impl EventStatistics {
    /// Totals for the whole store; zeros if the store can't be read.
    pub fn compute(db: &Database) -> Self {
        Self::try_compute(db).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to compute event statistics");
            Self::default()
        })
    }

    fn try_compute(db: &Database) -> Result<Self> {
        let by_type = db.count_by_type()?;
        let count_of = |t: EventType| by_type.get(t.as_str()).copied().unwrap_or(0);

        let top_commands = db
            .top_details(&EventType::BashCommand, STATS_TOP_N)?
            .into_iter()
            .map(|(command, count)| CommandPattern { command, count })
            .collect();
        let top_files = db
            .top_details(&EventType::FileAccess, STATS_TOP_N)?
            .into_iter()
            .map(|(path, count)| FilePattern { path, count })
            .collect();

        Ok(Self {
            total_events: by_type.values().sum(),
            bash_commands: count_of(EventType::BashCommand),
            processes: count_of(EventType::RunningProcess),
            file_accesses: count_of(EventType::FileAccess),
            top_commands,
            top_files,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NewEvent;

    #[test]
    fn test_compute() {
        let db = Database::open_in_memory().unwrap();
        db.migrate().unwrap();
        for cmd in ["ls", "ls", "cd", "vim", "make", "cargo", "git"] {
            db.append(&NewEvent::new(EventType::BashCommand, cmd)).unwrap();
        }
        db.append(&NewEvent::new(EventType::FileAccess, "/a.rs")).unwrap();
        db.append(&NewEvent::new(EventType::RunningProcess, "{}")).unwrap();
        db.append(&NewEvent::new(EventType::LoggedUser, "me")).unwrap();

        let stats = EventStatistics::compute(&db);
        assert_eq!(stats.total_events, 10);
        assert_eq!(stats.bash_commands, 7);
        assert_eq!(stats.file_accesses, 1);
        assert_eq!(stats.processes, 1);
        assert_eq!(stats.top_commands.len(), STATS_TOP_N);
        assert_eq!(stats.top_commands[0].command, "ls");
        assert_eq!(stats.top_commands[0].count, 2);
        assert_eq!(stats.top_files[0].path, "/a.rs");
    }

    #[test]
    fn test_compute_without_schema_is_zero() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(EventStatistics::compute(&db), EventStatistics::default());
    }
}
