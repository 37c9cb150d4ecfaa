use super::Collector;
use crate::error::Result;
use crate::types::{EventType, NewEvent};
use serde::{Deserialize, Serialize};
use sysinfo::{System, Users};

/// Details payload of a `running_process` event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessInfo {
    pub user: String,
    /// CPU usage percent, one decimal
    pub cpu: String,
    /// Resident memory as percent of total, one decimal
    pub mem: String,
    pub command: String,
}

/// Records a snapshot of the process table, lowest pids first.
///
/// CPU usage needs two refreshes to be meaningful, so a single snapshot
/// mostly reports `0.0`.
#[derive(Default)]
pub struct ProcessCollector;

impl ProcessCollector {
    pub fn new() -> Self {
        Self
    }
}

impl Collector for ProcessCollector {
    fn name(&self) -> &'static str {
        "processes"
    }

    fn event_type(&self) -> EventType {
        EventType::RunningProcess
    }

    fn gather(&self, limit: usize) -> Result<Vec<NewEvent>> {
        let system = System::new_all();
        let users = Users::new_with_refreshed_list();
        let total_memory = system.total_memory().max(1) as f64;

        let mut processes: Vec<_> = system.processes().values().collect();
        processes.sort_by_key(|p| p.pid().as_u32());

        let mut events = Vec::new();
        for process in processes.into_iter().take(limit) {
            let user = process
                .user_id()
                .and_then(|uid| users.get_user_by_id(uid))
                .map(|u| u.name().to_string())
                .unwrap_or_else(|| "?".to_string());

            let cmd: Vec<String> = process
                .cmd()
                .iter()
                .map(|arg| arg.to_string_lossy().into_owned())
                .collect();
            let command = if cmd.is_empty() {
                process.name().to_string_lossy().into_owned()
            } else {
                cmd.join(" ")
            };

            let info = ProcessInfo {
                user,
                cpu: format!("{:.1}", process.cpu_usage()),
                mem: format!("{:.1}", 100.0 * process.memory() as f64 / total_memory),
                command,
            };
            events.push(NewEvent::new(
                EventType::RunningProcess,
                serde_json::to_string(&info)?,
            ));
        }

        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_respects_limit() {
        let events = ProcessCollector::new().gather(3).unwrap();
        assert!(events.len() <= 3);

        for event in &events {
            assert_eq!(event.event_type, EventType::RunningProcess);
            assert!(event.hash.is_none());
            let info: ProcessInfo = serde_json::from_str(&event.details).unwrap();
            assert!(!info.cpu.is_empty());
        }
    }

    #[test]
    fn test_zero_limit() {
        assert!(ProcessCollector::new().gather(0).unwrap().is_empty());
    }
}
