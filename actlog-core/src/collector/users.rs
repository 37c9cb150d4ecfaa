use super::{non_empty_lines, run_command, Collector};
use crate::error::Result;
use crate::types::{EventType, NewEvent};

/// Records one event per logged-in session line of `w -h`.
#[derive(Default)]
pub struct UserCollector;

impl UserCollector {
    pub fn new() -> Self {
        Self
    }

    fn parse(output: &str, limit: usize) -> Vec<NewEvent> {
        non_empty_lines(output)
            .take(limit)
            .map(|line| NewEvent::new(EventType::LoggedUser, line))
            .collect()
    }
}

impl Collector for UserCollector {
    fn name(&self) -> &'static str {
        "users"
    }

    fn event_type(&self) -> EventType {
        EventType::LoggedUser
    }

    fn gather(&self, limit: usize) -> Result<Vec<NewEvent>> {
        let output = run_command("w", &["-h"])?;
        Ok(Self::parse(&output, limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_w_output() {
        let output = "alice    tty1     -                09:01    3:00m  0.10s  0.05s -bash\n\
                      \n\
                      bob      pts/0    10.0.0.2         10:15    0.00s  0.02s  0.00s w -h\n";
        let events = UserCollector::parse(output, usize::MAX);

        assert_eq!(events.len(), 2);
        assert!(events[0].details.starts_with("alice"));
        assert!(events[1].details.ends_with("w -h"));
        assert!(events.iter().all(|e| e.hash.is_none()));
    }
}
