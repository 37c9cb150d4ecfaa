use super::{run_command, Collector};
use crate::error::{Error, Result};
use crate::types::{EventType, NewEvent};
use std::collections::BTreeSet;
use std::path::Path;

/// Path fragments never recorded as file activity
const SKIPPED_FRAGMENTS: &[&str] = &["/proc/", "/sys/", "/tmp/", ".sock"];

/// Records regular files currently held open by the user, via `lsof`.
///
/// Events are hashed, so a file kept open across cycles is recorded at
/// most once per dedup window.
#[derive(Default)]
pub struct OpenFileCollector;

impl OpenFileCollector {
    pub fn new() -> Self {
        Self
    }
}

/// Extract file paths from `lsof -F n` output.
///
/// Keeps `n/...` name records that pass `is_file` and contain none of the
/// skipped fragments. Result is unique and sorted.
pub fn parse_lsof_names(output: &str, is_file: impl Fn(&Path) -> bool) -> Vec<String> {
    let paths: BTreeSet<&str> = output
        .lines()
        .filter_map(|line| line.strip_prefix('n'))
        .filter(|path| path.starts_with('/'))
        .filter(|path| !SKIPPED_FRAGMENTS.iter().any(|frag| path.contains(frag)))
        .filter(|path| is_file(Path::new(path)))
        .collect();

    paths.into_iter().map(str::to_string).collect()
}

impl Collector for OpenFileCollector {
    fn name(&self) -> &'static str {
        "open_files"
    }

    fn event_type(&self) -> EventType {
        EventType::FileAccess
    }

    fn gather(&self, limit: usize) -> Result<Vec<NewEvent>> {
        let user = std::env::var("USER")
            .map_err(|_| Error::Collector("USER is not set".to_string()))?;
        let output = run_command("lsof", &["-u", &user, "-F", "n"])?;

        Ok(parse_lsof_names(&output, |p| p.is_file())
            .into_iter()
            .take(limit)
            .map(|path| NewEvent::new(EventType::FileAccess, path).hashed())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lsof_filters() {
        let output = "p1234\nfcwd\nn/home/me/project\nf3\nn/home/me/notes.md\n\
                      f4\nn/proc/1234/status\nf5\nn/tmp/scratch.txt\nf6\nn/run/app.sock\n\
                      f7\nnsocket:[12345]\nf8\nn/home/me/notes.md\np99\nf1\nn/home/me/a.rs\n";

        let paths = parse_lsof_names(output, |p| p.extension().is_some());
        assert_eq!(paths, vec!["/home/me/a.rs", "/home/me/notes.md"]);
    }

    #[test]
    fn test_parse_lsof_regular_files_only() {
        let manifest = concat!(env!("CARGO_MANIFEST_DIR"), "/Cargo.toml");
        let src_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/src");
        let missing = concat!(env!("CARGO_MANIFEST_DIR"), "/missing.txt");

        let output = format!("n{}\nn{}\nn{}\n", manifest, src_dir, missing);
        let paths = parse_lsof_names(&output, |p| p.is_file());
        assert_eq!(paths, vec![manifest.to_string()]);
    }
}
