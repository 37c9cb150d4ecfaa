//! Frequency tables over recorded commands, files and hours.

use serde::Serialize;
use std::collections::HashMap;

/// Extension bucket for paths without one
pub const UNKNOWN_EXTENSION: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandPattern {
    pub command: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilePattern {
    pub path: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtensionCount {
    pub extension: String,
    pub files: usize,
}

/// Top files plus the extension breakdown computed over that same list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilePatterns {
    pub top_files: Vec<FilePattern>,
    pub file_types: Vec<ExtensionCount>,
}

/// Substring after the last `.`, or [`UNKNOWN_EXTENSION`].
pub fn file_extension(path: &str) -> &str {
    match path.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => ext,
        _ => UNKNOWN_EXTENSION,
    }
}

/// Count files per extension: count desc, then extension asc.
pub fn extension_breakdown(files: &[FilePattern]) -> Vec<ExtensionCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for file in files {
        *counts.entry(file_extension(&file.path)).or_insert(0) += 1;
    }

    let mut breakdown: Vec<ExtensionCount> = counts
        .into_iter()
        .map(|(extension, files)| ExtensionCount {
            extension: extension.to_string(),
            files,
        })
        .collect();
    breakdown.sort_by(|a, b| b.files.cmp(&a.files).then_with(|| a.extension.cmp(&b.extension)));
    breakdown
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(path: &str) -> FilePattern {
        FilePattern {
            path: path.to_string(),
            count: 1,
        }
    }

    #[test]
    fn test_file_extension() {
        assert_eq!(file_extension("/src/main.rs"), "rs");
        assert_eq!(file_extension("archive.tar.gz"), "gz");
        assert_eq!(file_extension("/usr/bin/bash"), UNKNOWN_EXTENSION);
        assert_eq!(file_extension("trailing."), UNKNOWN_EXTENSION);
    }

    #[test]
    fn test_extension_breakdown_order() {
        let files = vec![
            file("a.rs"),
            file("b.md"),
            file("c.rs"),
            file("Makefile"),
            file("d.toml"),
        ];

        let breakdown: Vec<_> = extension_breakdown(&files)
            .into_iter()
            .map(|e| (e.extension, e.files))
            .collect();
        assert_eq!(
            breakdown,
            vec![
                ("rs".to_string(), 2),
                ("md".to_string(), 1),
                ("toml".to_string(), 1),
                ("unknown".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_extension_breakdown_empty() {
        assert!(extension_breakdown(&[]).is_empty());
    }
}
