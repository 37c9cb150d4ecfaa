//! CSV export of recorded events.

use crate::db::Database;
use crate::error::Result;
use crate::types::{format_timestamp, local_now, EventFilter};
use std::path::{Path, PathBuf};

/// Events exported when no limit is given
pub const DEFAULT_EXPORT_LIMIT: usize = 1000;

const HEADER: [&str; 4] = ["ID", "Timestamp", "Event Type", "Details"];

/// `activity_export_YYYYMMDD_HHMMSS.csv` for the current local time
pub fn export_file_name() -> String {
    format!("activity_export_{}.csv", local_now().format("%Y%m%d_%H%M%S"))
}

/// Write the newest `limit` events, newest first, into a new CSV in `dir`.
///
/// Returns the path of the written file.
pub fn export_csv(db: &Database, dir: &Path, limit: usize) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(export_file_name());

    let events = db.query(&EventFilter::recent(limit))?;

    let mut writer = csv::Writer::from_path(&path)?;
    writer.write_record(HEADER)?;
    for event in &events {
        writer.write_record([
            event.id.to_string(),
            format_timestamp(&event.timestamp),
            event.event_type.to_string(),
            event.details.clone(),
        ])?;
    }
    writer.flush()?;

    tracing::info!(path = %path.display(), rows = events.len(), "Exported events to CSV");
    Ok(path)
}
