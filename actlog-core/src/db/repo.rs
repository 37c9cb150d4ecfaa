//! Database repository layer
//!
//! Provides the append, query, delete and trim operations on `activity_log`,
//! plus the grouped/counting queries the analytics engine reads.

use crate::config::StoreConfig;
use crate::error::Result;
use crate::types::*;
use chrono::{Duration, NaiveDateTime};
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

const EVENT_COLUMNS: &str = "id, timestamp, event_type, details, hash, session_id";

/// SQLite binds LIMIT as a signed 64-bit integer; larger limits saturate.
fn sql_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

/// Database handle with connection pooling (single connection for now)
///
/// The connection mutex is the single-writer lock: an append holds it for
/// the whole duplicate check, insert and retention trim.
pub struct Database {
    conn: Mutex<Connection>,
    store: StoreConfig,
}

impl Database {
    /// Open or create a database at the given path
    pub fn open(path: &PathBuf) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        // WAL lets the analytics path read while a collector writes
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA busy_timeout = 5000;
            ",
        )?;

        Ok(Self {
            conn: Mutex::new(conn),
            store: StoreConfig::default(),
        })
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Mutex::new(conn),
            store: StoreConfig::default(),
        })
    }

    /// Replace the retention cap and dedup window
    pub fn with_store_config(mut self, store: StoreConfig) -> Self {
        self.store = store;
        self
    }

    pub fn store_config(&self) -> &StoreConfig {
        &self.store
    }

    /// Run migrations on this database
    pub fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        super::schema::run_migrations(&conn)
    }

    /// Get the underlying connection (for advanced use)
    pub fn connection(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap()
    }

    // ============================================
    // Append / dedup / retention
    // ============================================

    /// Append an event stamped with the current local time.
    pub fn append(&self, event: &NewEvent) -> Result<AppendOutcome> {
        self.append_at(event, local_now())
    }

    /// Append an event with an explicit timestamp.
    ///
    /// Duplicate check, insert and retention trim run in one immediate
    /// transaction. The trim runs in a savepoint: if it fails only the trim
    /// is rolled back and the insert is still committed.
    pub fn append_at(&self, event: &NewEvent, at: NaiveDateTime) -> Result<AppendOutcome> {
        let mut conn = self.conn.lock().unwrap();
        let mut tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        if let Some(hash) = &event.hash {
            let window_start = at - self.store.dedup_window();
            match Self::find_duplicate(&tx, hash, window_start) {
                Ok(true) => {
                    tracing::debug!(
                        event_type = %event.event_type,
                        hash = %hash,
                        "Skipping duplicate inside dedup window"
                    );
                    return Ok(AppendOutcome::Duplicate);
                }
                Ok(false) => {}
                // Fail open
                Err(e) => {
                    tracing::warn!(error = %e, hash = %hash, "Duplicate check failed, recording event");
                }
            }
        }

        tx.execute(
            r#"
            INSERT INTO activity_log (timestamp, event_type, details, hash, session_id)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                format_timestamp(&at),
                event.event_type.as_str(),
                event.details,
                event.hash,
                event.session_id,
            ],
        )?;
        let id = tx.last_insert_rowid();

        match Self::trim_in_savepoint(&mut tx, self.store.max_records) {
            Ok(0) => {}
            Ok(deleted) => tracing::debug!(deleted, "Evicted oldest events"),
            Err(e) => tracing::warn!(
                error = %e,
                max_records = self.store.max_records,
                "Retention trim failed, store may exceed its cap"
            ),
        }

        tx.commit()?;

        tracing::trace!(id, event_type = %event.event_type, "Event appended");
        Ok(AppendOutcome::Inserted(id))
    }

    /// Caller-facing append: `true` only when a row was written.
    ///
    /// Never returns an error; failures are logged.
    pub fn save_event(&self, event: &NewEvent) -> bool {
        match self.append(event) {
            Ok(outcome) => outcome.inserted(),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    event_type = %event.event_type,
                    "Failed to append event"
                );
                false
            }
        }
    }

    /// True iff a row with this hash has `timestamp >= now - window`.
    pub fn is_recent_duplicate(
        &self,
        hash: &str,
        window: Duration,
        now: NaiveDateTime,
    ) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        Ok(Self::find_duplicate(&conn, hash, now - window)?)
    }

    /// Delete the oldest rows until at most `max_records` remain.
    ///
    /// Returns the number of rows deleted; a no-op under the limit.
    pub fn enforce_retention(&self, max_records: usize) -> Result<usize> {
        let conn = self.conn.lock().unwrap();
        Ok(Self::trim_oldest(&conn, max_records)?)
    }

    fn find_duplicate(
        conn: &Connection,
        hash: &str,
        window_start: NaiveDateTime,
    ) -> rusqlite::Result<bool> {
        conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM activity_log WHERE hash = ?1 AND timestamp >= ?2)",
            params![hash, format_timestamp(&window_start)],
            |r| r.get(0),
        )
    }

    fn trim_in_savepoint(tx: &mut Transaction<'_>, max_records: usize) -> rusqlite::Result<usize> {
        let sp = tx.savepoint()?;
        let deleted = Self::trim_oldest(&sp, max_records)?;
        sp.commit()?;
        Ok(deleted)
    }

    fn trim_oldest(conn: &Connection, max_records: usize) -> rusqlite::Result<usize> {
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM activity_log", [], |r| r.get(0))?;
        let excess = count - max_records as i64;
        if excess <= 0 {
            return Ok(0);
        }

        conn.execute(
            r#"
            DELETE FROM activity_log WHERE id IN (
                SELECT id FROM activity_log
                ORDER BY timestamp ASC, id ASC
                LIMIT ?1
            )
            "#,
            [excess],
        )
    }

    /// Delete every event. Irreversible; only for explicit operator action.
    pub fn delete_all(&self) -> Result<usize> {
        let conn = self.conn.lock().unwrap();
        let deleted = conn.execute("DELETE FROM activity_log", [])?;
        tracing::info!(deleted, "Deleted all events");
        Ok(deleted)
    }

    // ============================================
    // Listing
    // ============================================

    /// List events with optional filtering
    pub fn query(&self, filter: &EventFilter) -> Result<Vec<ActivityEvent>> {
        let conn = self.conn.lock().unwrap();

        let mut sql = format!("SELECT {} FROM activity_log WHERE 1=1", EVENT_COLUMNS);
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = vec![];

        if let Some(event_type) = &filter.event_type {
            sql.push_str(" AND event_type = ?");
            params.push(Box::new(event_type.as_str().to_string()));
        }

        if let Some(since) = &filter.since {
            sql.push_str(" AND timestamp >= ?");
            params.push(Box::new(format_timestamp(since)));
        }

        if let Some(until) = &filter.until {
            sql.push_str(" AND timestamp <= ?");
            params.push(Box::new(format_timestamp(until)));
        }

        let order = filter.order.as_sql();
        sql.push_str(&format!(" ORDER BY timestamp {order}, id {order}"));

        if let Some(limit) = filter.limit {
            sql.push_str(" LIMIT ?");
            params.push(Box::new(sql_limit(limit)));
        }

        let params_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();

        let mut stmt = conn.prepare(&sql)?;
        let events = stmt
            .query_map(params_refs.as_slice(), Self::row_to_event)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(events)
    }

    fn row_to_event(row: &Row) -> rusqlite::Result<ActivityEvent> {
        let timestamp_str: String = row.get("timestamp")?;
        let event_type_str: String = row.get("event_type")?;

        let timestamp = parse_timestamp(&timestamp_str)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(1, Type::Text, Box::new(e)))?;

        Ok(ActivityEvent {
            id: row.get("id")?,
            timestamp,
            event_type: EventType::from(event_type_str.as_str()),
            details: row.get("details")?,
            hash: row.get("hash")?,
            session_id: row.get("session_id")?,
        })
    }

    /// All event timestamps, oldest first.
    ///
    /// Rows whose timestamp does not parse are skipped with a warning.
    pub fn event_timestamps(&self) -> Result<Vec<NaiveDateTime>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt =
            conn.prepare("SELECT timestamp FROM activity_log ORDER BY timestamp ASC, id ASC")?;

        let raw: Vec<String> = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<_, _>>()?;

        let mut skipped = 0usize;
        let timestamps: Vec<NaiveDateTime> = raw
            .iter()
            .filter_map(|s| match parse_timestamp(s) {
                Ok(ts) => Some(ts),
                Err(_) => {
                    skipped += 1;
                    None
                }
            })
            .collect();

        if skipped > 0 {
            tracing::warn!(skipped, "Skipped events with malformed timestamps");
        }

        Ok(timestamps)
    }

    // ============================================
    // Aggregates
    // ============================================

    /// Most frequent `details` for one event type: count desc, details asc.
    pub fn top_details(&self, event_type: &EventType, limit: usize) -> Result<Vec<(String, i64)>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            r#"
            SELECT details, COUNT(*) as cnt
            FROM activity_log
            WHERE event_type = ?1
            GROUP BY details
            ORDER BY cnt DESC, details ASC
            LIMIT ?2
            "#,
        )?;

        let rows = stmt
            .query_map(params![event_type.as_str(), sql_limit(limit)], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(rows)
    }

    /// Event counts per hour-of-day (`"00"`..`"23"`) since a point in time:
    /// count desc, hour asc.
    pub fn hourly_activity(&self, since: NaiveDateTime, limit: usize) -> Result<Vec<(String, i64)>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            r#"
            SELECT strftime('%H', timestamp) as hour, COUNT(*) as cnt
            FROM activity_log
            WHERE timestamp >= ?1
            GROUP BY hour
            HAVING hour IS NOT NULL
            ORDER BY cnt DESC, hour ASC
            LIMIT ?2
            "#,
        )?;

        let rows = stmt
            .query_map(params![format_timestamp(&since), sql_limit(limit)], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(rows)
    }

    /// Count events at or after a point in time
    pub fn count_since(&self, since: NaiveDateTime) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM activity_log WHERE timestamp >= ?1",
            [format_timestamp(&since)],
            |r| r.get(0),
        )?;
        Ok(count)
    }

    /// Count events in an inclusive time range
    pub fn count_between(&self, start: NaiveDateTime, end: NaiveDateTime) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM activity_log WHERE timestamp BETWEEN ?1 AND ?2",
            [format_timestamp(&start), format_timestamp(&end)],
            |r| r.get(0),
        )?;
        Ok(count)
    }

    /// Count distinct (date, hour) buckets holding at least one event
    pub fn count_active_hours(&self, since: NaiveDateTime) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row(
            r#"
            SELECT COUNT(DISTINCT strftime('%Y-%m-%d %H', timestamp))
            FROM activity_log
            WHERE timestamp >= ?1
            "#,
            [format_timestamp(&since)],
            |r| r.get(0),
        )?;
        Ok(count)
    }

    /// Count total events
    pub fn count_events(&self) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM activity_log", [], |r| r.get(0))?;
        Ok(count)
    }

    /// Count events by type tag
    pub fn count_by_type(&self) -> Result<HashMap<String, i64>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt =
            conn.prepare("SELECT event_type, COUNT(*) FROM activity_log GROUP BY event_type")?;

        let counts: HashMap<String, i64> = stmt
            .query_map([], |row| {
                let event_type: String = row.get(0)?;
                let count: i64 = row.get(1)?;
                Ok((event_type, count))
            })?
            .collect::<std::result::Result<_, _>>()?;

        Ok(counts)
    }
}
