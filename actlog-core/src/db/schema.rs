//! Database schema and migrations
//!
//! Uses SQLite with embedded migrations managed via PRAGMA user_version.
//!
//! Databases written by earlier versions of the recorder carry an
//! `activity_log` table without the `hash` and `session_id` columns and a
//! `user_version` of 0. Migration 1 leaves such a table untouched and
//! migration 2 adds the missing columns, so existing rows read `NULL`.

use rusqlite::Connection;

/// Current schema version
pub const SCHEMA_VERSION: i32 = 2;

/// A single forward migration step
type Migration = fn(&Connection) -> rusqlite::Result<()>;

/// Migrations, indexed by version number - 1
const MIGRATIONS: &[Migration] = &[create_activity_log, add_dedup_columns];

/// Version 1: base table and its timestamp/type indexes
fn create_activity_log(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS activity_log (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            timestamp   TEXT NOT NULL,
            event_type  TEXT NOT NULL,
            details     TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_timestamp ON activity_log(timestamp);
        CREATE INDEX IF NOT EXISTS idx_event_type ON activity_log(event_type);
        "#,
    )
}

/// Version 2: dedup hash and reserved session grouping
fn add_dedup_columns(conn: &Connection) -> rusqlite::Result<()> {
    add_column_if_missing(conn, "activity_log", "hash", "TEXT")?;
    add_column_if_missing(conn, "activity_log", "session_id", "TEXT")?;
    conn.execute_batch("CREATE INDEX IF NOT EXISTS idx_hash ON activity_log(hash);")
}

/// Additive column evolution: `ALTER TABLE ... ADD COLUMN` only when absent.
fn add_column_if_missing(
    conn: &Connection,
    table: &str,
    column: &str,
    decl: &str,
) -> rusqlite::Result<()> {
    if column_exists(conn, table, column)? {
        return Ok(());
    }
    tracing::info!(table, column, "Adding column");
    conn.execute(
        &format!("ALTER TABLE {} ADD COLUMN {} {}", table, column, decl),
        [],
    )?;
    Ok(())
}

/// Check `pragma_table_info` for a column.
pub fn column_exists(conn: &Connection, table: &str, column: &str) -> rusqlite::Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM pragma_table_info(?1) WHERE name = ?2",
        [table, column],
        |r| r.get(0),
    )?;
    Ok(count > 0)
}

/// Run all pending migrations
pub fn run_migrations(conn: &Connection) -> crate::error::Result<()> {
    let current_version: i32 = conn
        .query_row("PRAGMA user_version", [], |r| r.get(0))
        .unwrap_or(0);

    tracing::info!(
        current_version,
        target_version = SCHEMA_VERSION,
        "Checking database migrations"
    );

    for (i, migration) in MIGRATIONS.iter().enumerate() {
        let version = (i + 1) as i32;
        if version > current_version {
            tracing::info!(version, "Running migration");
            migration(conn)?;
            conn.execute(&format!("PRAGMA user_version = {}", version), [])?;
        }
    }

    if current_version < SCHEMA_VERSION {
        tracing::info!(
            from = current_version,
            to = SCHEMA_VERSION,
            "Migrations complete"
        );
    }

    Ok(())
}

/// Get the current schema version from the database
pub fn get_schema_version(conn: &Connection) -> crate::error::Result<i32> {
    let version: i32 = conn.query_row("PRAGMA user_version", [], |r| r.get(0))?;
    Ok(version)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_names(conn: &Connection) -> Vec<String> {
        conn.prepare(
            "SELECT name FROM sqlite_master WHERE type = 'index' AND tbl_name = 'activity_log' \
             AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )
        .unwrap()
        .query_map([], |row| row.get::<_, String>(0))
        .unwrap()
        .filter_map(|r| r.ok())
        .collect()
    }

    #[test]
    fn test_migrations_idempotent() {
        let conn = Connection::open_in_memory().unwrap();

        // Run migrations twice - should be idempotent
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();

        let version = get_schema_version(&conn).unwrap();
        assert_eq!(version, SCHEMA_VERSION);
        assert_eq!(
            index_names(&conn),
            vec!["idx_event_type", "idx_hash", "idx_timestamp"]
        );
    }

    #[test]
    fn test_table_columns() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        for column in ["id", "timestamp", "event_type", "details", "hash", "session_id"] {
            assert!(
                column_exists(&conn, "activity_log", column).unwrap(),
                "column {} should exist",
                column
            );
        }
    }

    #[test]
    fn test_legacy_table_upgraded_in_place() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            r#"
            CREATE TABLE activity_log (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp TEXT NOT NULL,
                event_type TEXT NOT NULL,
                details TEXT NOT NULL
            );
            INSERT INTO activity_log (timestamp, event_type, details)
            VALUES ('2024-01-01 09:00:00', 'bash_command', 'ls');
            "#,
        )
        .unwrap();

        run_migrations(&conn).unwrap();

        let (details, hash, session_id): (String, Option<String>, Option<String>) = conn
            .query_row(
                "SELECT details, hash, session_id FROM activity_log",
                [],
                |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
            )
            .unwrap();
        assert_eq!(details, "ls");
        assert!(hash.is_none());
        assert!(session_id.is_none());
        assert!(index_names(&conn).contains(&"idx_hash".to_string()));
    }

    #[test]
    fn test_columns_restored_when_version_is_stale() {
        // A table that already has the columns but no recorded version
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            r#"
            CREATE TABLE activity_log (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp TEXT NOT NULL,
                event_type TEXT NOT NULL,
                details TEXT NOT NULL,
                hash TEXT,
                session_id TEXT
            );
            "#,
        )
        .unwrap();

        run_migrations(&conn).unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), SCHEMA_VERSION);
    }
}
