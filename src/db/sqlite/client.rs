use std::path::{Path, PathBuf};

use log::info;
use rusqlite::{Connection, OpenFlags};

const SCHEMA: &str = include_str!("../../../schema/sqlite.sql");

/// SQLite client over a single file.
///
/// Holds only the path. Every operation opens its own short-lived
/// connection and closes it when done, so the collector and the dashboard
/// never keep the file locked between calls.
#[derive(Debug, Clone)]
pub struct SqliteClient {
    path: PathBuf,
}

impl SqliteClient {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Read-write connection, creating the file if needed.
    pub fn connect(&self) -> rusqlite::Result<Connection> {
        Connection::open(&self.path)
    }

    /// Read-only connection; fails if the file is absent.
    pub fn connect_read_only(&self) -> rusqlite::Result<Connection> {
        Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
    }

    /// Creates the `stats` table if it is missing. Safe to call before every run.
    pub fn migrate(&self) -> rusqlite::Result<()> {
        info!("Setting up database at {}", self.path.display());
        let mut conn = self.connect()?;

        let tx = conn.transaction()?;
        tx.execute_batch(SCHEMA)?;
        tx.commit()?;

        conn.close().map_err(|(_, e)| e)?;
        info!("Database ready");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::VideoStatistics;

    #[test]
    fn test_migrate_creates_file_and_table() {
        let dir = tempfile::tempdir().unwrap();
        let client = SqliteClient::new(dir.path().join("stats.db"));
        assert!(!client.exists());

        client.migrate().unwrap();
        assert!(client.exists());
        assert_eq!(client.count_snapshots().unwrap(), 0);
    }

    #[test]
    fn test_migrate_twice_keeps_rows() {
        let dir = tempfile::tempdir().unwrap();
        let client = SqliteClient::new(dir.path().join("stats.db"));
        client.migrate().unwrap();

        let stats = VideoStatistics {
            views: 10,
            likes: 2,
            comments: 1,
        };
        let ts = chrono::NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        client.insert_snapshot(ts, &stats).unwrap();

        let sql_before = table_sql(&client);
        client.migrate().unwrap();

        assert_eq!(table_sql(&client), sql_before);
        let rows = client.get_snapshots().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].view_count, Some(10));
    }

    #[test]
    fn test_read_only_connection_requires_file() {
        let dir = tempfile::tempdir().unwrap();
        let client = SqliteClient::new(dir.path().join("missing.db"));
        assert!(client.connect_read_only().is_err());
        assert!(!client.exists());
    }

    fn table_sql(client: &SqliteClient) -> String {
        let conn = client.connect().unwrap();
        conn.query_row(
            "SELECT sql FROM sqlite_master WHERE type = 'table' AND name = 'stats'",
            [],
            |row| row.get(0),
        )
        .unwrap()
    }
}
