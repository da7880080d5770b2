use chrono::NaiveDateTime;
use log::debug;
use rusqlite::{params, types::Type};

use crate::db::models::{StatSnapshot, VideoStatistics};
use crate::db::sqlite::SqliteClient;

/// Accepted textual timestamp layouts, most specific first.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Parses a stored timestamp.
///
/// Rows written by this crate use `YYYY-MM-DD HH:MM:SS.ffffff`; the other
/// layouts cover rows written by hand or by other SQLite tooling.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    let raw = raw.trim();
    let mut last_err = None;
    for format in TIMESTAMP_FORMATS {
        match NaiveDateTime::parse_from_str(raw, format) {
            Ok(ts) => return Ok(ts),
            Err(e) => last_err = Some(e),
        }
    }
    match chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => Ok(date.and_time(chrono::NaiveTime::MIN)),
        Err(e) => Err(last_err.unwrap_or(e)),
    }
}

impl SqliteClient {
    // ==================== STATS ====================

    /// Appends one snapshot and returns its id.
    pub fn insert_snapshot(
        &self,
        timestamp: NaiveDateTime,
        stats: &VideoStatistics,
    ) -> rusqlite::Result<i64> {
        let mut conn = self.connect()?;

        let tx = conn.transaction()?;
        tx.execute(
            r#"
            INSERT INTO stats (timestamp, view_count, like_count, comment_count)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![timestamp, stats.views, stats.likes, stats.comments],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        conn.close().map_err(|(_, e)| e)?;
        Ok(id)
    }

    /// Reads the whole table in append order.
    pub fn get_snapshots(&self) -> rusqlite::Result<Vec<StatSnapshot>> {
        let conn = self.connect_read_only()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT id, timestamp, view_count, like_count, comment_count
            FROM stats
            ORDER BY id
            "#,
        )?;

        let rows = stmt
            .query_map([], |row| {
                let raw: String = row.get("timestamp")?;
                let timestamp = parse_timestamp(&raw).map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(1, Type::Text, Box::new(e))
                })?;

                Ok(StatSnapshot::new(
                    row.get("id")?,
                    timestamp,
                    row.get("view_count")?,
                    row.get("like_count")?,
                    row.get("comment_count")?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        debug!("Loaded {} snapshots from {}", rows.len(), self.path().display());
        Ok(rows)
    }

    pub fn count_snapshots(&self) -> rusqlite::Result<i64> {
        let conn = self.connect_read_only()?;
        conn.query_row("SELECT COUNT(*) FROM stats", [], |row| row.get(0))
    }
}
