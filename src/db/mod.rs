use std::sync::Arc;

use chrono::NaiveDateTime;

use crate::config::StorageSettings;
use crate::error::StatsError;

pub mod models;
pub mod sqlite;

pub use models::{StatSnapshot, VideoStatistics};
pub use sqlite::SqliteClient;

/// Async handle over the SQLite store.
///
/// rusqlite is blocking, so every call is moved onto tokio's blocking pool.
#[derive(Clone)]
pub struct Database {
    pub sqlite: Arc<SqliteClient>,
}

impl Database {
    pub fn new(settings: &StorageSettings) -> Self {
        Self {
            sqlite: Arc::new(SqliteClient::new(&settings.path)),
        }
    }

    pub async fn migrate(&self) -> Result<(), StatsError> {
        let sqlite = self.sqlite.clone();
        tokio::task::spawn_blocking(move || sqlite.migrate()).await??;
        Ok(())
    }

    pub async fn insert_snapshot(
        &self,
        timestamp: NaiveDateTime,
        stats: VideoStatistics,
    ) -> Result<i64, StatsError> {
        let sqlite = self.sqlite.clone();
        let id =
            tokio::task::spawn_blocking(move || sqlite.insert_snapshot(timestamp, &stats))
                .await??;
        Ok(id)
    }

    pub async fn get_snapshots(&self) -> Result<Vec<StatSnapshot>, StatsError> {
        let sqlite = self.sqlite.clone();
        let rows = tokio::task::spawn_blocking(move || sqlite.get_snapshots()).await??;
        Ok(rows)
    }
}
