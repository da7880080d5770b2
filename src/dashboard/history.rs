use chrono::{DateTime, Local};
use log::{error, info};
use serde::Serialize;

use crate::db::{models::StatSnapshot, Database};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A message the page shows above the data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Snapshot history as loaded for the dashboard.
///
/// Rows are in append order, which is timestamp order for a single
/// sequential collector.
#[derive(Debug, Clone, Serialize)]
pub struct History {
    pub rows: Vec<StatSnapshot>,
    pub notices: Vec<Notice>,
    pub loaded_at: DateTime<Local>,
}

impl History {
    fn new(rows: Vec<StatSnapshot>, notices: Vec<Notice>) -> Self {
        Self {
            rows,
            notices,
            loaded_at: Local::now(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Most recent snapshot.
    pub fn latest(&self) -> Option<&StatSnapshot> {
        self.rows.last()
    }

    /// Rows sorted newest first, for the raw table.
    pub fn newest_first(&self) -> Vec<&StatSnapshot> {
        let mut rows: Vec<&StatSnapshot> = self.rows.iter().collect();
        rows.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
        rows
    }
}

/// Loads every snapshot. Never fails.
///
/// A missing store file is the normal state before the collector's first
/// run and yields an empty history with an informational notice. Read
/// errors are logged and reported as an error notice, also with an empty
/// history.
pub async fn load_history(db: &Database) -> History {
    let path = db.sqlite.path().display().to_string();

    if !db.sqlite.exists() {
        info!("Store {} not found, collector has not run yet", path);
        return History::new(
            Vec::new(),
            vec![
                Notice::error(format!("Database file '{}' was not found.", path)),
                Notice::info(
                    "The collector may not have run yet. Wait for its first execution.",
                ),
            ],
        );
    }

    match db.get_snapshots().await {
        Ok(rows) => {
            info!("Loaded {} snapshots from {}", rows.len(), path);
            History::new(rows, Vec::new())
        },
        Err(e) => {
            error!("Failed to read {}: {:#}", path, e);
            History::new(
                Vec::new(),
                vec![Notice::error(format!("Error reading the database: {}", e))],
            )
        },
    }
}
