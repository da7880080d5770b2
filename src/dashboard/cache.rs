use std::sync::Arc;
use std::time::Duration;

use log::debug;
use moka::future::Cache;

use super::history::{load_history, History};
use crate::db::Database;

/// Memoizes the loaded history for a fixed window.
///
/// There is a single global entry (loading takes no arguments). It expires
/// purely by time, or early through [`HistoryCache::invalidate`].
#[derive(Clone)]
pub struct HistoryCache {
    db: Database,
    entries: Cache<(), Arc<History>>,
}

impl HistoryCache {
    pub fn new(db: Database, ttl: Duration) -> Self {
        let entries = Cache::builder().max_capacity(1).time_to_live(ttl).build();
        Self { db, entries }
    }

    /// Cached history, reloading from the store when the entry has expired.
    pub async fn get(&self) -> Arc<History> {
        let db = self.db.clone();
        self.entries
            .get_with((), async move {
                debug!("History cache miss, loading from store");
                Arc::new(load_history(&db).await)
            })
            .await
    }

    pub async fn invalidate(&self) {
        self.entries.invalidate(&()).await;
    }
}
