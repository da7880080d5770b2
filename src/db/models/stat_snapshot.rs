use chrono::NaiveDateTime;
use serde::Serialize;

use super::VideoStatistics;

/// One row of the `stats` table.
///
/// Counters are nullable in the schema. The collector always writes them,
/// but rows inserted by other tools may leave them empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatSnapshot {
    pub id: i64,
    pub timestamp: NaiveDateTime,
    pub view_count: Option<i64>,
    pub like_count: Option<i64>,
    pub comment_count: Option<i64>,
}

impl StatSnapshot {
    pub fn new(
        id: i64,
        timestamp: NaiveDateTime,
        view_count: Option<i64>,
        like_count: Option<i64>,
        comment_count: Option<i64>,
    ) -> Self {
        Self {
            id,
            timestamp,
            view_count,
            like_count,
            comment_count,
        }
    }

    /// Counters with empty values read as 0.
    pub fn counters(&self) -> VideoStatistics {
        VideoStatistics {
            views: self.view_count.unwrap_or_default(),
            likes: self.like_count.unwrap_or_default(),
            comments: self.comment_count.unwrap_or_default(),
        }
    }
}
