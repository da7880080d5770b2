use serde::Serialize;

/// Counters read from the statistics API, before a timestamp is attached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct VideoStatistics {
    pub views: i64,
    pub likes: i64,
    pub comments: i64,
}
