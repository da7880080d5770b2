use serde::Deserialize;

use crate::db::models::VideoStatistics;
use crate::error::StatsError;

/// Body of a `videos.list` response. Only the fields we read are modelled.
#[derive(Debug, Deserialize)]
pub struct VideoListResponse {
    #[serde(default)]
    pub items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
pub struct VideoItem {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub statistics: Statistics,
}

/// The `statistics` facet.
///
/// The API encodes counters as strings and leaves out the ones it does not
/// track for a video (comments disabled, hidden likes).
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub view_count: Option<Counter>,
    pub like_count: Option<Counter>,
    pub comment_count: Option<Counter>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Counter {
    Number(i64),
    Text(String),
}

impl Counter {
    fn value(&self, field: &'static str) -> Result<i64, StatsError> {
        match self {
            Counter::Number(n) => Ok(*n),
            Counter::Text(s) => s.trim().parse().map_err(|_| StatsError::InvalidCounter {
                field,
                value: s.clone(),
            }),
        }
    }
}

fn counter_or_zero(counter: &Option<Counter>, field: &'static str) -> Result<i64, StatsError> {
    counter.as_ref().map_or(Ok(0), |c| c.value(field))
}

impl Statistics {
    /// Converts to counters, absent fields becoming 0.
    pub fn to_video_statistics(&self) -> Result<VideoStatistics, StatsError> {
        Ok(VideoStatistics {
            views: counter_or_zero(&self.view_count, "viewCount")?,
            likes: counter_or_zero(&self.like_count, "likeCount")?,
            comments: counter_or_zero(&self.comment_count, "commentCount")?,
        })
    }
}

impl VideoListResponse {
    /// Statistics of the item for `video_id`, or `VideoNotFound`.
    ///
    /// Items without an id are taken as matching; an item carrying another
    /// video's id is never used.
    pub fn into_statistics(self, video_id: &str) -> Result<VideoStatistics, StatsError> {
        let item = self
            .items
            .into_iter()
            .find(|item| item.id.as_deref().map_or(true, |id| id == video_id))
            .ok_or_else(|| StatsError::VideoNotFound(video_id.to_string()))?;
        item.statistics.to_video_statistics()
    }
}

/// Error envelope returned with non-2xx statuses.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorDetail {
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> VideoListResponse {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn test_full_statistics() {
        let resp = parse(
            r#"{"kind":"youtube#videoListResponse","items":[{"id":"abc","statistics":
                {"viewCount":"1234567","likeCount":"8900","favoriteCount":"0","commentCount":"321"}}]}"#,
        );
        let stats = resp.into_statistics("abc").unwrap();
        assert_eq!(
            stats,
            VideoStatistics {
                views: 1_234_567,
                likes: 8_900,
                comments: 321
            }
        );
    }

    #[test]
    fn test_missing_comment_count_defaults_to_zero() {
        let resp = parse(r#"{"items":[{"statistics":{"viewCount":"50","likeCount":"4"}}]}"#);
        let stats = resp.into_statistics("abc").unwrap();
        assert_eq!(stats.views, 50);
        assert_eq!(stats.likes, 4);
        assert_eq!(stats.comments, 0);
    }

    #[test]
    fn test_missing_statistics_object_is_all_zero() {
        let resp = parse(r#"{"items":[{"id":"abc"}]}"#);
        assert_eq!(
            resp.into_statistics("abc").unwrap(),
            VideoStatistics::default()
        );
    }

    #[test]
    fn test_numeric_counters_accepted() {
        let resp = parse(r#"{"items":[{"statistics":{"viewCount":7,"likeCount":"3"}}]}"#);
        let stats = resp.into_statistics("abc").unwrap();
        assert_eq!(stats.views, 7);
        assert_eq!(stats.likes, 3);
    }

    #[test]
    fn test_empty_items_is_video_not_found() {
        let err = parse(r#"{"items":[]}"#).into_statistics("gone").unwrap_err();
        assert!(matches!(err, StatsError::VideoNotFound(ref id) if id == "gone"));

        let err = parse(r#"{}"#).into_statistics("gone").unwrap_err();
        assert!(matches!(err, StatsError::VideoNotFound(_)));
    }

    #[test]
    fn test_item_for_other_video_is_not_used() {
        let resp = parse(r#"{"items":[{"id":"other","statistics":{"viewCount":"9"}}]}"#);
        let err = resp.into_statistics("abc").unwrap_err();
        assert!(matches!(err, StatsError::VideoNotFound(ref id) if id == "abc"));

        let resp = parse(
            r#"{"items":[{"id":"other","statistics":{"viewCount":"9"}},
                         {"id":"abc","statistics":{"viewCount":"12"}}]}"#,
        );
        assert_eq!(resp.into_statistics("abc").unwrap().views, 12);
    }

    #[test]
    fn test_garbage_counter_is_rejected() {
        let resp = parse(r#"{"items":[{"statistics":{"viewCount":"lots"}}]}"#);
        let err = resp.into_statistics("abc").unwrap_err();
        assert!(matches!(
            err,
            StatsError::InvalidCounter {
                field: "viewCount",
                ..
            }
        ));
    }
}
