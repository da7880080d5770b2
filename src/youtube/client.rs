use log::{debug, info};
use reqwest::Client;
use url::Url;

use super::response::{ApiErrorBody, VideoListResponse};
use crate::config::{YoutubeSettings, API_KEY_ENV};
use crate::db::models::VideoStatistics;
use crate::error::StatsError;

/// Facet requested from `videos.list`.
const PART: &str = "statistics";

/// Statistics API client.
///
/// No request timeout is configured; an external scheduler that enforces a
/// wall-clock limit simply kills the process.
#[derive(Debug, Clone)]
pub struct YoutubeClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl YoutubeClient {
    /// Fails with `MissingCredential` when no API key is configured.
    pub fn new(settings: &YoutubeSettings) -> Result<Self, StatsError> {
        let api_key = settings
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(StatsError::MissingCredential(API_KEY_ENV))?
            .to_string();

        Ok(Self {
            http: Client::new(),
            base_url: settings.api_base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn videos_url(&self, video_id: &str) -> Result<Url, StatsError> {
        let mut url = Url::parse(&format!("{}/videos", self.base_url))?;
        url.query_pairs_mut()
            .append_pair("part", PART)
            .append_pair("id", video_id)
            .append_pair("key", &self.api_key);
        Ok(url)
    }

    /// One `videos.list` call for `video_id`. Counts against API quota.
    pub async fn fetch_statistics(&self, video_id: &str) -> Result<VideoStatistics, StatsError> {
        info!("Fetching statistics for video {}", video_id);

        let response = self.http.get(self.videos_url(video_id)?).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|b| b.error.message)
                .unwrap_or(body);
            return Err(StatsError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: VideoListResponse = response.json().await?;
        debug!("videos.list returned {} item(s)", body.items.len());

        body.into_statistics(video_id)
    }
}
