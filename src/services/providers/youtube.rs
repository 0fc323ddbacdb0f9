//! YouTube Data API v3 provider
//!
//! Only `GET /videos?part=snippet&id=<id>` is used. The API answers an unknown
//! id with an empty `items` array rather than a 404. Such misses are not cached.
use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{VideoDetails, YouTubeVideoList},
    services::providers::MetadataProvider,
};
use reqwest::Client as HttpClient;

#[derive(Clone)]
pub struct YouTubeProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    cache: Option<Cache>,
    cache_ttl: u64,
}

impl YouTubeProvider {
    pub fn new(api_key: String, api_url: String, cache: Option<Cache>, cache_ttl: u64) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            cache,
            cache_ttl,
        }
    }

    fn videos_url(&self) -> String {
        format!("{}/videos", self.api_url)
    }

    async fn call_api(&self, video_id: &str) -> AppResult<Option<VideoDetails>> {
        let response = self
            .http_client
            .get(self.videos_url())
            .query(&[
                ("part", "snippet"),
                ("id", video_id),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AppError::from(e.without_url()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                video_id = %video_id,
                status = %status,
                body = %body,
                "YouTube API request failed"
            );
            return Err(AppError::ExternalApi(format!(
                "YouTube API returned status {}",
                status
            )));
        }

        let list: YouTubeVideoList = response
            .json()
            .await
            .map_err(|e| AppError::from(e.without_url()))?;
        let details = list.items.into_iter().next().map(VideoDetails::from);

        tracing::info!(
            video_id = %video_id,
            found = details.is_some(),
            provider = self.name(),
            "Video details fetched"
        );

        Ok(details)
    }
}

#[async_trait::async_trait]
impl MetadataProvider for YouTubeProvider {
    async fn fetch_video_details(&self, video_id: &str) -> AppResult<Option<VideoDetails>> {
        if video_id.trim().is_empty() {
            return Err(AppError::InvalidInput("Video id cannot be empty".to_string()));
        }

        match &self.cache {
            Some(cache) => cached!(
                cache,
                CacheKey::VideoDetails(video_id.to_string()),
                self.cache_ttl,
                self.call_api(video_id),
                Option::is_some
            ),
            None => self.call_api(video_id).await,
        }
    }

    fn name(&self) -> &'static str {
        "youtube"
    }
}
