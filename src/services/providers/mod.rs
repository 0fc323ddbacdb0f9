//! External video metadata sources
use crate::{error::AppResult, models::VideoDetails};

pub mod youtube;

pub use youtube::YouTubeProvider;

/// Source of video metadata (title, description, thumbnails, tags)
#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Fetch metadata for one video id, `None` if the provider has no such video
    async fn fetch_video_details(&self, video_id: &str) -> AppResult<Option<VideoDetails>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
