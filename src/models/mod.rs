use serde::{Deserialize, Serialize};

pub mod recommendation;
pub mod user_preferences;
pub mod video;

pub use recommendation::{RankedResult, SimilarityEdge, Tier};
pub use user_preferences::{UserPreferences, UserProfile, WatchHistoryEntry};
pub use video::{is_known_category, Video, CATEGORIES};

/// Video metadata pulled from YouTube, returned to the client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VideoDetails {
    pub id: String,
    pub title: String,
    pub description: String,
    pub thumbnail_url: String,
    pub tags: Vec<String>,
    pub published_at: String,
    pub source: String,
}

// ============================================================================
// YouTube Data API Types
// ============================================================================

/// Raw response of `GET /videos?part=snippet`
#[derive(Debug, Clone, Deserialize)]
pub struct YouTubeVideoList {
    #[serde(default)]
    pub items: Vec<YouTubeVideo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct YouTubeVideo {
    pub id: String,
    pub snippet: YouTubeSnippet,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YouTubeSnippet {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub thumbnails: Option<YouTubeThumbnails>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    pub published_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct YouTubeThumbnails {
    #[serde(default)]
    pub high: Option<YouTubeThumbnail>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct YouTubeThumbnail {
    pub url: String,
}

impl From<YouTubeVideo> for VideoDetails {
    fn from(video: YouTubeVideo) -> Self {
        let snippet = video.snippet;
        let thumbnail_url = snippet
            .thumbnails
            .and_then(|t| t.high)
            .map(|t| t.url)
            .unwrap_or_default();

        VideoDetails {
            id: video.id,
            title: snippet.title,
            description: snippet.description,
            thumbnail_url,
            tags: snippet.tags.unwrap_or_default(),
            published_at: snippet.published_at,
            source: "youtube".to_string(),
        }
    }
}
