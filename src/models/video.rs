use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Categories a user can pick as preferences and a video can be filed under
pub const CATEGORIES: [&str; 11] = [
    "sports",
    "finance",
    "entertainment",
    "politics",
    "technology",
    "health",
    "world",
    "weather",
    "crime",
    "education",
    "science",
];

/// Returns true when `category` is one of the known [`CATEGORIES`]
pub fn is_known_category(category: &str) -> bool {
    CATEGORIES.contains(&category)
}

/// A video record as stored in the catalog and rendered by the home feed
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub video_id: String,
    pub title: String,
    pub video_url: String,
    pub thumbnail_url: String,
    pub published_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_category: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_known_categories() {
        assert!(is_known_category("sports"));
        assert!(is_known_category("science"));
        assert!(!is_known_category("Sports"));
        assert!(!is_known_category("cooking"));
    }

    #[test]
    fn test_video_serializes_camel_case() {
        let video = Video {
            video_id: "v1".to_string(),
            title: "Match highlights".to_string(),
            video_url: "https://cdn.example/v1.mp4".to_string(),
            thumbnail_url: "https://cdn.example/v1.jpg".to_string(),
            published_at: Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap(),
            sub_category: Some("sports".to_string()),
        };

        let json = serde_json::to_value(&video).unwrap();
        assert_eq!(json["videoId"], "v1");
        assert_eq!(json["thumbnailUrl"], "https://cdn.example/v1.jpg");
        assert_eq!(json["subCategory"], "sports");
    }

    #[test]
    fn test_video_without_category_omits_field() {
        let json = r#"{
            "videoId": "v2",
            "title": "Untitled",
            "videoUrl": "u",
            "thumbnailUrl": "t",
            "publishedAt": "2025-03-01T12:00:00Z"
        }"#;

        let video: Video = serde_json::from_str(json).unwrap();
        assert_eq!(video.sub_category, None);
        let back = serde_json::to_value(&video).unwrap();
        assert!(back.get("subCategory").is_none());
    }
}
