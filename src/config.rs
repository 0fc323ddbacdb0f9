use serde::Deserialize;

use crate::services::recommendations::RecommendOptions;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// PostgreSQL database connection URL. The in-memory store is used when unset.
    pub database_url: Option<String>,

    /// Redis connection URL. Similarity and metadata lookups go uncached when unset.
    pub redis_url: Option<String>,

    /// YouTube Data API key
    pub youtube_api_key: Option<String>,

    /// YouTube Data API base URL
    #[serde(default = "default_youtube_api_url")]
    pub youtube_api_url: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Origin allowed by CORS (the web frontend)
    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,

    /// Maximum number of videos returned by one recommendation call
    #[serde(default = "default_recommendation_cap")]
    pub recommendation_cap: usize,

    /// Upper bound on in-flight similarity lookups per recommendation call
    #[serde(default = "default_max_concurrent_lookups")]
    pub max_concurrent_lookups: usize,

    /// Drop candidates the user has already watched
    #[serde(default = "default_exclude_watched")]
    pub exclude_watched: bool,

    /// Seconds a similarity list stays in Redis
    #[serde(default = "default_similarity_cache_ttl")]
    pub similarity_cache_ttl: u64,

    /// Seconds YouTube metadata stays in Redis
    #[serde(default = "default_metadata_cache_ttl")]
    pub metadata_cache_ttl: u64,
}

fn default_youtube_api_url() -> String {
    "https://www.googleapis.com/youtube/v3".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_cors_origin() -> String {
    "http://localhost:3000".to_string()
}

fn default_recommendation_cap() -> usize {
    12
}

fn default_max_concurrent_lookups() -> usize {
    8
}

fn default_exclude_watched() -> bool {
    true
}

fn default_similarity_cache_ttl() -> u64 {
    3600
}

fn default_metadata_cache_ttl() -> u64 {
    86400
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn recommend_options(&self) -> RecommendOptions {
        RecommendOptions {
            cap: self.recommendation_cap,
            max_concurrent_lookups: self.max_concurrent_lookups,
            exclude_watched: self.exclude_watched,
        }
    }
}
