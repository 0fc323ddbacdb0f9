use chrono::{DateTime, Utc};

use crate::{
    error::AppResult,
    models::{SimilarityEdge, UserPreferences, UserProfile, Video},
};

/// Document store holding users, the video catalog and precomputed similarity lists
///
/// Every method is a suspension point. A missing record is `Ok(None)`; only a
/// failure to reach or query the backend is an `Err`.
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get_user(&self, user_id: &str) -> AppResult<Option<UserProfile>>;

    /// Precomputed similarity list for `video_id`, if one has been generated
    async fn get_similar(&self, video_id: &str) -> AppResult<Option<Vec<SimilarityEdge>>>;

    async fn get_video(&self, video_id: &str) -> AppResult<Option<Video>>;

    /// Resolves ids to videos, preserving input order and skipping unknown ids
    async fn get_videos(&self, video_ids: &[String]) -> AppResult<Vec<Video>>;

    /// Up to `limit` catalog videos, newest first
    ///
    /// With a `query`, only videos whose title or category contains it
    /// (case-insensitive) are returned.
    async fn list_videos(&self, query: Option<&str>, limit: usize) -> AppResult<Vec<Video>>;

    /// Upserts a history entry keyed by `video_id`. A rewatch refreshes `watched_at`.
    ///
    /// Returns `NotFound` when the user has no profile.
    async fn record_watch(
        &self,
        user_id: &str,
        video_id: &str,
        watched_at: DateTime<Utc>,
    ) -> AppResult<()>;

    /// Removes `video_id` from the user's history, returning whether it was present
    async fn remove_watch(&self, user_id: &str, video_id: &str) -> AppResult<bool>;

    /// Replaces the user's preferences, creating the profile if needed
    async fn set_preferences(&self, user_id: &str, preferences: &UserPreferences)
        -> AppResult<()>;
}

/// Trending query used by the non-personalized recommendation tiers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait TrendingSource: Send + Sync {
    /// Up to `limit` video ids, newest first. An empty `categories` means no filter.
    async fn trending_video_ids(
        &self,
        categories: &UserPreferences,
        limit: usize,
    ) -> AppResult<Vec<String>>;
}
