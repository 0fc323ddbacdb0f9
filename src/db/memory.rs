use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::{
    db::store::{DocumentStore, TrendingSource},
    error::{AppError, AppResult},
    models::{SimilarityEdge, UserPreferences, UserProfile, Video},
};

/// Process-local document store, used for development without PostgreSQL and in tests
#[derive(Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<RwLock<InMemoryStoreInner>>,
}

#[derive(Default)]
struct InMemoryStoreInner {
    users: HashMap<String, UserProfile>,
    videos: HashMap<String, Video>,
    similar: HashMap<String, Vec<SimilarityEdge>>,
}

impl InMemoryStore {
    /// Creates a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_user(&self, profile: UserProfile) {
        let mut inner = self.inner.write().await;
        inner.users.insert(profile.user_id.clone(), profile);
    }

    pub async fn insert_video(&self, video: Video) {
        let mut inner = self.inner.write().await;
        inner.videos.insert(video.video_id.clone(), video);
    }

    pub async fn insert_similar(&self, video_id: impl Into<String>, similar: Vec<SimilarityEdge>) {
        let mut inner = self.inner.write().await;
        inner.similar.insert(video_id.into(), similar);
    }
}

#[async_trait::async_trait]
impl DocumentStore for InMemoryStore {
    async fn get_user(&self, user_id: &str) -> AppResult<Option<UserProfile>> {
        let inner = self.inner.read().await;
        Ok(inner.users.get(user_id).cloned())
    }

    async fn get_similar(&self, video_id: &str) -> AppResult<Option<Vec<SimilarityEdge>>> {
        let inner = self.inner.read().await;
        Ok(inner.similar.get(video_id).cloned())
    }

    async fn get_video(&self, video_id: &str) -> AppResult<Option<Video>> {
        let inner = self.inner.read().await;
        Ok(inner.videos.get(video_id).cloned())
    }

    async fn get_videos(&self, video_ids: &[String]) -> AppResult<Vec<Video>> {
        let inner = self.inner.read().await;
        Ok(video_ids
            .iter()
            .filter_map(|id| inner.videos.get(id).cloned())
            .collect())
    }

    async fn list_videos(&self, query: Option<&str>, limit: usize) -> AppResult<Vec<Video>> {
        let inner = self.inner.read().await;
        let needle = query.map(str::to_lowercase);

        let mut videos: Vec<&Video> = inner
            .videos
            .values()
            .filter(|video| match &needle {
                Some(needle) => {
                    video.title.to_lowercase().contains(needle.as_str())
                        || video
                            .sub_category
                            .as_deref()
                            .is_some_and(|category| category.to_lowercase().contains(needle.as_str()))
                }
                None => true,
            })
            .collect();

        videos.sort_by(|a, b| {
            b.published_at
                .cmp(&a.published_at)
                .then_with(|| a.video_id.cmp(&b.video_id))
        });

        Ok(videos.into_iter().take(limit).cloned().collect())
    }

    async fn record_watch(
        &self,
        user_id: &str,
        video_id: &str,
        watched_at: DateTime<Utc>,
    ) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        let profile = inner
            .users
            .get_mut(user_id)
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))?;
        profile.record_watch(video_id, watched_at);
        Ok(())
    }

    async fn remove_watch(&self, user_id: &str, video_id: &str) -> AppResult<bool> {
        let mut inner = self.inner.write().await;
        Ok(inner
            .users
            .get_mut(user_id)
            .map(|profile| profile.remove_watch(video_id))
            .unwrap_or(false))
    }

    async fn set_preferences(
        &self,
        user_id: &str,
        preferences: &UserPreferences,
    ) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        inner
            .users
            .entry(user_id.to_string())
            .or_insert_with(|| UserProfile::new(user_id))
            .preferences = preferences.clone();
        Ok(())
    }
}

#[async_trait::async_trait]
impl TrendingSource for InMemoryStore {
    async fn trending_video_ids(
        &self,
        categories: &UserPreferences,
        limit: usize,
    ) -> AppResult<Vec<String>> {
        let inner = self.inner.read().await;

        let mut videos: Vec<&Video> = inner
            .videos
            .values()
            .filter(|video| {
                categories.is_empty()
                    || video
                        .sub_category
                        .as_deref()
                        .is_some_and(|category| categories.contains(category))
            })
            .collect();

        videos.sort_by(|a, b| {
            b.published_at
                .cmp(&a.published_at)
                .then_with(|| a.video_id.cmp(&b.video_id))
        });

        Ok(videos
            .into_iter()
            .take(limit)
            .map(|video| video.video_id.clone())
            .collect())
    }
}
