use chrono::Utc;
use std::sync::Arc;

use crate::{
    db::DocumentStore,
    error::{AppError, AppResult},
    models::{UserPreferences, UserProfile, WatchHistoryEntry},
};

fn require_video_id(video_id: &str) -> AppResult<&str> {
    let video_id = video_id.trim();
    if video_id.is_empty() {
        return Err(AppError::InvalidInput("videoId cannot be empty".to_string()));
    }
    Ok(video_id)
}

/// Loads a profile, `NotFound` when the user never onboarded
pub async fn load_profile(store: &Arc<dyn DocumentStore>, user_id: &str) -> AppResult<UserProfile> {
    store
        .get_user(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))
}

/// Watch history, most recently watched first
pub async fn watch_history(
    store: &Arc<dyn DocumentStore>,
    user_id: &str,
) -> AppResult<Vec<WatchHistoryEntry>> {
    let mut history = load_profile(store, user_id).await?.watch_history;
    history.sort_by(|a, b| b.watched_at.cmp(&a.watched_at));
    Ok(history)
}

/// Records a view now. Rewatching refreshes the existing entry instead of appending.
pub async fn record_watch(
    store: &Arc<dyn DocumentStore>,
    user_id: &str,
    video_id: &str,
) -> AppResult<()> {
    let video_id = require_video_id(video_id)?;
    store.record_watch(user_id, video_id, Utc::now()).await?;
    tracing::info!(user_id = %user_id, video_id = %video_id, "Watch history updated");
    Ok(())
}

pub async fn remove_watch(
    store: &Arc<dyn DocumentStore>,
    user_id: &str,
    video_id: &str,
) -> AppResult<()> {
    let video_id = require_video_id(video_id)?;
    if !store.remove_watch(user_id, video_id).await? {
        return Err(AppError::NotFound(format!(
            "Video {} is not in watch history",
            video_id
        )));
    }
    Ok(())
}

pub async fn preferences(
    store: &Arc<dyn DocumentStore>,
    user_id: &str,
) -> AppResult<UserPreferences> {
    Ok(store
        .get_user(user_id)
        .await?
        .map(|profile| profile.preferences)
        .unwrap_or_default())
}

/// Replaces the user's category preferences after validating them
pub async fn update_preferences(
    store: &Arc<dyn DocumentStore>,
    user_id: &str,
    categories: &[String],
) -> AppResult<UserPreferences> {
    let preferences = UserPreferences::parse(categories)?;
    store.set_preferences(user_id, &preferences).await?;
    tracing::info!(
        user_id = %user_id,
        categories = preferences.len(),
        "Preferences updated"
    );
    Ok(preferences)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::InMemoryStore;

    async fn store_with_user(user_id: &str) -> Arc<dyn DocumentStore> {
        let store = InMemoryStore::new();
        store.insert_user(UserProfile::new(user_id)).await;
        Arc::new(store)
    }

    #[tokio::test]
    async fn test_rewatch_keeps_single_entry() {
        let store = store_with_user("u1").await;
        record_watch(&store, "u1", "a").await.unwrap();
        record_watch(&store, "u1", "b").await.unwrap();
        record_watch(&store, "u1", "a").await.unwrap();

        let history = watch_history(&store, "u1").await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].video_id, "a");
    }

    #[tokio::test]
    async fn test_record_watch_rejects_blank_video_id() {
        let store = store_with_user("u1").await;
        let err = record_watch(&store, "u1", "  ").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_remove_unknown_entry_is_not_found() {
        let store = store_with_user("u1").await;
        let err = remove_watch(&store, "u1", "never-watched").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_preferences_default_to_empty_for_unknown_user() {
        let store: Arc<dyn DocumentStore> = Arc::new(InMemoryStore::new());
        assert!(preferences(&store, "ghost").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_preferences_round_trip() {
        let store = store_with_user("u1").await;
        let categories = vec!["technology".to_string(), "science".to_string()];
        update_preferences(&store, "u1", &categories).await.unwrap();

        let stored = preferences(&store, "u1").await.unwrap();
        assert_eq!(
            stored.to_vec(),
            vec!["science".to_string(), "technology".to_string()]
        );
    }

    #[tokio::test]
    async fn test_update_preferences_rejects_unknown_category() {
        let store = store_with_user("u1").await;
        let err = update_preferences(&store, "u1", &["gardening".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }
}
