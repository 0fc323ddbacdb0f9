use std::sync::Arc;

use crate::{
    cached,
    db::{Cache, CacheKey, DocumentStore},
    error::{AppError, AppResult},
    models::SimilarityEdge,
};

/// Lookup of a video's precomputed similarity list
///
/// A video with no similarity record yields an empty list. A backend failure
/// is reported as [`AppError::LookupUnavailable`] and is never turned into an
/// empty list.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait SimilarityGateway: Send + Sync {
    async fn lookup(&self, video_id: &str) -> AppResult<Vec<SimilarityEdge>>;
}

/// Gateway reading the `recommendations` records of the document store
#[derive(Clone)]
pub struct StoreSimilarityGateway {
    store: Arc<dyn DocumentStore>,
}

impl StoreSimilarityGateway {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

#[async_trait::async_trait]
impl SimilarityGateway for StoreSimilarityGateway {
    async fn lookup(&self, video_id: &str) -> AppResult<Vec<SimilarityEdge>> {
        match self.store.get_similar(video_id).await {
            Ok(Some(similar)) => Ok(similar),
            Ok(None) => {
                tracing::debug!(video_id = %video_id, "No similarity record");
                Ok(Vec::new())
            }
            Err(e) => {
                tracing::warn!(video_id = %video_id, error = %e, "Similarity store lookup failed");
                Err(AppError::LookupUnavailable(e.to_string()))
            }
        }
    }
}

/// An empty list is not cached, so a similarity list generated after a video's
/// first lookup is picked up on the next request.
fn is_cacheable(edges: &[SimilarityEdge]) -> bool {
    !edges.is_empty()
}

/// Gateway decorator keeping non-empty similarity lists in Redis for `ttl` seconds
#[derive(Clone)]
pub struct CachedSimilarityGateway {
    inner: Arc<dyn SimilarityGateway>,
    cache: Cache,
    ttl: u64,
}

impl CachedSimilarityGateway {
    pub fn new(inner: Arc<dyn SimilarityGateway>, cache: Cache, ttl: u64) -> Self {
        Self { inner, cache, ttl }
    }
}

#[async_trait::async_trait]
impl SimilarityGateway for CachedSimilarityGateway {
    async fn lookup(&self, video_id: &str) -> AppResult<Vec<SimilarityEdge>> {
        cached!(
            self.cache,
            CacheKey::Similar(video_id.to_string()),
            self.ttl,
            self.inner.lookup(video_id),
            is_cacheable
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::InMemoryStore;
    use crate::models::{UserPreferences, UserProfile, Video};
    use chrono::{DateTime, Utc};

    /// Store whose every read fails as if the database were down
    struct BrokenStore;

    #[async_trait::async_trait]
    impl DocumentStore for BrokenStore {
        async fn get_user(&self, _: &str) -> AppResult<Option<UserProfile>> {
            Err(AppError::Database(sqlx::Error::PoolTimedOut))
        }
        async fn get_similar(&self, _: &str) -> AppResult<Option<Vec<SimilarityEdge>>> {
            Err(AppError::Database(sqlx::Error::PoolTimedOut))
        }
        async fn get_video(&self, _: &str) -> AppResult<Option<Video>> {
            Err(AppError::Database(sqlx::Error::PoolTimedOut))
        }
        async fn get_videos(&self, _: &[String]) -> AppResult<Vec<Video>> {
            Err(AppError::Database(sqlx::Error::PoolTimedOut))
        }
        async fn list_videos(&self, _: Option<&str>, _: usize) -> AppResult<Vec<Video>> {
            Err(AppError::Database(sqlx::Error::PoolTimedOut))
        }
        async fn record_watch(&self, _: &str, _: &str, _: DateTime<Utc>) -> AppResult<()> {
            Err(AppError::Database(sqlx::Error::PoolTimedOut))
        }
        async fn remove_watch(&self, _: &str, _: &str) -> AppResult<bool> {
            Err(AppError::Database(sqlx::Error::PoolTimedOut))
        }
        async fn set_preferences(&self, _: &str, _: &UserPreferences) -> AppResult<()> {
            Err(AppError::Database(sqlx::Error::PoolTimedOut))
        }
    }

    #[tokio::test]
    async fn test_lookup_returns_stored_list() {
        let store = InMemoryStore::new();
        store
            .insert_similar(
                "a",
                vec![SimilarityEdge::new("x", 3.0), SimilarityEdge::new("y", 1.0)],
            )
            .await;
        let gateway = StoreSimilarityGateway::new(Arc::new(store));

        let edges = gateway.lookup("a").await.unwrap();
        assert_eq!(
            edges,
            vec![SimilarityEdge::new("x", 3.0), SimilarityEdge::new("y", 1.0)]
        );
    }

    #[tokio::test]
    async fn test_missing_record_is_empty_not_error() {
        let gateway = StoreSimilarityGateway::new(Arc::new(InMemoryStore::new()));
        let edges = gateway.lookup("just-uploaded").await.unwrap();
        assert!(edges.is_empty());
    }

    #[tokio::test]
    async fn test_store_failure_is_lookup_unavailable() {
        let gateway = StoreSimilarityGateway::new(Arc::new(BrokenStore));
        let err = gateway.lookup("a").await.unwrap_err();
        assert!(matches!(err, AppError::LookupUnavailable(_)));
    }

    #[test]
    fn test_empty_list_not_cacheable() {
        assert!(!is_cacheable(&[]));
        assert!(is_cacheable(&[SimilarityEdge::new("x", 1.0)]));
    }

    #[tokio::test]
    async fn test_lookup_is_idempotent() {
        let store = InMemoryStore::new();
        store
            .insert_similar("a", vec![SimilarityEdge::new("x", 0.5)])
            .await;
        let gateway = StoreSimilarityGateway::new(Arc::new(store));

        let first = gateway.lookup("a").await.unwrap();
        let second = gateway.lookup("a").await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    #[ignore = "requires a running Redis"]
    async fn test_cached_gateway_picks_up_late_similarity_list() {
        let redis_url =
            std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());
        let client = crate::db::create_redis_client(&redis_url).unwrap();
        let (cache, handle) = Cache::connect(client).await.unwrap();

        let store = InMemoryStore::new();
        let video_id = format!("late-upload-{}", uuid::Uuid::new_v4());
        let inner = Arc::new(StoreSimilarityGateway::new(Arc::new(store.clone())));
        let gateway = CachedSimilarityGateway::new(inner, cache, 60);

        assert!(gateway.lookup(&video_id).await.unwrap().is_empty());
        handle.shutdown().await;

        store
            .insert_similar(video_id.as_str(), vec![SimilarityEdge::new("x", 1.0)])
            .await;
        assert_eq!(
            gateway.lookup(&video_id).await.unwrap(),
            vec![SimilarityEdge::new("x", 1.0)]
        );
    }
}
