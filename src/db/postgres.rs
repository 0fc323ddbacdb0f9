use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPoolOptions, types::Json, PgPool};
use std::collections::HashMap;

use crate::{
    db::store::{DocumentStore, TrendingSource},
    error::{AppError, AppResult},
    models::{SimilarityEdge, UserPreferences, UserProfile, Video, WatchHistoryEntry},
};

const VIDEO_COLUMNS: &str = "video_id, title, video_url, thumbnail_url, published_at, sub_category";

/// Creates a PostgreSQL connection pool
///
/// Establishes a pool of database connections for efficient reuse.
/// The pool automatically manages connection lifecycle and limits.
pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(std::time::Duration::from_secs(5))
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// Applies the schema in `migrations/`
pub async fn run_migrations(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Escapes `LIKE` wildcards so user input matches literally
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Document store backed by PostgreSQL
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl DocumentStore for PostgresStore {
    async fn get_user(&self, user_id: &str) -> AppResult<Option<UserProfile>> {
        let row: Option<(Vec<String>,)> =
            sqlx::query_as("SELECT preferences FROM users WHERE id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;

        let Some((preferences,)) = row else {
            return Ok(None);
        };

        let watch_history: Vec<WatchHistoryEntry> = sqlx::query_as(
            "SELECT video_id, watched_at FROM watch_history WHERE user_id = $1 ORDER BY watched_at ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(UserProfile {
            user_id: user_id.to_string(),
            watch_history,
            preferences: preferences.into_iter().collect(),
        }))
    }

    async fn get_similar(&self, video_id: &str) -> AppResult<Option<Vec<SimilarityEdge>>> {
        let row: Option<(Json<Vec<SimilarityEdge>>,)> =
            sqlx::query_as("SELECT similar FROM recommendations WHERE video_id = $1")
                .bind(video_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(|(Json(similar),)| similar))
    }

    async fn get_video(&self, video_id: &str) -> AppResult<Option<Video>> {
        let video = sqlx::query_as::<_, Video>(&format!(
            "SELECT {} FROM videos WHERE video_id = $1",
            VIDEO_COLUMNS
        ))
        .bind(video_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(video)
    }

    async fn get_videos(&self, video_ids: &[String]) -> AppResult<Vec<Video>> {
        if video_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, Video>(&format!(
            "SELECT {} FROM videos WHERE video_id = ANY($1)",
            VIDEO_COLUMNS
        ))
        .bind(video_ids.to_vec())
        .fetch_all(&self.pool)
        .await?;

        let mut by_id: HashMap<String, Video> = rows
            .into_iter()
            .map(|video| (video.video_id.clone(), video))
            .collect();

        Ok(video_ids.iter().filter_map(|id| by_id.remove(id)).collect())
    }

    async fn list_videos(&self, query: Option<&str>, limit: usize) -> AppResult<Vec<Video>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        let videos = match query {
            Some(query) => {
                let pattern = format!("%{}%", escape_like(query));
                sqlx::query_as::<_, Video>(&format!(
                    r#"
                    SELECT {} FROM videos
                    WHERE title ILIKE $1 OR sub_category ILIKE $1
                    ORDER BY published_at DESC, video_id ASC
                    LIMIT $2
                    "#,
                    VIDEO_COLUMNS
                ))
                .bind(pattern)
                .bind(limit)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Video>(&format!(
                    "SELECT {} FROM videos ORDER BY published_at DESC, video_id ASC LIMIT $1",
                    VIDEO_COLUMNS
                ))
                .bind(limit)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(videos)
    }

    async fn record_watch(
        &self,
        user_id: &str,
        video_id: &str,
        watched_at: DateTime<Utc>,
    ) -> AppResult<()> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        if !exists {
            return Err(AppError::NotFound(format!("User {} not found", user_id)));
        }

        sqlx::query(
            r#"
            INSERT INTO watch_history (user_id, video_id, watched_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, video_id) DO UPDATE SET watched_at = EXCLUDED.watched_at
            "#,
        )
        .bind(user_id)
        .bind(video_id)
        .bind(watched_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn remove_watch(&self, user_id: &str, video_id: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM watch_history WHERE user_id = $1 AND video_id = $2")
            .bind(user_id)
            .bind(video_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn set_preferences(
        &self,
        user_id: &str,
        preferences: &UserPreferences,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, preferences)
            VALUES ($1, $2)
            ON CONFLICT (id) DO UPDATE SET preferences = EXCLUDED.preferences, updated_at = now()
            "#,
        )
        .bind(user_id)
        .bind(preferences.to_vec())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait::async_trait]
impl TrendingSource for PostgresStore {
    async fn trending_video_ids(
        &self,
        categories: &UserPreferences,
        limit: usize,
    ) -> AppResult<Vec<String>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        let ids = if categories.is_empty() {
            sqlx::query_scalar::<_, String>(
                "SELECT video_id FROM videos ORDER BY published_at DESC, video_id ASC LIMIT $1",
            )
            .bind(limit)
            .fetch_all(&self.pool)
            .await?
        } else {
            sqlx::query_scalar::<_, String>(
                r#"
                SELECT video_id FROM videos
                WHERE sub_category = ANY($1)
                ORDER BY published_at DESC, video_id ASC
                LIMIT $2
                "#,
            )
            .bind(categories.to_vec())
            .bind(limit)
            .fetch_all(&self.pool)
            .await?
        };

        Ok(ids)
    }
}
