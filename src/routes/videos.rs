use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::{Video, VideoDetails},
    routes::AppState,
};

const DEFAULT_LIST_LIMIT: usize = 50;
const MAX_LIST_LIMIT: usize = 200;

#[derive(Debug, Deserialize)]
pub struct ListVideosQuery {
    q: Option<String>,
    limit: Option<usize>,
}

/// Handler for listing or searching the catalog
pub async fn list_videos(
    State(state): State<AppState>,
    Query(params): Query<ListVideosQuery>,
) -> AppResult<Json<Vec<Video>>> {
    let query = params
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty());
    let limit = params
        .limit
        .unwrap_or(DEFAULT_LIST_LIMIT)
        .clamp(1, MAX_LIST_LIMIT);

    let videos = state.store.list_videos(query, limit).await?;
    tracing::debug!(query = ?query, returned = videos.len(), "Catalog listed");
    Ok(Json(videos))
}

/// Handler for a single catalog video
pub async fn get_video(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
) -> AppResult<Json<Video>> {
    state
        .store
        .get_video(&video_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Video {} not found", video_id)))
}

/// Handler for YouTube metadata of a video id
pub async fn video_details(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
) -> AppResult<Json<VideoDetails>> {
    let provider = state.metadata.as_ref().ok_or_else(|| {
        AppError::LookupUnavailable("video metadata provider is not configured".to_string())
    })?;

    provider
        .fetch_video_details(&video_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("No {} video {}", provider.name(), video_id)))
}
