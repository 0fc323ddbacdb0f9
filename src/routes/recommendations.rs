use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::SimilarityEdge,
    routes::AppState,
};

#[derive(Debug, Deserialize)]
pub struct SimilarQuery {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

/// Handler for the similar-videos endpoint
pub async fn similar_videos(
    State(state): State<AppState>,
    Query(params): Query<SimilarQuery>,
) -> AppResult<Json<Vec<SimilarityEdge>>> {
    let video_id = params
        .video_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::InvalidInput("videoId query parameter is required".to_string()))?;

    let similar = state.gateway.lookup(video_id).await?;
    Ok(Json(similar))
}
