use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Extension, Json,
};

use crate::{
    error::AppResult,
    middleware::{CurrentUser, RequestId},
    models::Video,
    routes::AppState,
};

/// Response header naming the tier that produced the feed
pub const TIER_HEADER: &str = "x-recommendation-tier";

/// Home feed: recommended videos in ranked order
///
/// Anonymous visitors and users without a profile get an empty list.
pub async fn home_feed(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    user: Option<Extension<CurrentUser>>,
) -> AppResult<Response> {
    let Some(Extension(user)) = user else {
        return Ok(Json(Vec::<Video>::new()).into_response());
    };

    let Some(profile) = state.store.get_user(user.id()).await? else {
        tracing::debug!(request_id = %request_id, user_id = %user.id(), "No profile for user");
        return Ok(Json(Vec::<Video>::new()).into_response());
    };

    let ranked = state
        .engine
        .recommend(&profile.watch_history, &profile.preferences)
        .await?;

    let videos = state.store.get_videos(&ranked.video_ids).await?;

    tracing::info!(
        request_id = %request_id,
        user_id = %user.id(),
        tier = %ranked.tier,
        ranked = ranked.video_ids.len(),
        resolved = videos.len(),
        "Home feed served"
    );

    Ok(([(TIER_HEADER, ranked.tier.as_str())], Json(videos)).into_response())
}
