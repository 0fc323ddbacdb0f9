use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    error::AppResult,
    middleware::{require_user, CurrentUser},
    models::WatchHistoryEntry,
    routes::AppState,
    services::profile,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordWatchRequest {
    pub video_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PreferencesBody {
    pub preferences: Vec<String>,
}

fn user_of(user: Option<Extension<CurrentUser>>) -> AppResult<CurrentUser> {
    require_user(user.map(|Extension(user)| user))
}

pub async fn get_watch_history(
    State(state): State<AppState>,
    user: Option<Extension<CurrentUser>>,
) -> AppResult<Json<Vec<WatchHistoryEntry>>> {
    let user = user_of(user)?;
    let history = profile::watch_history(&state.store, user.id()).await?;
    Ok(Json(history))
}

pub async fn record_watch(
    State(state): State<AppState>,
    user: Option<Extension<CurrentUser>>,
    Json(request): Json<RecordWatchRequest>,
) -> AppResult<StatusCode> {
    let user = user_of(user)?;
    profile::record_watch(&state.store, user.id(), &request.video_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn remove_watch(
    State(state): State<AppState>,
    user: Option<Extension<CurrentUser>>,
    Path(video_id): Path<String>,
) -> AppResult<StatusCode> {
    let user = user_of(user)?;
    profile::remove_watch(&state.store, user.id(), &video_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_preferences(
    State(state): State<AppState>,
    user: Option<Extension<CurrentUser>>,
) -> AppResult<Json<PreferencesBody>> {
    let user = user_of(user)?;
    let preferences = profile::preferences(&state.store, user.id()).await?;
    Ok(Json(PreferencesBody {
        preferences: preferences.to_vec(),
    }))
}

pub async fn update_preferences(
    State(state): State<AppState>,
    user: Option<Extension<CurrentUser>>,
    Json(body): Json<PreferencesBody>,
) -> AppResult<StatusCode> {
    let user = user_of(user)?;
    profile::update_preferences(&state.store, user.id(), &body.preferences).await?;
    Ok(StatusCode::NO_CONTENT)
}
