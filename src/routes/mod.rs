use axum::{
    http::StatusCode,
    middleware::from_fn,
    routing::{delete, get},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::{
    db::{DocumentStore, TrendingSource},
    middleware::{current_user_middleware, make_span_with_request_id, request_id_middleware},
    services::{
        providers::MetadataProvider, RecommendOptions, RecommendationEngine, SimilarityGateway,
    },
};

pub mod home;
pub mod profile;
pub mod recommendations;
pub mod videos;

/// Shared handles for all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub gateway: Arc<dyn SimilarityGateway>,
    pub engine: RecommendationEngine,
    pub metadata: Option<Arc<dyn MetadataProvider>>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        trending: Arc<dyn TrendingSource>,
        gateway: Arc<dyn SimilarityGateway>,
        options: RecommendOptions,
    ) -> Self {
        let engine = RecommendationEngine::new(gateway.clone(), trending, options);
        Self {
            store,
            gateway,
            engine,
            metadata: None,
        }
    }

    pub fn with_metadata(mut self, provider: Arc<dyn MetadataProvider>) -> Self {
        self.metadata = Some(provider);
        self
    }
}

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/recommendations", get(recommendations::similar_videos))
        .route("/home", get(home::home_feed))
        .route("/videos", get(videos::list_videos))
        .route("/videos/:video_id", get(videos::get_video))
        .route("/videos/:video_id/details", get(videos::video_details))
        .route(
            "/watch-history",
            get(profile::get_watch_history).post(profile::record_watch),
        )
        .route("/watch-history/:video_id", delete(profile::remove_watch))
        .route(
            "/preferences",
            get(profile::get_preferences).put(profile::update_preferences),
        )
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(from_fn(current_user_middleware)),
        )
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
