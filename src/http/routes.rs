//! Axum router configuration

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};

use super::AppState;
use super::handlers::{missing_video_id, transcript, video_info};

/// Create the Axum router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    let index = ServeFile::new(state.static_dir.join("index.html"));
    let static_files = ServeDir::new(&state.static_dir).fallback(index);

    Router::new()
        .route("/api/transcript", get(missing_video_id))
        .route("/api/transcript/", get(missing_video_id))
        .route("/api/transcript/{video_id}", get(transcript))
        .route("/api/video-info/{video_id}", get(video_info))
        .fallback_service(static_files)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
