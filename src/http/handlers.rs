use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::{error, info, warn};
use serde::Serialize;

use super::AppState;
use crate::{TranscriptEntry, metadata, youtube};

/// JSON error body: `{"error": ..., "message": ...}`
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    pub status: StatusCode,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ApiError {
    fn new(status: StatusCode, error: &str) -> Self {
        Self {
            status,
            error: error.to_string(),
            message: None,
        }
    }

    pub fn missing_video_id() -> Self {
        Self::new(StatusCode::BAD_REQUEST, "Video ID is required")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

impl From<youtube::Error> for ApiError {
    fn from(err: youtube::Error) -> Self {
        match err {
            youtube::Error::NoCaptions(_) => Self::new(StatusCode::NOT_FOUND, "No captions found for this video"),
            youtube::Error::Http(e) => Self {
                message: Some(e.to_string()),
                ..Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch transcript")
            },
        }
    }
}

impl From<metadata::Error> for ApiError {
    fn from(err: metadata::Error) -> Self {
        match err {
            metadata::Error::VideoNotFound(_) => Self::new(StatusCode::NOT_FOUND, "Video not found"),
            metadata::Error::MissingApiKey | metadata::Error::Http(_) => {
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch video info")
            }
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TranscriptResponse {
    pub transcript: Vec<TranscriptEntry>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoInfoResponse {
    pub video_info: serde_json::Value,
}

pub async fn transcript(
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<String>,
) -> Result<Json<TranscriptResponse>, ApiError> {
    let video_id = video_id.trim();
    if video_id.is_empty() {
        return Err(ApiError::missing_video_id());
    }
    info!("GET transcript {video_id}");

    match state.youtube.fetch_transcript(video_id).await {
        Ok(transcript) => Ok(Json(TranscriptResponse { transcript })),
        Err(e @ youtube::Error::NoCaptions(_)) => {
            warn!("{e}");
            Err(e.into())
        }
        Err(e) => {
            error!("Error fetching transcript for {video_id}: {e}");
            Err(e.into())
        }
    }
}

pub async fn missing_video_id() -> ApiError {
    ApiError::missing_video_id()
}

pub async fn video_info(
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<String>,
) -> Result<Json<VideoInfoResponse>, ApiError> {
    info!("GET video-info {video_id}");

    match state.metadata.video_info(video_id.trim()).await {
        Ok(video_info) => Ok(Json(VideoInfoResponse { video_info })),
        Err(e) => {
            error!("Error fetching video info for {video_id}: {e}");
            Err(e.into())
        }
    }
}
