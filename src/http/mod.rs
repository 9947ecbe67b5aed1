//! Relay HTTP server
//!
//! - `GET /api/transcript/{videoId}` scrapes and parses the first caption track
//! - `GET /api/video-info/{videoId}` passes through the Data API snippet
//! - everything else is served from the static directory, falling back to `index.html`

pub mod handlers;
pub mod routes;

use std::path::PathBuf;

use crate::config::Config;
use crate::metadata::Metadata;
use crate::youtube::YouTube;

pub use handlers::ApiError;
pub use routes::create_router;

/// Shared, read-only state for all handlers
#[derive(Debug, Clone)]
pub struct AppState {
    pub youtube: YouTube,
    pub metadata: Metadata,
    pub static_dir: PathBuf,
}

impl AppState {
    pub fn new(client: reqwest::Client, config: &Config) -> Self {
        Self {
            youtube: YouTube::new(client.clone(), config.watch_url.clone()),
            metadata: Metadata::new(client, config.data_api_url.clone(), config.youtube_api_key.clone()),
            static_dir: config.static_dir.clone(),
        }
    }
}
