use log::debug;
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_DATA_API_URL: &str = "https://www.googleapis.com/youtube/v3/videos";

#[derive(Debug, Error)]
pub enum Error {
    #[error("YOUTUBE_API_KEY is not configured")]
    MissingApiKey,

    #[error("video {0} not found")]
    VideoNotFound(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, Deserialize)]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    #[serde(default)]
    snippet: serde_json::Value,
}

/// Client for the YouTube Data API `videos` lookup
#[derive(Debug, Clone)]
pub struct Metadata {
    client: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
}

impl Metadata {
    pub fn new(client: reqwest::Client, api_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client,
            api_url: api_url.into(),
            api_key,
        }
    }

    /// Look up a video's `snippet`, passed through as raw JSON
    pub async fn video_info(&self, video_id: &str) -> Result<serde_json::Value, Error> {
        let api_key = self.api_key.as_deref().ok_or(Error::MissingApiKey)?;
        debug!("Looking up video info for {video_id}");

        let resp: VideoListResponse = self
            .client
            .get(&self.api_url)
            .query(&[("id", video_id), ("part", "snippet"), ("key", api_key)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        first_snippet(resp).ok_or_else(|| Error::VideoNotFound(video_id.to_string()))
    }
}

fn first_snippet(resp: VideoListResponse) -> Option<serde_json::Value> {
    resp.items.into_iter().next().map(|item| item.snippet)
}
