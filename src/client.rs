use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, info};
use serde::Deserialize;
use thiserror::Error;

use crate::history::RecentVideos;
use crate::store::Store;
use crate::youtube::{self, YouTube};
use crate::{TranscriptEntry, extract_video_id};

/// Causes listed under a failed fetch
pub const FAILURE_HINTS: [&str; 4] = [
    "The video doesn't have closed captions",
    "The video ID is incorrect",
    "The backend server is not running",
    "There was a network error",
];

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Please enter a valid YouTube URL or video ID.")]
    InvalidInput,

    #[error("A transcript request is already in progress")]
    Busy,

    #[error("No transcript available for this video.")]
    NoTranscript,

    #[error("Error: {status}{}", relay_detail(.message))]
    Relay { status: u16, message: Option<String> },

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Scrape(#[from] youtube::Error),

    #[error("could not update history: {0}")]
    Store(#[from] eyre::Report),
}

fn relay_detail(message: &Option<String>) -> String {
    message.as_deref().map(|m| format!(" ({m})")).unwrap_or_default()
}

impl ClientError {
    /// Whether the failure came from fetching rather than from user input or local state
    pub fn is_fetch_failure(&self) -> bool {
        matches!(self, ClientError::Relay { .. } | ClientError::Http(_) | ClientError::Scrape(_))
    }
}

#[derive(Debug, Deserialize)]
struct TranscriptResponse {
    #[serde(default)]
    transcript: Vec<TranscriptEntry>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: Option<String>,
    message: Option<String>,
}

/// HTTP client for a running relay
#[derive(Debug, Clone)]
pub struct RelayClient {
    client: reqwest::Client,
    base_url: String,
}

impl RelayClient {
    /// `base_url` is the relay root, e.g. `http://localhost:5000`
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn transcript(&self, video_id: &str) -> Result<Vec<TranscriptEntry>, ClientError> {
        let url = format!("{}/api/transcript/{video_id}", self.base_url);
        debug!("Requesting {url}");

        let resp = self.client.get(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let message = resp
                .json::<ErrorResponse>()
                .await
                .ok()
                .and_then(|body| body.message.or(body.error));
            return Err(ClientError::Relay {
                status: status.as_u16(),
                message,
            });
        }

        let body: TranscriptResponse = resp.json().await?;
        Ok(body.transcript)
    }
}

/// Where transcripts come from
#[derive(Debug, Clone)]
pub enum Backend {
    Relay(RelayClient),
    Direct(YouTube),
}

impl Backend {
    async fn transcript(&self, video_id: &str) -> Result<Vec<TranscriptEntry>, ClientError> {
        match self {
            Backend::Relay(relay) => relay.transcript(video_id).await,
            Backend::Direct(youtube) => Ok(youtube.fetch_transcript(video_id).await?),
        }
    }
}

/// A fetched, non-empty transcript
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptView {
    pub video_id: String,
    pub entries: Vec<TranscriptEntry>,
}

/// Client-side orchestration: input parsing, fetching and history.
///
/// Only one fetch may be outstanding; a second call while one is running is
/// rejected with [`ClientError::Busy`].
pub struct Viewer<S: Store> {
    backend: Backend,
    store: S,
    busy: AtomicBool,
}

struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<S: Store> Viewer<S> {
    pub fn new(backend: Backend, store: S) -> Self {
        Self {
            backend,
            store,
            busy: AtomicBool::new(false),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub async fn fetch(&self, input: &str) -> Result<TranscriptView, ClientError> {
        let video_id = extract_video_id(input).ok_or(ClientError::InvalidInput)?;

        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(ClientError::Busy);
        }
        let _guard = BusyGuard(&self.busy);

        let entries = self.backend.transcript(&video_id).await?;
        if entries.is_empty() {
            return Err(ClientError::NoTranscript);
        }

        RecentVideos::new(&self.store).record(&video_id, chrono::Utc::now().timestamp_millis())?;
        info!("Fetched {} transcript entries for {video_id}", entries.len());

        Ok(TranscriptView { video_id, entries })
    }
}

/// User-facing description of a failure, with likely causes for fetch errors
pub fn describe_error(err: &ClientError) -> String {
    if !err.is_fetch_failure() {
        return err.to_string();
    }
    let mut text = format!("Error fetching transcript: {err}\nThis could be because:\n");
    for hint in FAILURE_HINTS {
        text.push_str(&format!("  - {hint}\n"));
    }
    text
}
