pub mod client;
pub mod config;
pub mod history;
pub mod http;
pub mod metadata;
pub mod output;
pub mod store;
pub mod youtube;

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};

/// A single timed line of a caption track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    /// Seconds from the start of the video; NaN (`null` on the wire) when the track gave no number
    #[serde(deserialize_with = "nullable_seconds")]
    pub start: f64,
    pub text: String,
}

fn nullable_seconds<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

static URL_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:https?://)?(?:www\.)?(?:youtube\.com/(?:[^/\n\s]+/\S+/|(?:v|e(?:mbed)?|shorts)/|\S*?[?&]v=)|youtu\.be/)([a-zA-Z0-9_-]{11})",
    )
    .unwrap()
});

static BARE_ID_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_-]{11}$").unwrap());

/// Extract video ID from a YouTube URL or a bare 11-character ID
pub fn extract_video_id(input: &str) -> Option<String> {
    let input = input.trim();

    if let Some(caps) = URL_ID_RE.captures(input) {
        return Some(caps[1].to_string());
    }

    if BARE_ID_RE.is_match(input) {
        return Some(input.to_string());
    }

    None
}
