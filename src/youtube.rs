use std::sync::LazyLock;
use std::time::Duration;

use log::debug;
use regex::Regex;
use thiserror::Error;

use crate::TranscriptEntry;

pub const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

pub const DEFAULT_WATCH_URL: &str = "https://www.youtube.com/watch";

static CAPTION_TRACK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""captionTracks":\s*\[\s*\{\s*"baseUrl":\s*"([^"]+)""#).unwrap());

static START_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"start="([^"]+)""#).unwrap());

static FLOAT_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?").unwrap());

#[derive(Debug, Error)]
pub enum Error {
    #[error("no captions found for video {0}")]
    NoCaptions(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Build the shared HTTP client used for all upstream requests
pub fn build_client(timeout: Duration) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
}

/// Caption scraper for YouTube watch pages
#[derive(Debug, Clone)]
pub struct YouTube {
    client: reqwest::Client,
    watch_url: String,
}

impl YouTube {
    pub fn new(client: reqwest::Client, watch_url: impl Into<String>) -> Self {
        Self {
            client,
            watch_url: watch_url.into(),
        }
    }

    /// Find the first caption track listed on the video's watch page
    pub async fn caption_url(&self, video_id: &str) -> Result<String, Error> {
        debug!("Fetching watch page: {}?v={video_id}", self.watch_url);

        let page_html = self
            .client
            .get(&self.watch_url)
            .query(&[("v", video_id)])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        extract_caption_url(&page_html).ok_or_else(|| Error::NoCaptions(video_id.to_string()))
    }

    /// Fetch and parse the first caption track of a video
    pub async fn fetch_transcript(&self, video_id: &str) -> Result<Vec<TranscriptEntry>, Error> {
        let caption_url = self.caption_url(video_id).await?;
        debug!("Fetching caption track: {caption_url}");

        let payload = self
            .client
            .get(&caption_url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let entries = parse_transcript(&payload);
        debug!("Parsed {} transcript entries for {video_id}", entries.len());
        Ok(entries)
    }
}

/// Pull the first caption-track URL out of watch-page HTML.
///
/// The page embeds player JSON where `&` is written as `\u0026`; those are
/// turned back into `&`. Returns `None` when no track descriptor is present.
pub fn extract_caption_url(html: &str) -> Option<String> {
    let caps = CAPTION_TRACK_RE.captures(html)?;
    Some(caps[1].replace(r"\u0026", "&"))
}

/// Parse a timedtext payload made of `<text start=".." dur="..">..</text>` elements.
///
/// Works on raw substrings rather than a full XML parse: fragments without a
/// `start` attribute or without content are skipped. `dur` is ignored. A
/// non-numeric `start` becomes NaN, which serializes as `null`.
pub fn parse_transcript(payload: &str) -> Vec<TranscriptEntry> {
    let mut entries = Vec::new();

    for fragment in payload.split("<text").skip(1) {
        let Some(start) = START_RE
            .captures(fragment)
            .map(|c| parse_float_prefix(&c[1]).unwrap_or(f64::NAN))
        else {
            continue;
        };

        let text_start = fragment.find('>').map_or(0, |i| i + 1);
        let Some(text_end) = fragment.find("</text>") else {
            continue;
        };
        if text_end <= text_start {
            continue;
        }

        entries.push(TranscriptEntry {
            start,
            text: decode_entities(&fragment[text_start..text_end]),
        });
    }

    entries
}

/// Decode the five entities YouTube emits in caption text, in fixed order
pub fn decode_entities(text: &str) -> String {
    text.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
}

// Accepts the longest leading numeric prefix, so "1.5s" reads as 1.5
fn parse_float_prefix(s: &str) -> Option<f64> {
    let m = FLOAT_PREFIX_RE.find(s)?;
    m.as_str().trim().parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_caption_url() {
        let html = r#"var ytInitialPlayerResponse = {"captions":{"playerCaptionsTracklistRenderer":{"captionTracks":[{"baseUrl":"https://www.youtube.com/api/timedtext?v=abc\u0026lang=en","name":{"simpleText":"English"}}]}}};"#;
        assert_eq!(
            extract_caption_url(html).as_deref(),
            Some("https://www.youtube.com/api/timedtext?v=abc&lang=en")
        );
    }

    #[test]
    fn test_extract_caption_url_whitespace() {
        let html = r#""captionTracks" : [ { "baseUrl" : "https://example.com/tt""#;
        assert!(extract_caption_url(html).is_none());

        let html = r#""captionTracks": [ { "baseUrl": "https://example.com/tt"}]"#;
        assert_eq!(extract_caption_url(html).as_deref(), Some("https://example.com/tt"));
    }

    #[test]
    fn test_extract_caption_url_takes_first_track() {
        let html = r#""captionTracks":[{"baseUrl":"https://example.com/first"},{"baseUrl":"https://example.com/second"}]"#;
        assert_eq!(extract_caption_url(html).as_deref(), Some("https://example.com/first"));
    }

    #[test]
    fn test_extract_caption_url_missing() {
        let html = "<html><body>no captions here</body></html>";
        assert!(extract_caption_url(html).is_none());
    }

    #[test]
    fn test_parse_transcript_basic() {
        let xml = r#"<?xml version="1.0" encoding="utf-8" ?>
<transcript>
    <text start="0.21" dur="2.34">Hello world</text>
    <text start="2.55" dur="1.50">This is a test</text>
</transcript>"#;

        let entries = parse_transcript(xml);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].text, "Hello world");
        assert!((entries[0].start - 0.21).abs() < f64::EPSILON);
        assert_eq!(entries[1].text, "This is a test");
        assert!((entries[1].start - 2.55).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_transcript_decodes_entities() {
        let xml = r#"<transcript><text start="12.5" dur="3">Hello &amp; world</text></transcript>"#;
        let entries = parse_transcript(xml);
        assert_eq!(
            entries,
            vec![TranscriptEntry {
                start: 12.5,
                text: "Hello & world".to_string(),
            }]
        );
    }

    #[test]
    fn test_decode_entities_all_five() {
        assert_eq!(decode_entities("&amp;&lt;&gt;&quot;&#39;"), "&<>\"'");
    }

    #[test]
    fn test_decode_entities_leaves_others_alone() {
        assert_eq!(decode_entities("&nbsp;&#x27;&apos;"), "&nbsp;&#x27;&apos;");
    }

    #[test]
    fn test_decode_entities_ampersand_first() {
        // &amp; is decoded before the others, so a double-escaped entity collapses
        assert_eq!(decode_entities("&amp;#39;"), "'");
    }

    #[test]
    fn test_parse_transcript_empty() {
        assert!(parse_transcript("").is_empty());
        assert!(parse_transcript(r#"<?xml version="1.0" ?><transcript></transcript>"#).is_empty());
    }

    #[test]
    fn test_parse_transcript_skips_missing_start() {
        let xml = r#"<transcript><text dur="1">no start</text><text start="4" dur="1">kept</text></transcript>"#;
        let entries = parse_transcript(xml);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].text, "kept");
    }

    #[test]
    fn test_parse_transcript_skips_self_closing() {
        let xml = r#"<transcript><text start="1" dur="1"/><text start="2" dur="1">after</text></transcript>"#;
        let entries = parse_transcript(xml);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].text, "after");
        assert!((entries[0].start - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_transcript_keeps_non_numeric_start() {
        let xml = r#"<transcript><text start="abc" dur="1">Hi</text><text start="3" dur="1">there</text></transcript>"#;
        let entries = parse_transcript(xml);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].text, "Hi");
        assert!(entries[0].start.is_nan());
        assert_eq!(entries[1].start, 3.0);

        let json = serde_json::to_value(&entries[0]).unwrap();
        assert_eq!(json, serde_json::json!({"start": null, "text": "Hi"}));
    }

    #[test]
    fn test_parse_transcript_skips_empty_content() {
        let xml = r#"<text start="1" dur="1"></text>"#;
        assert!(parse_transcript(xml).is_empty());
    }

    #[test]
    fn test_parse_transcript_is_deterministic() {
        let xml = r#"<transcript><text start="0" dur="2">Hi</text><text start="2" dur="2">there &#39;you&#39;</text></transcript>"#;
        assert_eq!(parse_transcript(xml), parse_transcript(xml));
    }

    #[test]
    fn test_parse_float_prefix() {
        assert_eq!(parse_float_prefix("12.5"), Some(12.5));
        assert_eq!(parse_float_prefix("3s"), Some(3.0));
        assert_eq!(parse_float_prefix(".5"), Some(0.5));
        assert_eq!(parse_float_prefix("abc"), None);
    }
}
