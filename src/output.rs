use crate::TranscriptEntry;
use crate::history::RecentVideo;

/// Format seconds as `m:ss`, flooring both parts
pub fn format_timestamp(start: f64) -> String {
    let total = if start.is_finite() && start > 0.0 {
        start.floor() as u64
    } else {
        0
    };
    format!("{}:{:02}", total / 60, total % 60)
}

/// Render transcript as the plain text used for copying, one `[m:ss] text` line per entry
pub fn render_text(entries: &[TranscriptEntry]) -> String {
    entries
        .iter()
        .map(|e| format!("[{}] {}\n", format_timestamp(e.start), e.text))
        .collect()
}

/// Render transcript as pretty-printed JSON
pub fn render_json(entries: &[TranscriptEntry]) -> String {
    serde_json::to_string_pretty(entries).unwrap_or_else(|_| "[]".to_string())
}

/// Render one `[m:ss] text` line per entry followed by a player URL that jumps to it
pub fn render_links(video_id: &str, entries: &[TranscriptEntry]) -> String {
    entries
        .iter()
        .map(|e| {
            // NaN start has no position to jump to
            let start = e.start.is_finite().then_some(e.start);
            format!("[{}] {}\n  {}\n", format_timestamp(e.start), e.text, embed_url(video_id, start))
        })
        .collect()
}

/// Embedded player URL, optionally starting playback at `start` seconds
pub fn embed_url(video_id: &str, start: Option<f64>) -> String {
    match start {
        Some(start) => format!("https://www.youtube.com/embed/{video_id}?start={start}&autoplay=1"),
        None => format!("https://www.youtube.com/embed/{video_id}"),
    }
}

pub fn thumbnail_url(video_id: &str) -> String {
    format!("https://img.youtube.com/vi/{video_id}/mqdefault.jpg")
}

/// Render the recent-videos list, newest first
pub fn render_recent(videos: &[RecentVideo]) -> String {
    videos
        .iter()
        .map(|v| {
            let when = chrono::DateTime::from_timestamp_millis(v.timestamp)
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default();
            format!("{}  {when}  {}\n", v.id, thumbnail_url(&v.id))
        })
        .collect()
}
