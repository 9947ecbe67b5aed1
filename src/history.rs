use eyre::Result;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::store::Store;

pub const RECENT_VIDEOS_KEY: &str = "recentVideos";
pub const THEME_KEY: &str = "theme";
pub const MAX_RECENT_VIDEOS: usize = 10;

/// A video the user has viewed, with the time it was last fetched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentVideo {
    pub id: String,
    /// Unix time in milliseconds
    pub timestamp: i64,
}

/// Most-recent-first list of viewed videos, capped at [`MAX_RECENT_VIDEOS`]
pub struct RecentVideos<'a, S: Store + ?Sized> {
    store: &'a S,
}

impl<'a, S: Store + ?Sized> RecentVideos<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Read the stored list; a missing or unreadable value counts as empty
    pub fn load(&self) -> Vec<RecentVideo> {
        let Some(raw) = self.store.get(RECENT_VIDEOS_KEY) else {
            return Vec::new();
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            debug!("Discarding malformed {RECENT_VIDEOS_KEY}: {e}");
            Vec::new()
        })
    }

    /// Move `id` to the front (or insert it) and persist the trimmed list
    pub fn record(&self, id: &str, now_millis: i64) -> Result<Vec<RecentVideo>> {
        let mut videos = self.load();
        push_front(&mut videos, id, now_millis);
        self.store.set(RECENT_VIDEOS_KEY, &serde_json::to_string(&videos)?)?;
        Ok(videos)
    }

    pub fn clear(&self) -> Result<()> {
        self.store.remove(RECENT_VIDEOS_KEY)
    }
}

fn push_front(videos: &mut Vec<RecentVideo>, id: &str, now_millis: i64) {
    videos.retain(|v| v.id != id);
    videos.insert(
        0,
        RecentVideo {
            id: id.to_string(),
            timestamp: now_millis,
        },
    );
    videos.truncate(MAX_RECENT_VIDEOS);
}

/// UI colour scheme preference
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn load(store: &(impl Store + ?Sized)) -> Self {
        store.get(THEME_KEY).and_then(|s| s.parse().ok()).unwrap_or_default()
    }

    pub fn save(self, store: &(impl Store + ?Sized)) -> Result<()> {
        store.set(THEME_KEY, self.as_str())
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl std::str::FromStr for Theme {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => eyre::bail!("unknown theme: {other}"),
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn id(n: usize) -> String {
        format!("video{n:06}")
    }

    #[test]
    fn test_record_keeps_last_ten_most_recent_first() {
        let store = MemoryStore::new();
        let recent = RecentVideos::new(&store);

        for n in 0..11 {
            recent.record(&id(n), n as i64).unwrap();
        }

        let ids: Vec<String> = recent.load().into_iter().map(|v| v.id).collect();
        let expected: Vec<String> = (1..11).rev().map(id).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_record_existing_moves_to_front() {
        let store = MemoryStore::new();
        let recent = RecentVideos::new(&store);

        for n in 0..3 {
            recent.record(&id(n), n as i64).unwrap();
        }
        let videos = recent.record(&id(0), 100).unwrap();

        assert_eq!(videos.len(), 3);
        assert_eq!(videos[0], RecentVideo { id: id(0), timestamp: 100 });
        assert_eq!(videos[1].id, id(2));
        assert_eq!(videos[2].id, id(1));
    }

    #[test]
    fn test_stored_format() {
        let store = MemoryStore::new();
        RecentVideos::new(&store).record("dQw4w9WgXcQ", 1700000000000).unwrap();
        assert_eq!(
            store.get(RECENT_VIDEOS_KEY).as_deref(),
            Some(r#"[{"id":"dQw4w9WgXcQ","timestamp":1700000000000}]"#)
        );
    }

    #[test]
    fn test_load_malformed_is_empty() {
        let store = MemoryStore::new();
        store.set(RECENT_VIDEOS_KEY, "null").unwrap();
        assert!(RecentVideos::new(&store).load().is_empty());
        store.set(RECENT_VIDEOS_KEY, "{oops").unwrap();
        assert!(RecentVideos::new(&store).load().is_empty());
    }

    #[test]
    fn test_clear() {
        let store = MemoryStore::new();
        let recent = RecentVideos::new(&store);
        recent.record("dQw4w9WgXcQ", 1).unwrap();
        recent.clear().unwrap();
        assert!(recent.load().is_empty());
    }

    #[test]
    fn test_theme_defaults_to_light() {
        let store = MemoryStore::new();
        assert_eq!(Theme::load(&store), Theme::Light);
        store.set(THEME_KEY, "sepia").unwrap();
        assert_eq!(Theme::load(&store), Theme::Light);
    }

    #[test]
    fn test_theme_toggle_roundtrip() {
        let store = MemoryStore::new();
        let theme = Theme::load(&store).toggled();
        theme.save(&store).unwrap();
        assert_eq!(store.get(THEME_KEY).as_deref(), Some("dark"));
        assert_eq!(Theme::load(&store), Theme::Dark);
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
    }
}
