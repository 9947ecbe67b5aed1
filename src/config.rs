use std::path::{Path, PathBuf};
use std::time::Duration;

use eyre::Result;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::metadata::DEFAULT_DATA_API_URL;
use crate::youtube::DEFAULT_WATCH_URL;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub static_dir: PathBuf,
    pub request_timeout_secs: u64,
    pub youtube_api_key: Option<String>,
    pub watch_url: String,
    pub data_api_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            static_dir: PathBuf::from("public"),
            request_timeout_secs: 30,
            youtube_api_key: None,
            watch_url: DEFAULT_WATCH_URL.to_string(),
            data_api_url: DEFAULT_DATA_API_URL.to_string(),
        }
    }
}

impl Config {
    /// Load config from ~/.config/ytview/config.toml if it exists
    pub fn load() -> Result<Self> {
        Self::load_from(&config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            debug!("Loading config from {}", path.display());
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            debug!("No config file found at {}", path.display());
            Ok(Config::default())
        }
    }

    /// Apply `PORT` and `YOUTUBE_API_KEY` overrides
    pub fn with_env(self) -> Self {
        self.with_vars(|name| std::env::var(name).ok())
    }

    fn with_vars(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(port) = var("PORT").and_then(|p| p.trim().parse().ok()) {
            self.port = port;
        }
        if let Some(key) = var("YOUTUBE_API_KEY").filter(|k| !k.trim().is_empty()) {
            self.youtube_api_key = Some(key);
        }
        self
    }

    /// Apply command-line flags, which take priority over env and config file
    pub fn with_overrides(mut self, host: Option<String>, port: Option<u16>, static_dir: Option<PathBuf>) -> Self {
        if let Some(host) = host {
            self.host = host;
        }
        if let Some(port) = port {
            self.port = port;
        }
        if let Some(static_dir) = static_dir {
            self.static_dir = static_dir;
        }
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from(".config"))
        .join("ytview")
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml_str = r#"
host = "127.0.0.1"
port = 8080
static_dir = "/srv/ytview"
request_timeout_secs = 5
youtube_api_key = "AIzaSyB123"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.static_dir, PathBuf::from("/srv/ytview"));
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        assert_eq!(config.youtube_api_key.as_deref(), Some("AIzaSyB123"));
        assert_eq!(config.watch_url, DEFAULT_WATCH_URL);
    }

    #[test]
    fn test_parse_empty_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.port, 5000);
        assert_eq!(config.socket_addr(), "0.0.0.0:5000");
        assert!(config.youtube_api_key.is_none());
    }

    #[test]
    fn test_load_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let config = Config::load_from(&tmp.path().join("nope.toml")).unwrap();
        assert_eq!(config.port, 5000);
    }

    #[test]
    fn test_load_invalid_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "port = \"not a number\"").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_env_overrides() {
        let config = Config::default().with_vars(|name| match name {
            "PORT" => Some("7000".to_string()),
            "YOUTUBE_API_KEY" => Some("from-env".to_string()),
            _ => None,
        });
        assert_eq!(config.port, 7000);
        assert_eq!(config.youtube_api_key.as_deref(), Some("from-env"));
    }

    #[test]
    fn test_env_ignores_bad_values() {
        let base = Config {
            youtube_api_key: Some("from-file".to_string()),
            ..Config::default()
        };
        let config = base.with_vars(|name| match name {
            "PORT" => Some("http".to_string()),
            "YOUTUBE_API_KEY" => Some("  ".to_string()),
            _ => None,
        });
        assert_eq!(config.port, 5000);
        assert_eq!(config.youtube_api_key.as_deref(), Some("from-file"));
    }

    #[test]
    fn test_flag_beats_env_beats_file() {
        let file: Config = toml::from_str("port = 8080\nhost = \"127.0.0.1\"").unwrap();
        assert_eq!(file.port, 8080);

        let env = file.with_vars(|name| (name == "PORT").then(|| "7000".to_string()));
        assert_eq!(env.port, 7000);

        let flagged = env.clone().with_overrides(None, Some(9000), Some(PathBuf::from("/srv/www")));
        assert_eq!(flagged.port, 9000);
        assert_eq!(flagged.host, "127.0.0.1");
        assert_eq!(flagged.static_dir, PathBuf::from("/srv/www"));
        assert_eq!(flagged.socket_addr(), "127.0.0.1:9000");

        let unflagged = env.with_overrides(Some("::1".to_string()), None, None);
        assert_eq!(unflagged.port, 7000);
        assert_eq!(unflagged.host, "::1");
        assert_eq!(unflagged.static_dir, PathBuf::from("public"));
    }
}
