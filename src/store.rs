use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use eyre::{Result, eyre};
use log::{debug, warn};
use serde_json::Value;

/// String key-value persistence for client-side state
pub trait Store {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// In-process store; nothing survives the process
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .lock()
            .map_err(|_| eyre!("memory store lock poisoned"))?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries
            .lock()
            .map_err(|_| eyre!("memory store lock poisoned"))?
            .remove(key);
        Ok(())
    }
}

/// Store backed by a single JSON object file
///
/// Keys holding non-string values are kept on write but read back as absent.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> BTreeMap<String, Value> {
        let Ok(data) = std::fs::read_to_string(&self.path) else {
            return BTreeMap::new();
        };
        serde_json::from_str(&data).unwrap_or_else(|e| {
            warn!("Ignoring unreadable store {}: {e}", self.path.display());
            BTreeMap::new()
        })
    }

    fn write_all(&self, entries: &BTreeMap<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, data)?;
        debug!("Saved store: {}", self.path.display());
        Ok(())
    }
}

impl Store for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        match self.read_all().remove(key)? {
            Value::String(value) => Some(value),
            other => {
                debug!("Store key {key} holds a non-string value: {other}");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.read_all();
        entries.insert(key.to_string(), Value::String(value.to_string()));
        self.write_all(&entries)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.read_all();
        if entries.remove(key).is_some() {
            self.write_all(&entries)?;
        }
        Ok(())
    }
}

/// Default location of the client store
pub fn store_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ytview")
        .join("storage.json")
}
