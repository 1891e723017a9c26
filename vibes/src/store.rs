use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use tracing::warn;

/// String-blob key-value storage for client state.
///
/// One value per key, written whole. Implementations are expected to be
/// last-write-wins; writes are idempotent per key within a validity window,
/// so callers never lock.
pub trait VibeStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
    fn remove(&mut self, key: &str);
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl VibeStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// File-backed store, written through on every set.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: HashMap<String, String>,
}

impl FileStore {
    /// A missing or unreadable file opens as an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = fs::read(&path)
            .ok()
            .and_then(|data| serde_json::from_slice(&data).ok())
            .unwrap_or_default();

        Self { path, entries }
    }

    fn persist(&self) {
        let data = match serde_json::to_vec_pretty(&self.entries) {
            Ok(data) => data,
            Err(e) => {
                warn!("Failed to encode local store: {e}");
                return;
            }
        };

        if let Err(e) = fs::write(&self.path, data) {
            warn!("Failed to persist local store to {}: {e}", self.path.display());
        }
    }
}

impl VibeStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
        self.persist();
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
        self.persist();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_roundtrip() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("favorites"), None);

        store.set("favorites", "[\"a\"]");
        assert_eq!(store.get("favorites").as_deref(), Some("[\"a\"]"));

        store.remove("favorites");
        assert_eq!(store.get("favorites"), None);
    }

    #[test]
    fn test_file_store_reopens_with_contents() {
        let path = std::env::temp_dir().join("vibes-file-store-test.json");
        let _ = fs::remove_file(&path);

        let mut store = FileStore::open(&path);
        store.set("consent", "{}");
        drop(store);

        let store = FileStore::open(&path);
        assert_eq!(store.get("consent").as_deref(), Some("{}"));

        let _ = fs::remove_file(&path);
    }
}
