//! services/app/src/adapters/local_storage.rs
//!
//! A `KeyValueStore` backed by a single JSON object on disk.
//! Every write rewrites the whole file; the map is small (two keys in practice).

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
    sync::Mutex,
};

use study_aid_core::ports::{KeyValueStore, PortError, PortResult};
use tracing::warn;

pub struct JsonFileStorage {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl JsonFileStorage {
    /// Opens the store at `path`. A missing file is an empty store; an unreadable
    /// or corrupt one is logged and treated as empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!("Ignoring corrupt local storage at {}: {}", path.display(), e);
                BTreeMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                warn!("Could not read local storage at {}: {}", path.display(), e);
                BTreeMap::new()
            }
        };
        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> PortResult<std::sync::MutexGuard<'_, BTreeMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| PortError::Storage("local storage lock poisoned".to_string()))
    }

    fn flush(&self, entries: &BTreeMap<String, String>) -> PortResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| PortError::Storage(e.to_string()))?;
        }
        let raw =
            serde_json::to_string_pretty(entries).map_err(|e| PortError::Storage(e.to_string()))?;
        fs::write(&self.path, raw).map_err(|e| PortError::Storage(e.to_string()))
    }
}

impl KeyValueStore for JsonFileStorage {
    fn get(&self, key: &str) -> PortResult<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    /// The map only changes once the file write has succeeded.
    fn set(&self, key: &str, value: &str) -> PortResult<()> {
        let mut entries = self.lock()?;
        let mut updated = entries.clone();
        updated.insert(key.to_string(), value.to_string());
        self.flush(&updated)?;
        *entries = updated;
        Ok(())
    }

    fn remove(&self, key: &str) -> PortResult<()> {
        let mut entries = self.lock()?;
        if !entries.contains_key(key) {
            return Ok(());
        }
        let mut updated = entries.clone();
        updated.remove(key);
        self.flush(&updated)?;
        *entries = updated;
        Ok(())
    }
}
