//! File-backed key-value store.
//!
//! One JSON object per file, mapping keys to string values, the same shape a
//! browser's local storage has. Writes go to a sibling temp file that is then
//! renamed over the original, so a crash mid-write leaves the old file intact.

use composable_todo_core::environment::KeyValueStore;
use composable_todo_core::error::StorageError;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Key-value store persisted to a single JSON file
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    // Serializes read-modify-write cycles from clones sharing this store.
    lock: Mutex<()>,
}

impl FileStorage {
    /// Store backed by `path`; the file is created on first write
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Path of the backing file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<Map<String, Value>, StorageError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(error) => return Err(error.into()),
        };
        if raw.trim().is_empty() {
            return Ok(Map::new());
        }
        Ok(serde_json::from_str(&raw)?)
    }

    fn write_map(&self, map: &Map<String, Value>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, serde_json::to_vec_pretty(map)?)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        match self.read_map()?.remove(key) {
            None => Ok(None),
            Some(Value::String(value)) => Ok(Some(value)),
            // A non-string entry is handed back as its JSON text
            Some(other) => Ok(Some(other.to_string())),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut map = self.read_map()?;
        map.insert(key.to_string(), Value::String(value.to_string()));
        self.write_map(&map)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut map = self.read_map()?;
        if map.remove(key).is_some() {
            self.write_map(&map)?;
        }
        Ok(())
    }
}
