//! Configuration for the todo application.
//!
//! Loads configuration from environment variables with sensible defaults.

use crate::error::TodoError;
use crate::persistence::DEFAULT_STORAGE_KEY;
use composable_todo_runtime::StoreConfig;
use std::env;
use std::path::PathBuf;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoConfig {
    /// File backing the key-value store (`TODO_STORAGE_PATH`)
    pub storage_path: PathBuf,
    /// Key the collection is stored under (`TODO_STORAGE_KEY`)
    pub storage_key: String,
    /// Observer buffer size (`TODO_BROADCAST_CAPACITY`)
    pub broadcast_capacity: usize,
    /// Log filter used when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for TodoConfig {
    fn default() -> Self {
        Self {
            storage_path: PathBuf::from("todos.json"),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            broadcast_capacity: StoreConfig::default().broadcast_capacity,
            log_filter: "todo=info,composable_todo_runtime=info".to_string(),
        }
    }
}

impl TodoConfig {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::InvalidConfig`] if `TODO_BROADCAST_CAPACITY` is
    /// set but is not a positive integer.
    pub fn from_env() -> Result<Self, TodoError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup
    ///
    /// # Errors
    ///
    /// See [`TodoConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, TodoError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let broadcast_capacity = match lookup("TODO_BROADCAST_CAPACITY") {
            None => defaults.broadcast_capacity,
            Some(value) => match value.trim().parse::<usize>() {
                Ok(capacity) if capacity > 0 => capacity,
                _ => {
                    return Err(TodoError::InvalidConfig {
                        name: "TODO_BROADCAST_CAPACITY",
                        value,
                    })
                },
            },
        };

        Ok(Self {
            storage_path: lookup("TODO_STORAGE_PATH")
                .map_or(defaults.storage_path, PathBuf::from),
            storage_key: lookup("TODO_STORAGE_KEY")
                .filter(|key| !key.is_empty())
                .unwrap_or(defaults.storage_key),
            broadcast_capacity,
            log_filter: lookup("RUST_LOG").unwrap_or(defaults.log_filter),
        })
    }

    /// Runtime configuration derived from this one
    #[must_use]
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig::default().with_broadcast_capacity(self.broadcast_capacity)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)] // Test code

    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = TodoConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, TodoConfig::default());
        assert_eq!(config.storage_key, "todos");
    }

    #[test]
    fn reads_overrides() {
        let config = TodoConfig::from_lookup(lookup(&[
            ("TODO_STORAGE_PATH", "/tmp/list.json"),
            ("TODO_STORAGE_KEY", "work"),
            ("TODO_BROADCAST_CAPACITY", "32"),
            ("RUST_LOG", "debug"),
        ]))
        .unwrap();

        assert_eq!(config.storage_path, PathBuf::from("/tmp/list.json"));
        assert_eq!(config.storage_key, "work");
        assert_eq!(config.store_config().broadcast_capacity, 32);
        assert_eq!(config.log_filter, "debug");
    }

    #[test]
    fn empty_key_falls_back_to_default() {
        let config = TodoConfig::from_lookup(lookup(&[("TODO_STORAGE_KEY", "")])).unwrap();
        assert_eq!(config.storage_key, "todos");
    }

    #[test]
    fn rejects_bad_capacity() {
        for bad in ["0", "-1", "lots"] {
            let err = TodoConfig::from_lookup(lookup(&[("TODO_BROADCAST_CAPACITY", bad)]));
            assert!(matches!(err, Err(TodoError::InvalidConfig { .. })), "{bad}");
        }
    }
}
