//! # Composable Todo Testing
//!
//! Testing utilities and helpers for the composable todo store.
//!
//! This crate provides:
//! - Mock implementations of Environment traits
//! - A Given-When-Then harness for reducers ([`ReducerTest`])
//! - Assertion helpers for effects
//!
//! ## Example
//!
//! ```ignore
//! use composable_todo_testing::{InMemoryStorage, SequentialIdGenerator};
//!
//! #[tokio::test]
//! async fn test_add_persists() {
//!     let storage = Arc::new(InMemoryStorage::new());
//!     let env = TodoEnvironment::new(Arc::new(SequentialIdGenerator::new()), storage.clone());
//!     let store = TodoStore::initialize(env);
//!
//!     store.add_todo("buy milk").await;
//!
//!     assert_eq!(storage.writes(), 1);
//! }
//! ```

use composable_todo_core::environment::{IdGenerator, KeyValueStore};
use composable_todo_core::error::StorageError;


pub use reducer_test::{assertions, ReducerTest};

/// Mock implementations for testing.
pub mod mocks {
    use super::{IdGenerator, KeyValueStore, StorageError};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
    use std::sync::{Mutex, PoisonError};

    /// Predictable ids: `todo-1`, `todo-2`, ...
    ///
    /// # Example
    ///
    /// ```
    /// use composable_todo_testing::mocks::SequentialIdGenerator;
    /// use composable_todo_core::environment::IdGenerator;
    ///
    /// let ids = SequentialIdGenerator::new();
    /// assert_eq!(ids.next_id(), "todo-1");
    /// assert_eq!(ids.next_id(), "todo-2");
    /// ```
    #[derive(Debug)]
    pub struct SequentialIdGenerator {
        prefix: String,
        next: AtomicU64,
    }

    impl SequentialIdGenerator {
        /// Generator with the `todo` prefix
        #[must_use]
        pub fn new() -> Self {
            Self::with_prefix("todo")
        }

        /// Generator with a custom prefix
        #[must_use]
        pub fn with_prefix(prefix: impl Into<String>) -> Self {
            Self {
                prefix: prefix.into(),
                next: AtomicU64::new(1),
            }
        }
    }

    impl Default for SequentialIdGenerator {
        fn default() -> Self {
            Self::new()
        }
    }

    impl IdGenerator for SequentialIdGenerator {
        fn next_id(&self) -> String {
            let n = self.next.fetch_add(1, Ordering::Relaxed);
            format!("{}-{n}", self.prefix)
        }
    }

    /// In-memory key-value store that counts writes
    #[derive(Debug, Default)]
    pub struct InMemoryStorage {
        values: Mutex<HashMap<String, String>>,
        writes: AtomicUsize,
    }

    impl InMemoryStorage {
        /// Empty store
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Store pre-populated with one value
        #[must_use]
        pub fn with_value(key: impl Into<String>, value: impl Into<String>) -> Self {
            let storage = Self::new();
            storage
                .values
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(key.into(), value.into());
            storage
        }

        /// Current value under `key`
        #[must_use]
        pub fn value(&self, key: &str) -> Option<String> {
            self.values
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .get(key)
                .cloned()
        }

        /// Number of successful `set` calls so far
        #[must_use]
        pub fn writes(&self) -> usize {
            self.writes.load(Ordering::SeqCst)
        }
    }

    impl KeyValueStore for InMemoryStorage {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            Ok(self.value(key))
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            self.values
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(key.to_string(), value.to_string());
            self.writes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn remove(&self, key: &str) -> Result<(), StorageError> {
            self.values
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .remove(key);
            Ok(())
        }
    }

    /// Key-value store whose every operation fails
    ///
    /// Reads fail too, unless constructed with [`FailingStorage::write_only_failures`].
    #[derive(Debug, Default)]
    pub struct FailingStorage {
        readable: Option<String>,
        attempts: AtomicUsize,
    }

    impl FailingStorage {
        /// Fails reads and writes
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Reads succeed with `value`; writes still fail
        #[must_use]
        pub fn write_only_failures(value: Option<String>) -> Self {
            Self {
                readable: value,
                attempts: AtomicUsize::new(0),
            }
        }

        /// Number of attempted writes
        #[must_use]
        pub fn attempts(&self) -> usize {
            self.attempts.load(Ordering::SeqCst)
        }
    }

    impl KeyValueStore for FailingStorage {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            match &self.readable {
                Some(value) => Ok(Some(value.clone())),
                None => Err(StorageError::Unavailable("read refused".to_string())),
            }
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            Err(StorageError::Unavailable("quota exceeded".to_string()))
        }

        fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("remove refused".to_string()))
        }
    }
}

// Re-export commonly used items
pub use mocks::{FailingStorage, InMemoryStorage, SequentialIdGenerator};
