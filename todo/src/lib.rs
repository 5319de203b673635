//! A to-do list state store built on the reducer pattern.
//!
//! The store owns an ordered, newest-first collection of todos, a text
//! filter, and an editor-modal flag. It offers:
//!
//! - Mutations: add, delete, toggle completed, set filter, toggle/close modal
//! - Derived queries: visible todos, total count, completed count
//! - Persistence: the whole collection is written to a key-value slot on
//!   every change, and read back (or replaced by a seed list) at startup
//! - A "just added" transition, broadcast when the list grows from a
//!   non-empty length, that opens the editor modal
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use todo::{FileStorage, TodoEnvironment, TodoStore, UuidGenerator};
//!
//! # async fn example() {
//! let env = TodoEnvironment::new(
//!     Arc::new(UuidGenerator),
//!     Arc::new(FileStorage::new("todos.json")),
//! );
//! let store = TodoStore::initialize(env);
//!
//! let transition = store.add_todo("Buy milk").await;
//! let id = transition.next.todos()[0].id.clone();
//! store.toggle_completed(&id).await;
//!
//! println!("Completed: {}", store.completed_count().await);
//! # }
//! ```

pub mod config;
pub mod error;
pub mod persistence;
pub mod reducer;
pub mod storage;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use config::TodoConfig;
pub use error::TodoError;
pub use reducer::{TodoEnvironment, TodoReducer, UuidGenerator};
pub use storage::FileStorage;
pub use store::TodoStore;
pub use types::{Todo, TodoAction, TodoId, TodoState};
