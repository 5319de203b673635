//! Domain types for the todo store.
//!
//! A todo list is an ordered, newest-first collection of items plus a text
//! filter and a modal flag. The collection is held behind an `Arc<[Todo]>`:
//! every change builds a new slice, so comparing two snapshots with
//! [`Arc::ptr_eq`] tells whether the collection changed.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Unique, opaque identifier for a todo item
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(String);

impl TodoId {
    /// Wraps an existing identifier
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for TodoId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for TodoId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl std::fmt::Display for TodoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single todo item
///
/// Serialized exactly as `{"id": string, "text": string, "completed": bool}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    /// Unique identifier, fixed for the item's lifetime
    pub id: TodoId,
    /// Text of the todo
    pub text: String,
    /// Whether the todo is completed
    pub completed: bool,
}

impl Todo {
    /// Creates a new, not yet completed, todo item
    #[must_use]
    pub fn new(id: TodoId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            completed: false,
        }
    }

    /// Copy of this item with `completed` flipped
    #[must_use]
    pub fn toggled(&self) -> Self {
        Self {
            completed: !self.completed,
            ..self.clone()
        }
    }

    /// Case-insensitive substring match against an already lowercased needle
    fn matches(&self, needle: &str) -> bool {
        self.text.to_lowercase().contains(needle)
    }
}

/// State owned by the todo store
///
/// Cloning is cheap: the collection is shared until it changes.
#[derive(Clone, Debug)]
pub struct TodoState {
    pub(crate) todos: Arc<[Todo]>,
    pub(crate) filter: String,
    pub(crate) modal_open: bool,
    pub(crate) last_error: Option<String>,
}

impl Default for TodoState {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl TodoState {
    /// State holding `todos` (newest first), an empty filter and a closed modal
    #[must_use]
    pub fn new(todos: Vec<Todo>) -> Self {
        Self {
            todos: todos.into(),
            filter: String::new(),
            modal_open: false,
            last_error: None,
        }
    }

    /// The full collection, newest first
    #[must_use]
    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    /// The active filter, verbatim
    #[must_use]
    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// Whether the editor modal is open
    #[must_use]
    pub const fn modal_open(&self) -> bool {
        self.modal_open
    }

    /// Message of the most recent failed persistence write, if it has not
    /// been superseded by a later mutation
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Todos whose text contains the filter, ignoring case
    #[must_use]
    pub fn visible_todos(&self) -> Vec<&Todo> {
        let needle = self.filter.to_lowercase();
        self.todos.iter().filter(|todo| todo.matches(&needle)).collect()
    }

    /// Number of todos in the collection
    #[must_use]
    pub fn total_count(&self) -> usize {
        self.todos.len()
    }

    /// Number of completed todos
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.todos.iter().filter(|todo| todo.completed).count()
    }

    /// Returns a todo by ID
    #[must_use]
    pub fn get(&self, id: &TodoId) -> Option<&Todo> {
        self.todos.iter().find(|todo| &todo.id == id)
    }

    /// Checks if a todo exists
    #[must_use]
    pub fn exists(&self, id: &TodoId) -> bool {
        self.get(id).is_some()
    }

    /// Whether the collection is a different value than in `previous`
    ///
    /// Identity comparison, not deep equality.
    #[must_use]
    pub fn collection_changed_from(&self, previous: &Self) -> bool {
        !Arc::ptr_eq(&self.todos, &previous.todos)
    }

    /// Whether this state should fire the "just added" transition
    ///
    /// True when the collection grew and `previous` was not empty.
    #[must_use]
    pub fn grew_from(&self, previous: &Self) -> bool {
        self.todos.len() > previous.todos.len() && !previous.todos.is_empty()
    }
}

/// Actions accepted by the todo reducer
///
/// The first group is what a presentation layer sends. The second group is
/// produced by the store's own effects and broadcast to observers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TodoAction {
    // ========== Commands ==========
    /// Prepend a new todo with a freshly generated id
    AddTodo {
        /// Text of the todo; any string, including empty
        text: String,
    },

    /// Remove a todo; an unknown id leaves the content unchanged
    DeleteTodo {
        /// Todo to delete
        id: TodoId,
    },

    /// Flip the completed flag; an unknown id leaves the content unchanged
    ToggleCompleted {
        /// Todo to toggle
        id: TodoId,
    },

    /// Replace the filter text
    SetFilter {
        /// New filter, stored verbatim
        text: String,
    },

    /// Open or close the editor modal
    ToggleModal,

    /// Close the editor modal
    CloseModal,

    // ========== Feedback ==========
    /// The collection grew from a non-empty length; flips the modal
    JustAdded {
        /// The todo that was added
        id: TodoId,
    },

    /// Writing the collection to storage failed
    PersistFailed {
        /// Error message
        error: String,
    },
}
