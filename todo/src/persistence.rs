//! Persisted form of the todo collection.
//!
//! The collection is stored under a single key as a JSON array:
//! `[{"id": string, "text": string, "completed": bool}, ...]`. There is no
//! version field; readers and writers must change together.

use crate::types::{Todo, TodoId};
use composable_todo_core::environment::KeyValueStore;
use std::collections::HashSet;

/// Key the collection is stored under unless configured otherwise
pub const DEFAULT_STORAGE_KEY: &str = "todos";

const SEED: &str = include_str!("../seed/todos.json");

/// Serialize the full collection
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn encode(todos: &[Todo]) -> Result<String, serde_json::Error> {
    serde_json::to_string(todos)
}

/// Parse a stored value; JSON `null` yields `None`
///
/// # Errors
///
/// Returns an error if `raw` is not a JSON array of todos or `null`.
pub fn decode(raw: &str) -> Result<Option<Vec<Todo>>, serde_json::Error> {
    serde_json::from_str(raw)
}

/// The built-in list used when storage has nothing usable
#[must_use]
pub fn seed_todos() -> Vec<Todo> {
    match serde_json::from_str(SEED) {
        Ok(todos) => todos,
        Err(error) => {
            tracing::error!(%error, "Built-in seed list is invalid, starting empty");
            Vec::new()
        },
    }
}

/// Load the collection stored under `key`, falling back to the seed list
///
/// Absent values, `null`, read failures and malformed JSON all fall back to
/// [`seed_todos`]. Failures are logged as warnings and never returned.
/// A stored empty array is honored as an empty collection.
pub fn load_todos(storage: &dyn KeyValueStore, key: &str) -> Vec<Todo> {
    let raw = match storage.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            tracing::debug!(key, "No persisted todos, using seed list");
            return seed_todos();
        },
        Err(error) => {
            tracing::warn!(key, %error, "Could not read persisted todos, using seed list");
            return seed_todos();
        },
    };

    match decode(&raw) {
        Ok(Some(todos)) => {
            let todos = dedupe(todos);
            tracing::info!(key, count = todos.len(), "Loaded persisted todos");
            todos
        },
        Ok(None) => {
            tracing::debug!(key, "Persisted todos are null, using seed list");
            seed_todos()
        },
        Err(error) => {
            tracing::warn!(key, %error, "Discarding malformed persisted todos, using seed list");
            seed_todos()
        },
    }
}

/// Drop later items whose id was already seen, keeping ids unique
fn dedupe(todos: Vec<Todo>) -> Vec<Todo> {
    let mut seen: HashSet<TodoId> = HashSet::with_capacity(todos.len());
    let before = todos.len();
    let unique: Vec<Todo> = todos
        .into_iter()
        .filter(|todo| seen.insert(todo.id.clone()))
        .collect();

    if unique.len() != before {
        tracing::warn!(dropped = before - unique.len(), "Dropped persisted todos with duplicate ids");
    }
    unique
}
