//! `TodoStore`: the entry points a presentation layer uses.
//!
//! Wraps the generic runtime [`Store`] with the todo reducer, loads the
//! initial collection, and exposes one method per mutation plus the derived
//! queries. Every mutation returns the [`Transition`] it caused.

use crate::persistence;
use crate::reducer::{TodoEnvironment, TodoReducer};
use crate::types::{Todo, TodoAction, TodoId, TodoState};
use composable_todo_runtime::{Store, StoreConfig, Transition};
use tokio::sync::broadcast;

/// Runtime store specialised for todos
pub type TodoRuntime = Store<TodoState, TodoAction, TodoEnvironment, TodoReducer>;

/// Owner of the todo collection, filter, and modal flag
///
/// Cheap to clone; clones share state.
#[derive(Clone)]
pub struct TodoStore {
    runtime: TodoRuntime,
}

impl TodoStore {
    /// Load the persisted collection (or the seed list) and build the store
    ///
    /// Never fails: unreadable or malformed storage falls back to the seed
    /// list with a logged warning. Loading does not write to storage.
    #[must_use]
    pub fn initialize(env: TodoEnvironment) -> Self {
        Self::with_config(env, StoreConfig::default())
    }

    /// Like [`TodoStore::initialize`] with a custom runtime configuration
    #[must_use]
    pub fn with_config(env: TodoEnvironment, config: StoreConfig) -> Self {
        let todos = persistence::load_todos(env.storage.as_ref(), &env.storage_key);
        Self::from_state(TodoState::new(todos), env, config)
    }

    /// Build a store around an explicit starting state, skipping storage reads
    #[must_use]
    pub fn from_state(state: TodoState, env: TodoEnvironment, config: StoreConfig) -> Self {
        Self {
            runtime: Store::with_config(state, TodoReducer::new(), env, config),
        }
    }

    /// Prepend a new todo with `text`
    pub async fn add_todo(&self, text: impl Into<String>) -> Transition<TodoState> {
        self.runtime
            .send(TodoAction::AddTodo { text: text.into() })
            .await
    }

    /// Remove the todo with `id`; unknown ids leave the content as is but still persist
    pub async fn delete_todo(&self, id: &TodoId) -> Transition<TodoState> {
        self.runtime
            .send(TodoAction::DeleteTodo { id: id.clone() })
            .await
    }

    /// Flip `completed` on the todo with `id`; unknown ids match nothing but still persist
    pub async fn toggle_completed(&self, id: &TodoId) -> Transition<TodoState> {
        self.runtime
            .send(TodoAction::ToggleCompleted { id: id.clone() })
            .await
    }

    /// Replace the filter text
    pub async fn set_filter(&self, text: impl Into<String>) -> Transition<TodoState> {
        self.runtime
            .send(TodoAction::SetFilter { text: text.into() })
            .await
    }

    /// Open the editor modal if closed, close it if open
    pub async fn toggle_modal(&self) -> Transition<TodoState> {
        self.runtime.send(TodoAction::ToggleModal).await
    }

    /// Close the editor modal
    pub async fn close_modal(&self) -> Transition<TodoState> {
        self.runtime.send(TodoAction::CloseModal).await
    }

    /// Todos matching the current filter, newest first
    pub async fn visible_todos(&self) -> Vec<Todo> {
        self.runtime
            .state(|s| s.visible_todos().into_iter().cloned().collect())
            .await
    }

    /// Number of todos
    pub async fn total_count(&self) -> usize {
        self.runtime.state(TodoState::total_count).await
    }

    /// Number of completed todos
    pub async fn completed_count(&self) -> usize {
        self.runtime.state(TodoState::completed_count).await
    }

    /// Current filter text
    pub async fn filter(&self) -> String {
        self.runtime.state(|s| s.filter().to_string()).await
    }

    /// Whether the editor modal is open
    pub async fn modal_open(&self) -> bool {
        self.runtime.state(TodoState::modal_open).await
    }

    /// Most recent persistence failure not yet superseded
    pub async fn last_error(&self) -> Option<String> {
        self.runtime.state(|s| s.last_error().map(str::to_string)).await
    }

    /// Snapshot of the whole state
    pub async fn snapshot(&self) -> TodoState {
        self.runtime.snapshot().await
    }

    /// Observe feedback actions (`JustAdded`, `PersistFailed`)
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<TodoAction> {
        self.runtime.subscribe_actions()
    }
}

impl std::fmt::Debug for TodoStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoStore").finish_non_exhaustive()
    }
}
