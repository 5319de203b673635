//! Reducer logic for the todo store.
//!
//! `reduce` applies commands to the collection, building a new collection
//! value on every add, delete and toggle. `did_change` compares the snapshot taken
//! before the action with the state after it and decides the side effects:
//! persist when the collection changed, announce "just added" when it grew
//! from a non-empty list.

use crate::persistence::{self, DEFAULT_STORAGE_KEY};
use crate::types::{Todo, TodoAction, TodoId, TodoState};
use composable_todo_core::{
    effect::Effect,
    environment::{IdGenerator, KeyValueStore},
    reducer::Reducer,
    SmallVec,
};
use std::sync::Arc;

/// Generated ids that collide with a stored todo are redrawn this many times
const MAX_ID_ATTEMPTS: usize = 8;

/// Random v4 UUID identifiers
#[derive(Clone, Copy, Debug, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Environment dependencies for the todo reducer
#[derive(Clone)]
pub struct TodoEnvironment {
    /// Id source for new todos
    pub ids: Arc<dyn IdGenerator>,
    /// Persistent key-value slot store
    pub storage: Arc<dyn KeyValueStore>,
    /// Key the collection is stored under
    pub storage_key: String,
}

impl TodoEnvironment {
    /// Creates a new `TodoEnvironment` using [`DEFAULT_STORAGE_KEY`]
    #[must_use]
    pub fn new(ids: Arc<dyn IdGenerator>, storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            ids,
            storage,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }

    /// Store the collection under `key` instead
    #[must_use]
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }
}

impl std::fmt::Debug for TodoEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoEnvironment")
            .field("storage_key", &self.storage_key)
            .finish_non_exhaustive()
    }
}

/// Reducer for the todo store
#[derive(Clone, Debug, Default)]
pub struct TodoReducer;

impl TodoReducer {
    /// Creates a new `TodoReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn add(state: &mut TodoState, todo: Todo) {
        let mut todos = Vec::with_capacity(state.todos.len() + 1);
        todos.push(todo);
        todos.extend(state.todos.iter().cloned());
        state.todos = todos.into();
        state.last_error = None;
    }

    /// Draw an id not already present in the collection
    ///
    /// Ids loaded from storage share the generator's id space, so a generator
    /// restarted against an old file can repeat itself. After
    /// [`MAX_ID_ATTEMPTS`] collisions a random UUID is used instead.
    fn fresh_id(state: &TodoState, env: &TodoEnvironment) -> TodoId {
        for _ in 0..MAX_ID_ATTEMPTS {
            let id = TodoId::from(env.ids.next_id());
            if !state.exists(&id) {
                return id;
            }
            tracing::warn!(%id, "Generated id already in use, drawing another");
        }
        TodoId::from(UuidGenerator.next_id())
    }

    fn delete(state: &mut TodoState, id: &TodoId) {
        if !state.exists(id) {
            tracing::debug!(%id, "Delete matched no todo");
        }
        state.todos = state.todos.iter().filter(|todo| &todo.id != id).cloned().collect();
        state.last_error = None;
    }

    fn toggle(state: &mut TodoState, id: &TodoId) {
        if !state.exists(id) {
            tracing::debug!(%id, "Toggle matched no todo");
        }
        state.todos = state
            .todos
            .iter()
            .map(|todo| if &todo.id == id { todo.toggled() } else { todo.clone() })
            .collect();
        state.last_error = None;
    }

    /// Effect writing the whole collection to storage
    fn persist(next: &TodoState, env: &TodoEnvironment) -> Effect<TodoAction> {
        let payload = match persistence::encode(next.todos()) {
            Ok(payload) => payload,
            Err(error) => {
                tracing::warn!(%error, "Could not serialize todos");
                return Effect::Send(TodoAction::PersistFailed {
                    error: error.to_string(),
                });
            },
        };

        let storage = Arc::clone(&env.storage);
        let key = env.storage_key.clone();
        let count = next.total_count();

        Effect::run(move || match storage.set(&key, &payload) {
            Ok(()) => {
                tracing::debug!(key = %key, count, "Persisted todos");
                None
            },
            Err(error) => {
                tracing::warn!(key = %key, %error, "Failed to persist todos, keeping in-memory state");
                Some(TodoAction::PersistFailed {
                    error: error.to_string(),
                })
            },
        })
    }
}

impl Reducer for TodoReducer {
    type State = TodoState;
    type Action = TodoAction;
    type Environment = TodoEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ========== Commands ==========
            TodoAction::AddTodo { text } => {
                let todo = Todo::new(Self::fresh_id(state, env), text);
                tracing::info!(id = %todo.id, "Adding todo");
                Self::add(state, todo);
            },
            TodoAction::DeleteTodo { id } => Self::delete(state, &id),
            TodoAction::ToggleCompleted { id } => Self::toggle(state, &id),
            TodoAction::SetFilter { text } => state.filter = text,
            TodoAction::ToggleModal => state.modal_open = !state.modal_open,
            TodoAction::CloseModal => state.modal_open = false,

            // ========== Feedback ==========
            TodoAction::JustAdded { .. } => state.modal_open = !state.modal_open,
            TodoAction::PersistFailed { error } => state.last_error = Some(error),
        }

        SmallVec::new()
    }

    fn did_change(
        &self,
        previous: &Self::State,
        next: &Self::State,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let mut effects = SmallVec::new();

        if next.collection_changed_from(previous) {
            effects.push(Self::persist(next, env));
        }

        if next.grew_from(previous) {
            if let Some(newest) = next.todos().first() {
                effects.push(Effect::Send(TodoAction::JustAdded {
                    id: newest.id.clone(),
                }));
            }
        }

        effects
    }
}
