//! # Composable Todo Core
//!
//! Core traits and types for the todo store.
//!
//! The store is built on the reducer pattern:
//!
//! - **State**: owned domain data, cheap to clone as a snapshot
//! - **Action**: every input to the reducer (user commands and feedback)
//! - **Reducer**: `(State, Action, Environment) → (State, Effects)`
//! - **Change hook**: `(previous, next) → Effects`, the explicit diff step that
//!   replaces implicit "did update" callbacks
//! - **Effect**: a description of a side effect, executed by the runtime
//! - **Environment**: injected dependencies (`IdGenerator`, `KeyValueStore`)
//!
//! ## Example
//!
//! ```
//! use composable_todo_core::{effect::Effect, reducer::Reducer, SmallVec};
//!
//! #[derive(Clone, Debug, Default)]
//! struct Tally {
//!     items: Vec<String>,
//! }
//!
//! #[derive(Clone, Debug)]
//! enum TallyAction {
//!     Push(String),
//! }
//!
//! struct TallyReducer;
//!
//! impl Reducer for TallyReducer {
//!     type State = Tally;
//!     type Action = TallyAction;
//!     type Environment = ();
//!
//!     fn reduce(
//!         &self,
//!         state: &mut Tally,
//!         action: TallyAction,
//!         _env: &(),
//!     ) -> SmallVec<[Effect<TallyAction>; 4]> {
//!         match action {
//!             TallyAction::Push(item) => state.items.push(item),
//!         }
//!         SmallVec::new()
//!     }
//! }
//!
//! let mut state = Tally::default();
//! let effects = TallyReducer.reduce(&mut state, TallyAction::Push("a".into()), &());
//! assert!(effects.is_empty());
//! assert_eq!(state.items.len(), 1);
//! ```

pub use smallvec::{smallvec, SmallVec};

/// Reducer module - the core trait for business logic
pub mod reducer {
    use super::{effect::Effect, SmallVec};

    /// The Reducer trait - core abstraction for business logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The domain state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// Updates state in place and returns effect descriptions. The
        /// runtime executes the effects after the call returns.
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;

        /// React to the difference between two state snapshots
        ///
        /// Called by the runtime after every `reduce` with the snapshot taken
        /// just before the action and the state just after it. Rules that
        /// depend on "what changed" (persist on change, notify on growth)
        /// live here instead of inside individual action arms.
        ///
        /// The default implementation produces no effects.
        fn did_change(
            &self,
            previous: &Self::State,
            next: &Self::State,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]> {
            let _ = (previous, next, env);
            SmallVec::new()
        }
    }
}

/// Effect module - side effect descriptions
///
/// Effects are values, not execution. Reducers return them and the Store
/// runtime executes them synchronously, on the same turn as the action that
/// produced them.
pub mod effect {
    /// Boxed synchronous side effect
    ///
    /// Returns `Option<Action>` - if Some, the action is fed back into the reducer.
    pub type Work<Action> = Box<dyn FnOnce() -> Option<Action> + Send>;

    /// Effect type - describes a side effect to be executed
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type that effects can produce (feedback loop)
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Run effects one after another, in order
        Sequential(Vec<Effect<Action>>),

        /// Feed an action straight back into the reducer
        ///
        /// The action is also broadcast to observers of the store.
        Send(Action),

        /// Arbitrary synchronous computation (I/O, storage writes)
        Run(Work<Action>),
    }

    // Manual Debug implementation since closures don't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action>
    where
        Action: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Sequential(effects) => {
                    f.debug_tuple("Effect::Sequential").field(effects).finish()
                },
                Effect::Send(action) => f.debug_tuple("Effect::Send").field(action).finish(),
                Effect::Run(_) => write!(f, "Effect::Run(<closure>)"),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Chain effects to run sequentially
        #[must_use]
        pub const fn chain(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Sequential(effects)
        }

        /// Wrap a closure as a [`Effect::Run`] effect
        #[must_use]
        pub fn run<F>(work: F) -> Effect<Action>
        where
            F: FnOnce() -> Option<Action> + Send + 'static,
        {
            Effect::Run(Box::new(work))
        }

        /// Returns `true` for [`Effect::None`]
        #[must_use]
        pub const fn is_none(&self) -> bool {
            matches!(self, Effect::None)
        }
    }
}

/// Error types shared by environment implementations
pub mod error {
    use thiserror::Error;

    /// Errors raised by a [`KeyValueStore`](crate::environment::KeyValueStore)
    #[derive(Error, Debug)]
    pub enum StorageError {
        /// Underlying I/O failed (file missing permissions, disk full, ...)
        #[error("storage I/O error: {0}")]
        Io(#[from] std::io::Error),

        /// The backing file or a stored value could not be (de)serialized
        #[error("storage serialization error: {0}")]
        Serialization(#[from] serde_json::Error),

        /// The store refused the operation
        #[error("storage unavailable: {0}")]
        Unavailable(String),
    }
}

/// Environment module - dependency injection traits
///
/// All external dependencies are abstracted behind traits and injected
/// via the Environment parameter.
pub mod environment {
    use super::error::StorageError;

    /// Source of opaque, collision-resistant identifiers
    ///
    /// # Examples
    ///
    /// ```
    /// use composable_todo_core::environment::IdGenerator;
    /// use std::sync::atomic::{AtomicU64, Ordering};
    ///
    /// struct Counter(AtomicU64);
    ///
    /// impl IdGenerator for Counter {
    ///     fn next_id(&self) -> String {
    ///         self.0.fetch_add(1, Ordering::Relaxed).to_string()
    ///     }
    /// }
    ///
    /// let ids = Counter(AtomicU64::new(0));
    /// assert_ne!(ids.next_id(), ids.next_id());
    /// ```
    pub trait IdGenerator: Send + Sync {
        /// Produce an id never returned before by this generator
        fn next_id(&self) -> String;
    }

    /// A string-keyed persistent slot store (the local-storage analogue)
    ///
    /// Calls are synchronous and blocking; callers run them inline with the
    /// mutation that triggered them.
    pub trait KeyValueStore: Send + Sync {
        /// Read the value stored under `key`
        ///
        /// # Errors
        ///
        /// Returns [`StorageError`] if the backing store cannot be read.
        fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

        /// Store `value` under `key`, replacing any previous value
        ///
        /// # Errors
        ///
        /// Returns [`StorageError`] if the write fails.
        fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

        /// Remove `key` if present
        ///
        /// # Errors
        ///
        /// Returns [`StorageError`] if the backing store cannot be updated.
        fn remove(&self, key: &str) -> Result<(), StorageError>;
    }
}
