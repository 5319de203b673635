//! # Composable Todo Runtime
//!
//! Runtime implementation for the composable todo store.
//!
//! ## Core Components
//!
//! - **Store**: owns state, runs the reducer, executes effects
//! - **Change diff**: every action is followed by `Reducer::did_change` with
//!   the snapshot taken before the action and the state after it
//! - **Transition**: `send` returns the state before and after the whole
//!   action (feedback included) so callers can compare them
//!
//! Every `send` runs to completion before it returns: the action, the diff,
//! each effect, and every feedback action those effects produce. Nothing is
//! spawned and nothing is deferred.
//!
//! ## Example
//!
//! ```ignore
//! use composable_todo_runtime::Store;
//!
//! let store = Store::new(initial_state, my_reducer, environment);
//!
//! let transition = store.send(Action::DoSomething).await;
//! assert!(transition.previous.len() < transition.next.len());
//!
//! let value = store.state(|s| s.some_field).await;
//! ```

use composable_todo_core::{effect::Effect, reducer::Reducer};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};

/// Store configuration
///
/// # Example
///
/// ```
/// use composable_todo_runtime::StoreConfig;
///
/// let config = StoreConfig::default()
///     .with_broadcast_capacity(64)
///     .with_max_actions_per_send(16);
/// assert_eq!(config.broadcast_capacity, 64);
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Number of feedback actions buffered for each observer
    pub broadcast_capacity: usize,
    /// Upper bound on actions (initial plus feedback) processed by one `send`
    pub max_actions_per_send: usize,
}

impl StoreConfig {
    /// Create a new configuration with custom values
    #[must_use]
    pub const fn new(broadcast_capacity: usize, max_actions_per_send: usize) -> Self {
        Self {
            broadcast_capacity,
            max_actions_per_send,
        }
    }

    /// Set the observer broadcast capacity
    #[must_use]
    pub const fn with_broadcast_capacity(mut self, capacity: usize) -> Self {
        self.broadcast_capacity = capacity;
        self
    }

    /// Set the feedback limit for a single `send`
    #[must_use]
    pub const fn with_max_actions_per_send(mut self, max: usize) -> Self {
        self.max_actions_per_send = max;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            broadcast_capacity: 16,
            max_actions_per_send: 64,
        }
    }
}

/// State snapshots on either side of a `send`
///
/// `previous` is the state before the action was reduced, `next` is the
/// state after the action and all of its feedback actions were processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition<S> {
    /// State before the action
    pub previous: S,
    /// State after the action
    pub next: S,
}

impl<S> Transition<S> {
    /// Project both snapshots through `f`
    ///
    /// ```
    /// use composable_todo_runtime::Transition;
    ///
    /// let t = Transition { previous: vec![1], next: vec![1, 2] };
    /// assert_eq!(t.map(Vec::len), Transition { previous: 1, next: 2 });
    /// ```
    #[must_use]
    pub fn map<T, F>(&self, f: F) -> Transition<T>
    where
        F: Fn(&S) -> T,
    {
        Transition {
            previous: f(&self.previous),
            next: f(&self.next),
        }
    }
}

/// Store runtime for coordinating reducer execution and effect handling.
pub mod store {
    use super::{broadcast, Arc, Effect, Reducer, RwLock, StoreConfig, Transition, VecDeque};

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (behind `RwLock`; one writer per `send`)
    /// 2. Reducer (business logic and change rules)
    /// 3. Environment (injected dependencies)
    /// 4. Effect execution (with feedback loop)
    ///
    /// Cloning a Store is cheap and yields a handle to the same state.
    ///
    /// # Type Parameters
    ///
    /// - `S`: State type
    /// - `A`: Action type
    /// - `E`: Environment type
    /// - `R`: Reducer implementation
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: Arc<RwLock<S>>,
        reducer: Arc<R>,
        environment: Arc<E>,
        config: StoreConfig,
        /// Feedback actions produced by effects are broadcast here so a
        /// presentation layer can react to them (e.g. open a modal).
        action_broadcast: broadcast::Sender<A>,
    }

    impl<S, A, E, R> Clone for Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        fn clone(&self) -> Self {
            Self {
                state: Arc::clone(&self.state),
                reducer: Arc::clone(&self.reducer),
                environment: Arc::clone(&self.environment),
                config: self.config.clone(),
                action_broadcast: self.action_broadcast.clone(),
            }
        }
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
        S: Clone,
        A: Clone + std::fmt::Debug,
    {
        /// Create a new store with initial state, reducer, and environment
        ///
        /// Uses [`StoreConfig::default`].
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self::with_config(initial_state, reducer, environment, StoreConfig::default())
        }

        /// Create a new Store with custom configuration
        #[must_use]
        pub fn with_config(
            initial_state: S,
            reducer: R,
            environment: E,
            config: StoreConfig,
        ) -> Self {
            // broadcast::channel rejects a zero capacity
            let (action_broadcast, _) = broadcast::channel(config.broadcast_capacity.max(1));

            Self {
                state: Arc::new(RwLock::new(initial_state)),
                reducer: Arc::new(reducer),
                environment: Arc::new(environment),
                config,
                action_broadcast,
            }
        }

        /// Send an action to the store
        ///
        /// Processes the action and every feedback action its effects produce,
        /// in order, before returning. After each reduce step the reducer's
        /// `did_change` hook sees the snapshot from just before that step.
        ///
        /// # Returns
        ///
        /// A [`Transition`] holding the state before the action and after all
        /// processing finished.
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub async fn send(&self, action: A) -> Transition<S> {
            tracing::debug!(?action, "Processing action");
            metrics::counter!("store.actions.total").increment(1);

            let mut state = self.state.write().await;
            tracing::trace!("Acquired write lock on state");

            let previous = (*state).clone();
            let mut queue = VecDeque::from([action]);
            let mut processed = 0_usize;

            while let Some(action) = queue.pop_front() {
                if processed >= self.config.max_actions_per_send {
                    tracing::error!(
                        limit = self.config.max_actions_per_send,
                        dropped = queue.len() + 1,
                        "Feedback limit reached, dropping remaining actions"
                    );
                    metrics::counter!("store.feedback.dropped").increment(1);
                    break;
                }
                processed += 1;

                let effects = {
                    let span = tracing::debug_span!("reducer_execution");
                    let _enter = span.enter();

                    let before = (*state).clone();
                    let start = std::time::Instant::now();
                    let mut effects = self.reducer.reduce(&mut *state, action, &*self.environment);
                    effects.extend(self.reducer.did_change(&before, &*state, &*self.environment));
                    metrics::histogram!("store.reducer.duration_seconds")
                        .record(start.elapsed().as_secs_f64());

                    tracing::trace!("Reducer completed, returned {} effects", effects.len());
                    effects
                };

                // Note: Precision loss acceptable for metrics (effect counts < 2^52)
                #[allow(clippy::cast_precision_loss)]
                metrics::histogram!("store.effects.count").record(effects.len() as f64);

                for effect in effects {
                    self.execute_effect(effect, &mut queue);
                }
            }

            tracing::debug!(actions = processed, "Action processing completed");

            Transition {
                previous,
                next: (*state).clone(),
            }
        }

        /// Read current state via a closure
        ///
        /// ```ignore
        /// let count = store.state(|s| s.total_count()).await;
        /// ```
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let state = self.state.read().await;
            f(&*state)
        }

        /// Clone the current state
        pub async fn snapshot(&self) -> S {
            self.state.read().await.clone()
        }

        /// Subscribe to feedback actions
        ///
        /// Only actions produced by effects are broadcast, not the actions
        /// passed to [`Store::send`]. Subscribe before sending to observe the
        /// feedback of that send.
        #[must_use]
        pub fn subscribe_actions(&self) -> broadcast::Receiver<A> {
            self.action_broadcast.subscribe()
        }

        fn execute_effect(&self, effect: Effect<A>, queue: &mut VecDeque<A>) {
            match effect {
                Effect::None => {},
                Effect::Sequential(effects) => {
                    for effect in effects {
                        self.execute_effect(effect, queue);
                    }
                },
                Effect::Send(action) => self.feed_back(action, queue),
                Effect::Run(work) => {
                    if let Some(action) = work() {
                        self.feed_back(action, queue);
                    }
                },
            }
        }

        fn feed_back(&self, action: A, queue: &mut VecDeque<A>) {
            tracing::trace!(?action, "Feedback action");
            metrics::counter!("store.feedback.total").increment(1);

            // No subscribers is fine: nobody is watching right now.
            let _ = self.action_broadcast.send(action.clone());
            queue.push_back(action);
        }
    }
}

pub use store::Store;
