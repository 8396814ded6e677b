//! # Taskflow Runtime
//!
//! Runtime implementation for the Taskflow architecture.
//!
//! This crate provides the Store runtime that coordinates reducer execution
//! and effect handling.
//!
//! ## Core Components
//!
//! - **Store**: The runtime that manages state and executes effects
//! - **Effect Executor**: Executes effect descriptions and feeds actions back to reducers
//! - **Action Broadcast**: Lets observers watch actions produced by effects
//!
//! ## Example
//!
//! ```ignore
//! use taskflow_runtime::Store;
//! use taskflow_core::reducer::Reducer;
//!
//! let store = Store::new(initial_state, my_reducer, environment);
//!
//! // Send an action
//! let handle = store.send(Action::DoSomething).await;
//! handle.wait().await;
//!
//! // Read state
//! let value = store.state(|s| s.some_field).await;
//! ```

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use taskflow_core::effect::Effect;
use taskflow_core::reducer::Reducer;
use tokio::sync::{RwLock, broadcast, watch};

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    ///
    /// Effects themselves are fire-and-forget: an effect that fails logs
    /// the failure and produces no feedback action. The errors here are
    /// the ones the request-response surface can observe.
    #[derive(Error, Debug)]
    pub enum StoreError {
        /// Timeout waiting for terminal action
        ///
        /// Returned by `send_and_wait_for` when the timeout expires before
        /// a matching action is received.
        #[error("Timeout waiting for action")]
        Timeout,

        /// Action broadcast channel closed
        ///
        /// The action broadcast channel was closed, typically because the
        /// store was dropped while a waiter was still subscribed.
        #[error("Action broadcast channel closed")]
        ChannelClosed,
    }
}

pub use error::StoreError;

/// Internal: shared effect bookkeeping behind an [`EffectHandle`]
///
/// Cloned into every spawned effect task; the counter and notifier let the
/// handle observe the moment the last task finishes.
struct EffectTracking {
    pending: Arc<AtomicUsize>,
    notifier: watch::Sender<()>,
}

impl Clone for EffectTracking {
    fn clone(&self) -> Self {
        Self {
            pending: Arc::clone(&self.pending),
            notifier: self.notifier.clone(),
        }
    }
}

impl EffectTracking {
    fn increment(&self) {
        self.pending.fetch_add(1, Ordering::SeqCst);
    }

    fn decrement(&self) {
        if self.pending.fetch_sub(1, Ordering::SeqCst) == 1 {
            // Last effect finished; wake any waiter. No receivers is fine.
            let _ = self.notifier.send(());
        }
    }
}

/// Internal: RAII guard that decrements the effect counter on drop
///
/// Ensures the counter is always decremented, even if the effect panics.
struct DecrementGuard(EffectTracking);

impl Drop for DecrementGuard {
    fn drop(&mut self) {
        self.0.decrement();
    }
}

/// Handle to the effects spawned by one [`Store::send`] call
///
/// `send` returns after *starting* effect execution. Awaiting
/// [`EffectHandle::wait`] blocks until every spawned effect - and the
/// dispatch of any feedback action it produced, including that action's
/// own effects - has completed.
#[must_use = "dropping the handle detaches the effects; await wait() to observe completion"]
pub struct EffectHandle {
    pending: Arc<AtomicUsize>,
    completion: watch::Receiver<()>,
}

impl EffectHandle {
    /// Create a new handle plus the tracking half used by effect tasks
    fn new() -> (Self, EffectTracking) {
        let pending = Arc::new(AtomicUsize::new(0));
        let (notifier, completion) = watch::channel(());

        let handle = Self {
            pending: Arc::clone(&pending),
            completion,
        };

        let tracking = EffectTracking { pending, notifier };

        (handle, tracking)
    }

    /// Wait until all effects tracked by this handle have completed
    ///
    /// Returns immediately if the originating `send` produced no effects.
    pub async fn wait(mut self) {
        loop {
            if self.pending.load(Ordering::SeqCst) == 0 {
                return;
            }
            // A send() on the notifier after our last seen version wakes us;
            // an error means the tracking half is gone, so nothing is pending.
            if self.completion.changed().await.is_err() {
                return;
            }
        }
    }
}

/// The Store - runtime coordinator for a reducer
///
/// The Store manages:
/// 1. State (behind `RwLock` for concurrent access)
/// 2. Reducer (business logic)
/// 3. Environment (injected dependencies)
/// 4. Effect execution (with feedback loop)
///
/// Dispatch is serialized: each `send` runs the reducer under the state
/// write lock, one action at a time. Effects run on spawned tasks and
/// re-enter through `send`, so their feedback actions serialize the same
/// way.
///
/// # Type Parameters
///
/// - `S`: State type
/// - `A`: Action type
/// - `E`: Environment type
/// - `R`: Reducer implementation
///
/// # Example
///
/// ```ignore
/// let store = Store::new(TodosState::default(), reducer, environment);
///
/// let handle = store.send(TodosAction::FetchTodos).await;
/// handle.wait().await;
/// let count = store.state(|s| s.entities.len()).await;
/// ```
pub struct Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    state: Arc<RwLock<S>>,
    reducer: R,
    environment: E,
    /// Action broadcast channel for observing actions produced by effects.
    ///
    /// All actions produced by effects (e.g., from `Effect::Future`) are
    /// broadcast to observers. This enables request-response patterns and
    /// lets a view layer re-read state when a completion action lands.
    action_broadcast: broadcast::Sender<A>,
}

impl<S, A, E, R> Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E> + Clone + Send + Sync + 'static,
    A: Send + Clone + 'static,
    S: Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    /// Create a new store with initial state, reducer, and environment
    ///
    /// The action broadcast capacity defaults to 16; increase with
    /// [`Store::with_broadcast_capacity`] if observers frequently lag.
    #[must_use]
    pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
        Self::with_broadcast_capacity(initial_state, reducer, environment, 16)
    }

    /// Create a new store with custom action broadcast capacity
    ///
    /// # Arguments
    ///
    /// - `initial_state`: The starting state for the store
    /// - `reducer`: The reducer implementation (business logic)
    /// - `environment`: Injected dependencies
    /// - `capacity`: Action broadcast channel capacity (number of actions buffered)
    #[must_use]
    pub fn with_broadcast_capacity(
        initial_state: S,
        reducer: R,
        environment: E,
        capacity: usize,
    ) -> Self {
        let (action_broadcast, _) = broadcast::channel(capacity);

        Self {
            state: Arc::new(RwLock::new(initial_state)),
            reducer,
            environment,
            action_broadcast,
        }
    }

    /// Send an action to the store
    ///
    /// This is the primary way to interact with the store:
    /// 1. Acquires the write lock on state
    /// 2. Calls the reducer with (state, action, environment)
    /// 3. Executes returned effects on spawned tasks
    /// 4. Effects may produce more actions (feedback loop)
    ///
    /// `send` returns after starting effect execution, not completion; use
    /// the returned [`EffectHandle`] to wait for the effects (and their
    /// feedback dispatches) to finish.
    #[tracing::instrument(skip(self, action), name = "store_send")]
    pub async fn send(&self, action: A) -> EffectHandle {
        metrics::counter!("store.actions.sent").increment(1);

        let effects = {
            let mut state = self.state.write().await;
            self.reducer.reduce(&mut state, action, &self.environment)
        };

        let (handle, tracking) = EffectHandle::new();
        for effect in effects {
            self.execute_effect(effect, &tracking);
        }

        handle
    }

    /// Send an action and wait for a matching result action
    ///
    /// Designed for request-response flows: subscribe to the action
    /// broadcast *before* sending (avoiding a race with fast effects),
    /// dispatch the action, then wait for a feedback action matching the
    /// predicate.
    ///
    /// # Arguments
    ///
    /// - `action`: The initial action to send
    /// - `predicate`: Tests whether a feedback action is the terminal result
    /// - `timeout`: Maximum time to wait for a matching action
    ///
    /// # Errors
    ///
    /// - [`StoreError::Timeout`]: no matching action arrived in time (this
    ///   is also how a failed effect surfaces, since failures produce no
    ///   feedback action)
    /// - [`StoreError::ChannelClosed`]: the broadcast channel closed
    ///
    /// # Example
    ///
    /// ```ignore
    /// let loaded = store
    ///     .send_and_wait_for(
    ///         TodosAction::FetchTodos,
    ///         |a| matches!(a, TodosAction::TodosLoaded(_)),
    ///         Duration::from_secs(5),
    ///     )
    ///     .await?;
    /// ```
    pub async fn send_and_wait_for<F>(
        &self,
        action: A,
        predicate: F,
        timeout: std::time::Duration,
    ) -> Result<A, StoreError>
    where
        F: Fn(&A) -> bool,
    {
        let mut actions = self.action_broadcast.subscribe();
        let _handle = self.send(action).await;

        let deadline = tokio::time::sleep(timeout);
        tokio::pin!(deadline);

        loop {
            tokio::select! {
                () = &mut deadline => return Err(StoreError::Timeout),
                received = actions.recv() => match received {
                    Ok(action) if predicate(&action) => return Ok(action),
                    Ok(_) => {},
                    // Lagged observers just keep reading; timeout catches the rest.
                    Err(broadcast::error::RecvError::Lagged(_)) => {},
                    Err(broadcast::error::RecvError::Closed) => {
                        return Err(StoreError::ChannelClosed);
                    },
                },
            }
        }
    }

    /// Read a projection of the current state
    ///
    /// Takes the read lock, applies `f`, and returns the result. Keep `f`
    /// cheap; it runs under the lock.
    pub async fn state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&S) -> T,
    {
        let state = self.state.read().await;
        f(&state)
    }

    /// Subscribe to actions produced by effects
    ///
    /// Only feedback actions are broadcast, not the actions passed to
    /// `send` directly.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<A> {
        self.action_broadcast.subscribe()
    }

    /// Execute a single effect, tracking it under `tracking`
    fn execute_effect(&self, effect: Effect<A>, tracking: &EffectTracking) {
        match effect {
            Effect::None => {},
            Effect::Future(future) => {
                tracking.increment();
                metrics::counter!("store.effects.spawned").increment(1);

                let store = self.clone();
                let tracking = tracking.clone();
                tokio::spawn(async move {
                    let _guard = DecrementGuard(tracking);
                    let Some(action) = future.await else {
                        return;
                    };

                    metrics::counter!("store.effects.feedback").increment(1);

                    // Feed the action back through the reducer and wait for
                    // any cascading effects so the originating handle covers
                    // the whole chain. Boxing breaks the otherwise-infinite
                    // future type of send -> effect -> send.
                    let nested: std::pin::Pin<Box<dyn Future<Output = EffectHandle> + Send>> = {
                        let store = store.clone();
                        let action = action.clone();
                        Box::pin(async move { store.send(action).await })
                    };
                    nested.await.wait().await;

                    // Broadcast after the dispatch: an observer that re-reads
                    // state on receipt sees the post-dispatch snapshot.
                    let _ = store.action_broadcast.send(action);
                });
            },
        }
    }
}

impl<S, A, E, R> Clone for Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E> + Clone,
    E: Clone,
{
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            reducer: self.reducer.clone(),
            environment: self.environment.clone(),
            action_broadcast: self.action_broadcast.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskflow_core::{SmallVec, smallvec};

    #[derive(Clone, Debug, Default)]
    struct PingState {
        pings: u32,
        pongs: u32,
    }

    #[derive(Clone, Debug, PartialEq)]
    enum PingAction {
        Ping,
        Pong,
    }

    #[derive(Clone)]
    struct PingReducer;

    impl Reducer for PingReducer {
        type State = PingState;
        type Action = PingAction;
        type Environment = ();

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            _env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]> {
            match action {
                PingAction::Ping => {
                    state.pings += 1;
                    smallvec![Effect::future(async { Some(PingAction::Pong) })]
                },
                PingAction::Pong => {
                    state.pongs += 1;
                    SmallVec::new()
                },
            }
        }
    }

    #[tokio::test]
    async fn send_applies_action_synchronously() {
        let store = Store::new(PingState::default(), PingReducer, ());

        let handle = store.send(PingAction::Pong).await;
        handle.wait().await;

        assert_eq!(store.state(|s| s.pongs).await, 1);
    }

    #[tokio::test]
    async fn effect_feedback_reenters_reducer() {
        let store = Store::new(PingState::default(), PingReducer, ());

        store.send(PingAction::Ping).await.wait().await;

        let state = store.state(Clone::clone).await;
        assert_eq!(state.pings, 1);
        assert_eq!(state.pongs, 1);
    }

    #[tokio::test]
    async fn feedback_actions_are_broadcast() {
        let store = Store::new(PingState::default(), PingReducer, ());
        let mut actions = store.subscribe();

        store.send(PingAction::Ping).await.wait().await;

        assert_eq!(actions.recv().await.ok(), Some(PingAction::Pong));
    }

    #[tokio::test]
    async fn send_and_wait_for_matches_terminal_action() {
        let store = Store::new(PingState::default(), PingReducer, ());

        let result = store
            .send_and_wait_for(
                PingAction::Ping,
                |a| matches!(a, PingAction::Pong),
                std::time::Duration::from_secs(1),
            )
            .await;

        assert!(matches!(result, Ok(PingAction::Pong)));
    }

    #[tokio::test]
    async fn send_and_wait_for_times_out_without_feedback() {
        let store = Store::new(PingState::default(), PingReducer, ());

        // Pong produces no effects, so no feedback action ever arrives.
        let result = store
            .send_and_wait_for(
                PingAction::Pong,
                |a| matches!(a, PingAction::Ping),
                std::time::Duration::from_millis(50),
            )
            .await;

        assert!(matches!(result, Err(StoreError::Timeout)));
    }
}
