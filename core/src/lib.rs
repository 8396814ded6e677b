//! # Taskflow Core
//!
//! Core traits and types for the Taskflow architecture.
//!
//! This crate provides the fundamental abstractions for building
//! unidirectional-data-flow features around the Reducer pattern.
//!
//! ## Core Concepts
//!
//! - **State**: Domain state for a feature, owned and cloneable
//! - **Action**: All possible inputs to a reducer (events and commands)
//! - **Reducer**: Pure function `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: Side effect descriptions (not execution)
//! - **Environment**: Injected dependencies via traits
//! - **Selector**: Memoized read-view over state (see [`selector`])
//!
//! ## Architecture Principles
//!
//! - Functional Core, Imperative Shell
//! - Unidirectional Data Flow
//! - Explicit Effects (no hidden I/O)
//! - Dependency Injection via Environment
//!
//! ## Example
//!
//! ```ignore
//! use taskflow_core::*;
//!
//! #[derive(Clone, Debug, Default)]
//! struct CartState {
//!     items: Vec<LineItem>,
//! }
//!
//! #[derive(Clone, Debug)]
//! enum CartAction {
//!     ItemAdded(LineItem),
//!     Checkout,
//! }
//!
//! impl Reducer for CartReducer {
//!     type State = CartState;
//!     type Action = CartAction;
//!     type Environment = CartEnvironment;
//!
//!     fn reduce(
//!         &self,
//!         state: &mut CartState,
//!         action: CartAction,
//!         env: &CartEnvironment,
//!     ) -> SmallVec<[Effect<CartAction>; 4]> {
//!         // Business logic goes here
//!         SmallVec::new()
//!     }
//! }
//! ```

// Re-export commonly used types
pub use smallvec::{SmallVec, smallvec};

pub mod selector;

/// Reducer module - The core trait for business logic
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`.
/// They contain all business logic and are deterministic and testable.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for business logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The domain state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    ///
    /// # State Discipline
    ///
    /// The reducer receives `&mut State`, but the architecture treats each
    /// dispatch as snapshot-in, snapshot-out: shared subtrees (anything
    /// behind an `Arc` that a reader still holds) must be replaced via
    /// copy-on-write, never mutated through. Holders of a previous snapshot
    /// can then detect change by pointer identity alone.
    ///
    /// # Example
    ///
    /// ```ignore
    /// impl Reducer for CartReducer {
    ///     type State = CartState;
    ///     type Action = CartAction;
    ///     type Environment = CartEnvironment;
    ///
    ///     fn reduce(
    ///         &self,
    ///         state: &mut CartState,
    ///         action: CartAction,
    ///         env: &CartEnvironment,
    ///     ) -> SmallVec<[Effect<CartAction>; 4]> {
    ///         match action {
    ///             CartAction::ItemAdded(item) => {
    ///                 state.items.push(item);
    ///                 SmallVec::new()
    ///             }
    ///             _ => SmallVec::new(),
    ///         }
    ///     }
    /// }
    /// ```
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// This is a pure function that:
        /// 1. Validates the action
        /// 2. Updates state in place (copy-on-write for shared subtrees)
        /// 3. Returns effect descriptions to be executed
        ///
        /// # Arguments
        ///
        /// - `state`: Mutable reference to current state
        /// - `action`: The action to process
        /// - `env`: Reference to injected dependencies
        ///
        /// # Returns
        ///
        /// A vector of effects to be executed by the runtime
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - Side effect descriptions
///
/// Effects describe side effects to be performed by the runtime.
/// They are values (not execution), returned from reducers and executed
/// by the Store.
pub mod effect {
    use std::future::Future;
    use std::pin::Pin;

    /// Effect type - describes a side effect to be executed
    ///
    /// Effects are NOT executed immediately. They are descriptions of what
    /// should happen, returned from reducers and executed by the Store
    /// runtime.
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type that effects can produce (feedback loop)
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Arbitrary async computation
        ///
        /// Returns `Option<Action>` - if Some, the action is fed back into
        /// the reducer
        Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action>
    where
        Action: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Wrap an async computation into an effect
        ///
        /// The future's `Some(action)` result is fed back into the reducer
        /// by the runtime; `None` ends the feedback chain.
        #[must_use]
        pub fn future<F>(future: F) -> Self
        where
            F: Future<Output = Option<Action>> + Send + 'static,
        {
            Effect::Future(Box::pin(future))
        }

        /// Check whether this effect does nothing
        #[must_use]
        pub const fn is_none(&self) -> bool {
            matches!(self, Effect::None)
        }
    }

    impl<Action: Send + 'static> Effect<Action> {
        /// Map the produced action into another action type
        ///
        /// Used when embedding a child feature's reducer into a parent:
        /// the child's effects are lifted into the parent's action space so
        /// the feedback loop re-enters through the parent reducer.
        #[must_use]
        pub fn map<B, F>(self, f: F) -> Effect<B>
        where
            F: FnOnce(Action) -> B + Send + 'static,
        {
            match self {
                Effect::None => Effect::None,
                Effect::Future(future) => {
                    Effect::Future(Box::pin(async move { future.await.map(f) }))
                },
            }
        }
    }
}
