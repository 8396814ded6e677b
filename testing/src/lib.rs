//! # Taskflow Testing
//!
//! Testing utilities and helpers for the Taskflow architecture.
//!
//! This crate provides:
//! - A fluent Given/When/Then harness for reducers ([`ReducerTest`])
//! - Assertion helpers for effect lists ([`assertions`])
//!
//! Reducers are pure functions, so the bulk of a feature's behavior is
//! testable at memory speed without a runtime: construct a state, apply an
//! action, assert on the result and the returned effects.
//!
//! ## Example
//!
//! ```ignore
//! use taskflow_testing::{ReducerTest, assertions};
//!
//! ReducerTest::new(TodosReducer::new())
//!     .with_env(test_environment())
//!     .given_state(TodosState::default())
//!     .when_action(TodosAction::TodoToggled(id))
//!     .then_state(|state| assert!(state.get(&id).is_some()))
//!     .then_effects(assertions::assert_no_effects)
//!     .run();
//! ```


pub use reducer_test::{ReducerTest, assertions};
