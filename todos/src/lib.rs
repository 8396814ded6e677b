//! Todos feature slice built on the Taskflow architecture.
//!
//! This crate implements a todo-list feature as a unidirectional state
//! container:
//!
//! - Immutable state snapshot with a keyed entity mapping ([`state`])
//! - Typed actions: events applied by the reducer, commands that launch
//!   async work ([`actions`])
//! - A pure reducer with copy-on-write entity updates ([`reducer`])
//! - Memoized, layered selectors with referential-stability guarantees
//!   ([`selectors`])
//! - A collaborating filters slice ([`filters`])
//! - An HTTP API client behind a trait, plus an in-memory mock ([`api`],
//!   [`mocks`])
//!
//! # Quick Start
//!
//! ```no_run
//! use taskflow_runtime::Store;
//! use taskflow_todos::app::{AppEnvironment, AppReducer, AppState};
//! use taskflow_todos::actions::TodosAction;
//! use taskflow_todos::mocks::MockTodosApi;
//! use taskflow_todos::selectors::TodoSelectors;
//!
//! # async fn example() {
//! let env = AppEnvironment::new(MockTodosApi::new());
//! let store = Store::new(AppState::default(), AppReducer::new(), env);
//! let selectors = TodoSelectors::new();
//!
//! // Load todos from the API, then read the derived list
//! store.send(TodosAction::FetchTodos.into()).await.wait().await;
//! let todos = store.state(|s| selectors.todos(s)).await;
//! println!("loaded {} todos", todos.len());
//! # }
//! ```

pub mod actions;
pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod filters;
pub mod mocks;
pub mod reducer;
pub mod selectors;
pub mod state;

// Re-export main types for convenience
pub use actions::TodosAction;
pub use api::{HttpTodosApi, TodosApi};
pub use app::{AppAction, AppEnvironment, AppReducer, AppState};
pub use error::ApiError;
pub use filters::{FiltersAction, FiltersState, StatusFilter};
pub use reducer::{TodosEnvironment, TodosReducer};
pub use selectors::TodoSelectors;
pub use state::{Color, LoadingStatus, Todo, TodoId, TodosState};
