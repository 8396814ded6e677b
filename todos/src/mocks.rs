//! Mock API implementations for tests and demos.
//!
//! [`MockTodosApi`] serves the two endpoints from an in-memory vector at
//! memory speed, assigns ids the way the server would, and can be flipped
//! into a failing mode to exercise error paths.

use crate::api::TodosApi;
use crate::error::{ApiError, Result};
use crate::state::{Todo, TodoId};
use std::sync::{Arc, Mutex, PoisonError};
use uuid::Uuid;

#[derive(Debug, Default)]
struct MockInner {
    todos: Vec<Todo>,
    failing: bool,
}

/// In-memory [`TodosApi`] implementation
///
/// Clones share the same underlying collection, so an instance handed to
/// the environment can still be inspected or reconfigured by the test.
#[derive(Debug, Clone, Default)]
pub struct MockTodosApi {
    inner: Arc<Mutex<MockInner>>,
}

impl MockTodosApi {
    /// Creates an empty mock
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock pre-populated with the given todos
    #[must_use]
    pub fn seeded(todos: Vec<Todo>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockInner {
                todos,
                failing: false,
            })),
        }
    }

    /// Make every subsequent call fail with a server error (or stop failing)
    pub fn set_failing(&self, failing: bool) {
        self.lock().failing = failing;
    }

    /// Snapshot of the todos currently held by the mock server
    #[must_use]
    pub fn todos(&self) -> Vec<Todo> {
        self.lock().todos.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_failing(inner: &MockInner) -> Result<()> {
        if inner.failing {
            return Err(ApiError::Status {
                status: 500,
                message: "mock server failure".to_string(),
            });
        }
        Ok(())
    }
}

impl TodosApi for MockTodosApi {
    async fn fetch_todos(&self) -> Result<Vec<Todo>> {
        let inner = self.lock();
        Self::check_failing(&inner)?;
        Ok(inner.todos.clone())
    }

    async fn create_todo(&self, text: &str) -> Result<Todo> {
        let mut inner = self.lock();
        Self::check_failing(&inner)?;

        // Same contract as the real server: it assigns the id and defaults.
        let todo = Todo::new(TodoId::new(Uuid::new_v4().to_string()), text);
        inner.todos.push(todo.clone());
        Ok(todo)
    }
}
