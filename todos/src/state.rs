//! Domain types and state snapshot for the todos slice.
//!
//! The entity mapping lives behind an `Arc`, and every todo record behind
//! its own `Arc`: updates replace the touched allocations (copy-on-write)
//! while untouched entries keep their identity. Readers holding a previous
//! snapshot can therefore detect change with a pointer comparison, which
//! is what the selector layer's memoization is built on.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Unique identifier for a todo item.
///
/// Ids are server-assigned opaque strings; the slice never interprets
/// them beyond equality and hashing.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(String);

impl TodoId {
    /// Creates a `TodoId` from anything string-like
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TodoId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for TodoId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for TodoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Color tag a todo can be marked with
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    /// Green tag
    Green,
    /// Blue tag
    Blue,
    /// Orange tag
    Orange,
    /// Purple tag
    Purple,
    /// Red tag
    Red,
}

impl Color {
    /// Every color tag, in display order
    pub const ALL: [Self; 5] = [
        Self::Green,
        Self::Blue,
        Self::Orange,
        Self::Purple,
        Self::Red,
    ];

    /// Lowercase name, matching the wire encoding
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Green => "green",
            Self::Blue => "blue",
            Self::Orange => "orange",
            Self::Purple => "purple",
            Self::Red => "red",
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single todo item
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    /// Unique identifier (stable; assigned by the server on create)
    pub id: TodoId,
    /// Free text of the todo
    pub text: String,
    /// Whether the todo is completed
    #[serde(default)]
    pub completed: bool,
    /// Optional color tag
    #[serde(default)]
    pub color: Option<Color>,
}

impl Todo {
    /// Creates a new, uncompleted, untagged todo
    pub fn new(id: impl Into<TodoId>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            completed: false,
            color: None,
        }
    }

    /// Builder-style color tag, mostly for tests and fixtures
    #[must_use]
    pub const fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// Builder-style completion flag, mostly for tests and fixtures
    #[must_use]
    pub const fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }
}

/// Loading status of the collection
///
/// Transitions only through the explicit loading/loaded actions. There is
/// deliberately no failure variant: a failed fetch leaves the status as-is
/// (see the reducer docs).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoadingStatus {
    /// No fetch in flight
    #[default]
    Idle,
    /// A fetch has been dispatched and has not completed
    Loading,
}

/// The entity mapping: todos keyed by id, in insertion order
///
/// Invariants:
/// - every key equals the `id` field of its value
/// - iteration order is insertion order; removals preserve the relative
///   order of survivors
pub type TodoEntities = IndexMap<TodoId, Arc<Todo>>;

/// State snapshot of the todos slice
#[derive(Clone, Debug, Default)]
pub struct TodosState {
    /// Loading status of the collection
    pub status: LoadingStatus,
    /// All todos, keyed by id
    pub entities: Arc<TodoEntities>,
}

impl TodosState {
    /// Creates a new empty state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of todos
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns `true` if there are no todos
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Returns the number of completed todos
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.entities.values().filter(|t| t.completed).count()
    }

    /// Returns a todo by id
    #[must_use]
    pub fn get(&self, id: &TodoId) -> Option<&Arc<Todo>> {
        self.entities.get(id)
    }

    /// Checks whether a todo exists
    #[must_use]
    pub fn contains(&self, id: &TodoId) -> bool {
        self.entities.contains_key(id)
    }
}
