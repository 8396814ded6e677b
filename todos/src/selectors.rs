//! Layered, memoized read-views over the app state.
//!
//! Selector layering mirrors the data flow:
//!
//! ```text
//! entities ──► todos ──► todo_ids
//!                 │
//!                 ├──(+ filters)──► filtered_todos ──► filtered_todo_ids
//! ```
//!
//! Each derived layer is a [`Memo`] cell keyed on the *identity* of its
//! inputs: a layer recomputes only when the `Arc` feeding it was replaced.
//! An unrelated state change (say, a filter edit) therefore never re-scans
//! the todo list.
//!
//! Referential stability is part of the contract, not an optimization:
//! with the `All` status and no color filter, `filtered_todos` returns
//! the *same allocation* as `todos`, and a cache hit anywhere returns the
//! previously handed-out value. Consumers may compare pointers to decide
//! whether to re-render.

use crate::app::AppState;
use crate::filters::{FiltersState, StatusFilter};
use crate::state::{LoadingStatus, Todo, TodoEntities, TodoId};
use std::sync::Arc;
use taskflow_core::selector::Memo;

/// Ordered todo list handed out by the derived selectors
pub type TodoList = Arc<[Arc<Todo>]>;

/// Ordered id list handed out by the derived selectors
pub type TodoIdList = Arc<[TodoId]>;

/// Direct projection of the entity mapping
#[must_use]
pub fn select_todo_entities(state: &AppState) -> &Arc<TodoEntities> {
    &state.todos.entities
}

/// Direct projection of the loading status
#[must_use]
pub fn select_loading_status(state: &AppState) -> LoadingStatus {
    state.todos.status
}

/// Direct lookup of one todo; cheap enough that memoizing would cost more
#[must_use]
pub fn select_todo_by_id<'a>(state: &'a AppState, id: &TodoId) -> Option<&'a Arc<Todo>> {
    state.todos.entities.get(id)
}

/// The memoized selector chain for the todos slice
///
/// One instance per consumer (a view layer, a test); the cells are
/// internally synchronized, so sharing an instance behind an `Arc` works
/// too.
#[derive(Default)]
pub struct TodoSelectors {
    todos: Memo<Arc<TodoEntities>, TodoList>,
    todo_ids: Memo<TodoList, TodoIdList>,
    filtered_todos: Memo<(TodoList, Arc<FiltersState>), TodoList>,
    filtered_todo_ids: Memo<TodoList, TodoIdList>,
}

impl TodoSelectors {
    /// Creates a fresh selector chain with empty caches
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All todos, in entity (insertion) order
    ///
    /// Recomputes only when the entity mapping was replaced.
    pub fn todos(&self, state: &AppState) -> TodoList {
        self.todos
            .compute(Arc::clone(&state.todos.entities), |entities| {
                entities.values().cloned().collect()
            })
    }

    /// Ids of all todos, derived from [`TodoSelectors::todos`]
    pub fn todo_ids(&self, state: &AppState) -> TodoIdList {
        let todos = self.todos(state);
        self.todo_ids
            .compute(todos, |todos| todos.iter().map(|t| t.id.clone()).collect())
    }

    /// Todos passing the current filters
    ///
    /// A todo passes when its completion matches the status filter (or the
    /// status is `All`) and its color is in the selected set (or the set is
    /// empty; a colorless todo never matches a non-empty set). With `All`
    /// and an empty set the input list itself is returned - pointer-equal
    /// to [`TodoSelectors::todos`]' result.
    pub fn filtered_todos(&self, state: &AppState) -> TodoList {
        let todos = self.todos(state);
        let filters = Arc::clone(&state.filters);

        self.filtered_todos
            .compute((todos, filters), |(todos, filters)| {
                let show_all = filters.status == StatusFilter::All;
                if show_all && filters.colors.is_empty() {
                    return Arc::clone(todos);
                }

                todos
                    .iter()
                    .filter(|todo| {
                        let status_matches = filters.status.matches(todo.completed);
                        let color_matches = filters.colors.is_empty()
                            || todo
                                .color
                                .is_some_and(|color| filters.colors.contains(&color));
                        status_matches && color_matches
                    })
                    .cloned()
                    .collect()
            })
    }

    /// Ids of the filtered todos, derived from [`TodoSelectors::filtered_todos`]
    pub fn filtered_todo_ids(&self, state: &AppState) -> TodoIdList {
        let filtered = self.filtered_todos(state);
        self.filtered_todo_ids
            .compute(filtered, |todos| {
                todos.iter().map(|t| t.id.clone()).collect()
            })
    }
}
