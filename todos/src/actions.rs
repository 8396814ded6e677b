//! Actions for the todos slice.
//!
//! The enum mixes two kinds of variants:
//!
//! - **Events** describe a state transition and are applied directly by
//!   the reducer: insert, toggle, recolor, delete, the bulk operations,
//!   and the loading/loaded pair.
//! - **Commands** request async work: the reducer turns them into effects
//!   whose completion actions (events) are fed back through the store.
//!
//! Constructing an action is free of side effects; nothing happens until
//! it is dispatched.

use crate::state::{Color, Todo, TodoId};
use serde::{Deserialize, Serialize};

/// All inputs the todos reducer understands
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum TodosAction {
    // ========== Events ==========
    /// A todo was added (server-confirmed record; insert or overwrite by id)
    TodoAdded(Todo),

    /// Completion flag of the addressed todo flips (no-op if absent)
    TodoToggled(TodoId),

    /// Color tag of the addressed todo is overwritten (no-op if absent)
    ColorSelected {
        /// Todo to recolor
        todo_id: TodoId,
        /// New color tag
        color: Color,
    },

    /// The addressed todo is removed (no-op if absent)
    TodoDeleted(TodoId),

    /// Every todo is marked completed
    AllCompleted,

    /// Every completed todo is removed
    CompletedCleared,

    /// A fetch is in flight; entities untouched
    TodosLoading,

    /// Full collection replacement (payload order becomes entity order)
    TodosLoaded(Vec<Todo>),

    // ========== Commands ==========
    /// Command: fetch the whole collection from the API
    ///
    /// Applies the `TodosLoading` transition and produces an effect whose
    /// completion is `TodosLoaded`.
    FetchTodos,

    /// Command: create a todo with the given text
    ///
    /// The server assigns the id and default fields; the effect's
    /// completion is `TodoAdded` with the canonical record. Does not touch
    /// the loading status.
    SaveNewTodo {
        /// Free text of the new todo
        text: String,
    },
}

impl TodosAction {
    /// Whether this action is a command (requests async work)
    #[must_use]
    pub const fn is_command(&self) -> bool {
        matches!(self, Self::FetchTodos | Self::SaveNewTodo { .. })
    }

    /// Whether this action is an event (applied directly to state)
    #[must_use]
    pub const fn is_event(&self) -> bool {
        !self.is_command()
    }
}
