//! Reducer logic for the todos slice.
//!
//! All entity updates are copy-on-write: the mapping and the touched
//! records are freshly allocated whenever anyone else still holds them,
//! and untouched records keep their identity. Actions addressing a missing
//! id, and bulk actions with nothing to do, return without touching the
//! mapping at all - the `entities` pointer stays identical, which readers
//! and memoized selectors rely on to skip work.
//!
//! The two command variants produce the slice's async operations as
//! effects: dispatch the loading transition (fetch only), await one API
//! call, feed the completion event back through the store. A failed call
//! is logged and produces no event; after a failed fetch the status stays
//! `Loading` until another fetch completes. That gap is deliberate - the
//! slice has no failure transition.

use crate::actions::TodosAction;
use crate::api::TodosApi;
use crate::state::{Color, LoadingStatus, Todo, TodoId, TodosState};
use std::sync::Arc;
use taskflow_core::effect::Effect;
use taskflow_core::reducer::Reducer;
use taskflow_core::{SmallVec, smallvec};

/// Environment dependencies for the todos reducer
#[derive(Debug, Clone)]
pub struct TodosEnvironment<C> {
    /// API client used by the fetch/save commands
    pub api: C,
}

impl<C: TodosApi> TodosEnvironment<C> {
    /// Creates a new `TodosEnvironment`
    #[must_use]
    pub const fn new(api: C) -> Self {
        Self { api }
    }
}

/// Reducer for the todos slice
///
/// Generic over the API client type `C` so production and tests inject
/// different implementations through the environment.
#[derive(Debug, Clone)]
pub struct TodosReducer<C> {
    _phantom: std::marker::PhantomData<C>,
}

impl<C> TodosReducer<C> {
    /// Creates a new `TodosReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<C> Default for TodosReducer<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> TodosReducer<C> {
    /// Flip the completion flag of the addressed todo
    fn toggle(state: &mut TodosState, id: &TodoId) {
        if !state.entities.contains_key(id) {
            return;
        }
        let entities = Arc::make_mut(&mut state.entities);
        if let Some(entry) = entities.get_mut(id) {
            let todo = Arc::make_mut(entry);
            todo.completed = !todo.completed;
        }
    }

    /// Overwrite the color tag of the addressed todo
    fn select_color(state: &mut TodosState, id: &TodoId, color: Color) {
        if !state.entities.contains_key(id) {
            return;
        }
        let entities = Arc::make_mut(&mut state.entities);
        if let Some(entry) = entities.get_mut(id) {
            Arc::make_mut(entry).color = Some(color);
        }
    }

    /// Remove the addressed todo, preserving the order of the rest
    fn delete(state: &mut TodosState, id: &TodoId) {
        if !state.entities.contains_key(id) {
            return;
        }
        Arc::make_mut(&mut state.entities).shift_remove(id);
    }

    /// Mark every todo completed; already-completed records keep their identity
    fn complete_all(state: &mut TodosState) {
        if state.entities.values().all(|t| t.completed) {
            return;
        }
        let entities = Arc::make_mut(&mut state.entities);
        for entry in entities.values_mut() {
            if !entry.completed {
                Arc::make_mut(entry).completed = true;
            }
        }
    }

    /// Remove every completed todo; survivors keep their identity and order
    fn clear_completed(state: &mut TodosState) {
        if !state.entities.values().any(|t| t.completed) {
            return;
        }
        Arc::make_mut(&mut state.entities).retain(|_, todo| !todo.completed);
    }

    /// Replace the whole collection and leave the loading state
    fn load(state: &mut TodosState, todos: Vec<Todo>) {
        state.entities = Arc::new(
            todos
                .into_iter()
                .map(|todo| (todo.id.clone(), Arc::new(todo)))
                .collect(),
        );
        state.status = LoadingStatus::Idle;
    }
}

impl<C> Reducer for TodosReducer<C>
where
    C: TodosApi + Clone + Send + Sync + 'static,
{
    type State = TodosState;
    type Action = TodosAction;
    type Environment = TodosEnvironment<C>;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ========== Events ==========
            TodosAction::TodoAdded(todo) => {
                let entities = Arc::make_mut(&mut state.entities);
                entities.insert(todo.id.clone(), Arc::new(todo));
                SmallVec::new()
            },

            TodosAction::TodoToggled(id) => {
                Self::toggle(state, &id);
                SmallVec::new()
            },

            TodosAction::ColorSelected { todo_id, color } => {
                Self::select_color(state, &todo_id, color);
                SmallVec::new()
            },

            TodosAction::TodoDeleted(id) => {
                Self::delete(state, &id);
                SmallVec::new()
            },

            TodosAction::AllCompleted => {
                Self::complete_all(state);
                SmallVec::new()
            },

            TodosAction::CompletedCleared => {
                Self::clear_completed(state);
                SmallVec::new()
            },

            TodosAction::TodosLoading => {
                state.status = LoadingStatus::Loading;
                SmallVec::new()
            },

            TodosAction::TodosLoaded(todos) => {
                Self::load(state, todos);
                SmallVec::new()
            },

            // ========== Commands ==========
            TodosAction::FetchTodos => {
                state.status = LoadingStatus::Loading;

                let api = env.api.clone();
                smallvec![Effect::future(async move {
                    match api.fetch_todos().await {
                        Ok(todos) => Some(TodosAction::TodosLoaded(todos)),
                        Err(error) => {
                            tracing::error!(%error, "failed to fetch todos");
                            None
                        },
                    }
                })]
            },

            TodosAction::SaveNewTodo { text } => {
                let api = env.api.clone();
                smallvec![Effect::future(async move {
                    match api.create_todo(&text).await {
                        Ok(todo) => Some(TodosAction::TodoAdded(todo)),
                        Err(error) => {
                            tracing::error!(%error, "failed to save new todo");
                            None
                        },
                    }
                })]
            },
        }
    }
}
