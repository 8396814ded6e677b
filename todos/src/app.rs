//! App-level composition: the state tree and the combined reducer.
//!
//! The todos reducer is registered as a named slice of a larger state
//! tree next to the filters slice. The app reducer routes each action to
//! its slice and lifts the slice's effects into [`AppAction`] so feedback
//! actions re-enter through the same root.

use crate::actions::TodosAction;
use crate::api::TodosApi;
use crate::filters::{FiltersAction, FiltersReducer, FiltersState};
use crate::reducer::{TodosEnvironment, TodosReducer};
use crate::state::TodosState;
use std::sync::Arc;
use taskflow_core::SmallVec;
use taskflow_core::effect::Effect;
use taskflow_core::reducer::Reducer;

/// The full state tree
#[derive(Clone, Debug, Default)]
pub struct AppState {
    /// Todos slice
    pub todos: TodosState,
    /// Filters slice, shared so selectors can key caches on its identity
    pub filters: Arc<FiltersState>,
}

/// Union of every slice's actions
#[derive(Clone, Debug, PartialEq)]
pub enum AppAction {
    /// An action for the todos slice
    Todos(TodosAction),
    /// An action for the filters slice
    Filters(FiltersAction),
}

impl From<TodosAction> for AppAction {
    fn from(action: TodosAction) -> Self {
        Self::Todos(action)
    }
}

impl From<FiltersAction> for AppAction {
    fn from(action: FiltersAction) -> Self {
        Self::Filters(action)
    }
}

/// App-level environment: each slice's dependencies
#[derive(Debug, Clone)]
pub struct AppEnvironment<C> {
    /// Todos slice dependencies
    pub todos: TodosEnvironment<C>,
}

impl<C: TodosApi> AppEnvironment<C> {
    /// Creates an environment around an API client
    #[must_use]
    pub const fn new(api: C) -> Self {
        Self {
            todos: TodosEnvironment::new(api),
        }
    }
}

/// Root reducer delegating to the slice reducers
#[derive(Debug, Clone)]
pub struct AppReducer<C> {
    todos: TodosReducer<C>,
    filters: FiltersReducer,
}

impl<C> AppReducer<C> {
    /// Creates the root reducer
    #[must_use]
    pub const fn new() -> Self {
        Self {
            todos: TodosReducer::new(),
            filters: FiltersReducer,
        }
    }
}

impl<C> Default for AppReducer<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Reducer for AppReducer<C>
where
    C: TodosApi + Clone + Send + Sync + 'static,
{
    type State = AppState;
    type Action = AppAction;
    type Environment = AppEnvironment<C>;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            AppAction::Todos(action) => self
                .todos
                .reduce(&mut state.todos, action, &env.todos)
                .into_iter()
                .map(|effect| effect.map(AppAction::Todos))
                .collect(),
            AppAction::Filters(action) => self
                .filters
                .reduce(&mut state.filters, action, &())
                .into_iter()
                .map(|effect| effect.map(AppAction::Filters))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::StatusFilter;
    use crate::mocks::MockTodosApi;
    use crate::state::{LoadingStatus, Todo};
    use taskflow_testing::{ReducerTest, assertions};

    fn reducer() -> AppReducer<MockTodosApi> {
        AppReducer::new()
    }

    fn env() -> AppEnvironment<MockTodosApi> {
        AppEnvironment::new(MockTodosApi::new())
    }

    #[test]
    fn routes_todos_actions_to_the_todos_slice() {
        ReducerTest::new(reducer())
            .with_env(env())
            .given_state(AppState::default())
            .when_action(TodosAction::TodoAdded(Todo::new("a", "routed")).into())
            .then_state(|state| {
                assert_eq!(state.todos.len(), 1);
                assert_eq!(*state.filters, FiltersState::default());
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn routes_filters_actions_to_the_filters_slice() {
        ReducerTest::new(reducer())
            .with_env(env())
            .given_state(AppState::default())
            .when_action(FiltersAction::StatusChanged(StatusFilter::Active).into())
            .then_state(|state| {
                assert_eq!(state.filters.status, StatusFilter::Active);
                assert!(state.todos.is_empty());
            })
            .run();
    }

    #[test]
    fn lifts_todos_effects_into_app_actions() {
        ReducerTest::new(reducer())
            .with_env(env())
            .given_state(AppState::default())
            .when_action(TodosAction::FetchTodos.into())
            .then_state(|state| {
                assert_eq!(state.todos.status, LoadingStatus::Loading);
            })
            .then_effects(|effects| {
                assertions::assert_effects_count(effects, 1);
                assertions::assert_has_future_effect(effects);
            })
            .run();
    }
}
