//! Store integration tests: the async operations end-to-end against the
//! in-memory API.
//!
//! These run on the default single-threaded test runtime, so spawned
//! effects only make progress at await points; asserting the intermediate
//! `Loading` status right after a dispatch is deterministic.

use std::time::Duration;
use taskflow_runtime::{Store, StoreError};
use taskflow_todos::actions::TodosAction;
use taskflow_todos::app::{AppAction, AppEnvironment, AppReducer, AppState};
use taskflow_todos::filters::{FiltersAction, StatusFilter};
use taskflow_todos::mocks::MockTodosApi;
use taskflow_todos::selectors::TodoSelectors;
use taskflow_todos::state::{Color, LoadingStatus, Todo, TodoId};

type AppStore = Store<AppState, AppAction, AppEnvironment<MockTodosApi>, AppReducer<MockTodosApi>>;

fn store_with(api: MockTodosApi) -> AppStore {
    Store::new(
        AppState::default(),
        AppReducer::new(),
        AppEnvironment::new(api),
    )
}

#[tokio::test]
async fn fetch_dispatches_loading_then_loaded() {
    let api = MockTodosApi::seeded(vec![Todo::new("1", "from server")]);
    let store = store_with(api);
    let mut actions = store.subscribe();

    let handle = store.send(TodosAction::FetchTodos.into()).await;

    // The loading transition is applied synchronously by the dispatch
    assert_eq!(
        store.state(|s| s.todos.status).await,
        LoadingStatus::Loading
    );

    handle.wait().await;

    // The loaded event landed when the call resolved
    let state = store.state(Clone::clone).await;
    assert_eq!(state.todos.status, LoadingStatus::Idle);
    assert_eq!(state.todos.len(), 1);
    assert!(state.todos.contains(&TodoId::from("1")));

    // Exactly one feedback action was dispatched
    let feedback = actions.recv().await.unwrap();
    assert!(matches!(
        feedback,
        AppAction::Todos(TodosAction::TodosLoaded(todos)) if todos.len() == 1
    ));
    assert!(actions.try_recv().is_err());
}

#[tokio::test]
async fn fetch_replaces_previous_entities() {
    let api = MockTodosApi::seeded(vec![Todo::new("1", "canonical")]);
    let store = store_with(api);

    store
        .send(TodosAction::TodoAdded(Todo::new("local", "optimistic")).into())
        .await
        .wait()
        .await;

    store
        .send(TodosAction::FetchTodos.into())
        .await
        .wait()
        .await;

    let state = store.state(Clone::clone).await;
    assert!(!state.todos.contains(&TodoId::from("local")));
    assert!(state.todos.contains(&TodoId::from("1")));
}

#[tokio::test]
async fn save_appends_server_record() {
    let store = store_with(MockTodosApi::new());

    let result = store
        .send_and_wait_for(
            TodosAction::SaveNewTodo {
                text: "buy milk".to_string(),
            }
            .into(),
            |a| matches!(a, AppAction::Todos(TodosAction::TodoAdded(_))),
            Duration::from_secs(1),
        )
        .await
        .unwrap();

    let AppAction::Todos(TodosAction::TodoAdded(created)) = result else {
        unreachable!("predicate only matches TodoAdded");
    };

    let state = store.state(Clone::clone).await;
    // The save path never touches the loading status
    assert_eq!(state.todos.status, LoadingStatus::Idle);
    let stored = state.todos.get(&created.id).unwrap();
    assert_eq!(stored.text, "buy milk");
    assert!(!stored.completed);
}

#[tokio::test]
async fn overlapping_saves_land_independently() {
    let store = store_with(MockTodosApi::new());

    let first = store
        .send(
            TodosAction::SaveNewTodo {
                text: "first".to_string(),
            }
            .into(),
        )
        .await;
    let second = store
        .send(
            TodosAction::SaveNewTodo {
                text: "second".to_string(),
            }
            .into(),
        )
        .await;

    first.wait().await;
    second.wait().await;

    let texts = store
        .state(|s| {
            s.todos
                .entities
                .values()
                .map(|t| t.text.clone())
                .collect::<Vec<_>>()
        })
        .await;
    assert_eq!(texts.len(), 2);
    assert!(texts.contains(&"first".to_string()));
    assert!(texts.contains(&"second".to_string()));
}

#[tokio::test]
async fn failed_fetch_leaves_status_loading() {
    let api = MockTodosApi::seeded(vec![Todo::new("1", "unreachable")]);
    api.set_failing(true);
    let store = store_with(api.clone());

    let result = store
        .send_and_wait_for(
            TodosAction::FetchTodos.into(),
            |a| matches!(a, AppAction::Todos(TodosAction::TodosLoaded(_))),
            Duration::from_millis(100),
        )
        .await;

    // No feedback action: the failure only shows up as a timeout
    assert!(matches!(result, Err(StoreError::Timeout)));

    // The status stays stuck at Loading until a later fetch completes
    let state = store.state(Clone::clone).await;
    assert_eq!(state.todos.status, LoadingStatus::Loading);
    assert!(state.todos.is_empty());

    api.set_failing(false);
    store
        .send(TodosAction::FetchTodos.into())
        .await
        .wait()
        .await;

    let state = store.state(Clone::clone).await;
    assert_eq!(state.todos.status, LoadingStatus::Idle);
    assert_eq!(state.todos.len(), 1);
}

#[tokio::test]
async fn selectors_follow_store_updates() {
    let api = MockTodosApi::seeded(vec![
        Todo::new("1", "red done")
            .with_completed(true)
            .with_color(Color::Red),
        Todo::new("2", "blue open").with_color(Color::Blue),
        Todo::new("3", "plain open"),
    ]);
    let store = store_with(api);
    let selectors = TodoSelectors::new();

    store
        .send(TodosAction::FetchTodos.into())
        .await
        .wait()
        .await;

    // Unfiltered view: the whole collection, pointer-stable across reads
    let all = store.state(|s| selectors.todos(s)).await;
    let again = store.state(|s| selectors.todos(s)).await;
    assert_eq!(all.len(), 3);
    assert!(std::sync::Arc::ptr_eq(&all, &again));

    store
        .send(FiltersAction::StatusChanged(StatusFilter::Active).into())
        .await
        .wait()
        .await;

    let active_ids = store.state(|s| selectors.filtered_todo_ids(s)).await;
    assert_eq!(&*active_ids, &[TodoId::from("2"), TodoId::from("3")]);

    // The todos layer was untouched by the filter change
    let after_filter = store.state(|s| selectors.todos(s)).await;
    assert!(std::sync::Arc::ptr_eq(&all, &after_filter));
}
