//! Simple CLI demo for the todos slice.
//!
//! Drives the full loop against the in-memory mock API: fetch the
//! collection, save a new todo, toggle and recolor entries, then read the
//! list back through the memoized selectors with a couple of filters.

use taskflow_runtime::Store;
use taskflow_todos::actions::TodosAction;
use taskflow_todos::app::{AppEnvironment, AppReducer, AppState};
use taskflow_todos::filters::{FiltersAction, StatusFilter};
use taskflow_todos::mocks::MockTodosApi;
use taskflow_todos::selectors::TodoSelectors;
use taskflow_todos::state::{Color, Todo};

fn print_todos(label: &str, todos: &[std::sync::Arc<Todo>]) {
    println!("\n{label}");
    for todo in todos {
        let check = if todo.completed { "x" } else { " " };
        let color = todo.color.map_or("-", Color::as_str);
        println!("  [{check}] {:<24} ({color})", todo.text);
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    println!("=== Todos Demo ===");

    // The mock stands in for the HTTP server; swap in HttpTodosApi with an
    // ApiConfig to talk to a real one.
    let api = MockTodosApi::seeded(vec![
        Todo::new("1", "water the plants").with_color(Color::Green),
        Todo::new("2", "pay the bills").with_completed(true),
        Todo::new("3", "fix the gate").with_color(Color::Red),
    ]);

    let store = Store::new(
        AppState::default(),
        AppReducer::new(),
        AppEnvironment::new(api),
    );
    let selectors = TodoSelectors::new();

    // Load everything from the "server"
    store
        .send(TodosAction::FetchTodos.into())
        .await
        .wait()
        .await;
    let todos = store.state(|s| selectors.todos(s)).await;
    print_todos("Loaded:", &todos);

    // Create a todo; the server assigns its id
    store
        .send(
            TodosAction::SaveNewTodo {
                text: "walk the dog".to_string(),
            }
            .into(),
        )
        .await
        .wait()
        .await;

    // Tick off the gate repair and tag the newest entry
    let ids = store.state(|s| selectors.todo_ids(s)).await;
    if let Some(newest) = ids.last() {
        store
            .send(
                TodosAction::ColorSelected {
                    todo_id: newest.clone(),
                    color: Color::Blue,
                }
                .into(),
            )
            .await
            .wait()
            .await;
    }
    store
        .send(TodosAction::TodoToggled("3".into()).into())
        .await
        .wait()
        .await;

    let todos = store.state(|s| selectors.todos(s)).await;
    print_todos("After edits:", &todos);

    // Narrow the view down to what's still open
    store
        .send(FiltersAction::StatusChanged(StatusFilter::Active).into())
        .await
        .wait()
        .await;
    let active = store.state(|s| selectors.filtered_todos(s)).await;
    print_todos("Still open:", &active);

    // Clean up the finished ones
    store
        .send(TodosAction::CompletedCleared.into())
        .await
        .wait()
        .await;
    let remaining = store.state(|s| s.todos.len()).await;
    println!("\n{remaining} todos left after clearing completed");

    println!("\n=== Demo Complete ===");
    Ok(())
}
