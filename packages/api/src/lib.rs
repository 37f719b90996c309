// ABOUTME: HTTP API layer for the todo service providing REST endpoints and routing
// ABOUTME: Thin adapter over the record store; the outcome code becomes the HTTP status

use std::sync::Arc;

use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use todo_storage::TodoStorage;

pub mod format;
pub mod health;
pub mod response;
pub mod todos_handlers;

pub use format::{format_local, format_timestamp_in, TodoView, TIMESTAMP_FORMAT};
pub use response::{ApiError, ApiResult, Envelope};

/// Shared state for API handlers
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<TodoStorage>,
}

impl AppState {
    pub fn new(storage: TodoStorage) -> Self {
        Self {
            storage: Arc::new(storage),
        }
    }
}

/// Creates the todos API router (nested under /api/todos)
pub fn create_todos_router() -> Router<AppState> {
    Router::new()
        .route("/", get(todos_handlers::list_todos))
        .route("/", post(todos_handlers::create_todo))
        .route("/{id}", get(todos_handlers::get_todo))
        .route("/{id}", put(todos_handlers::update_todo))
        .route("/{id}", delete(todos_handlers::delete_todo))
        .route("/{id}/toggle", patch(todos_handlers::toggle_todo))
}

/// Creates the full application router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api", get(health::root))
        .route("/api/health", get(health::health_check))
        .nest("/api/todos", create_todos_router())
        .with_state(state)
        .layer(CatchPanicLayer::custom(response::handle_panic))
        .layer(TraceLayer::new_for_http())
}
