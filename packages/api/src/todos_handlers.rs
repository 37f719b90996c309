// ABOUTME: HTTP request handlers for todo operations
// ABOUTME: Shapes request parameters, delegates to the record store, and merges partial updates

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Json,
};
use serde::{Deserialize, Deserializer};
use tracing::info;

use todo_storage::{
    Outcome, PageRequest, Todo, TodoCreateInput, TodoError, TodoRef, TodoUpdateInput,
};

use crate::format::TodoView;
use crate::response::{ApiError, ApiResult, Envelope};
use crate::AppState;

/// Query parameters for the listing. Kept as raw strings so that
/// non-numeric values fall back to defaults instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct ListTodosQuery {
    pub page: Option<String>,
    #[serde(rename = "pageSize")]
    pub page_size: Option<String>,
    pub search: Option<String>,
}

/// Path ids that are not integers can never match a row.
fn parse_id(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok()
}

fn not_found<T>() -> Envelope<T> {
    Envelope(Outcome::failure(&TodoError::NotFound))
}

/// A request without a `Content-Type` header is read as an empty object so
/// that field-level validation decides the response.
fn body_or_default<T: Default>(
    body: Result<Option<Json<T>>, JsonRejection>,
) -> Result<T, ApiError> {
    Ok(body?.map(|Json(request)| request).unwrap_or_default())
}

/// Accepts `true`/`false` as well as `0`/`1` style integers.
fn deserialize_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }

    Ok(Option::<Flag>::deserialize(deserializer)?.map(|flag| match flag {
        Flag::Bool(value) => value,
        Flag::Int(value) => value != 0,
    }))
}

/// List todos with pagination and search
pub async fn list_todos(
    State(state): State<AppState>,
    Query(query): Query<ListTodosQuery>,
) -> Envelope<Vec<TodoView>> {
    let request = PageRequest::from_query(query.page.as_deref(), query.page_size.as_deref());
    let search = query.search.unwrap_or_default();

    info!(
        "Listing todos (page: {}, page_size: {}, search: {:?})",
        request.page(),
        request.page_size(),
        search
    );

    let result = state.storage.list_todos(request, &search).await;

    Outcome::from_page_result(result, "Success")
        .map(|todos| todos.into_iter().map(TodoView::local).collect::<Vec<_>>())
        .into()
}

/// Get a single todo by ID
pub async fn get_todo(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Envelope<TodoView> {
    info!("Getting todo: {}", raw_id);

    let Some(id) = parse_id(&raw_id) else {
        return not_found();
    };

    let result = state.storage.get_todo(id).await;
    Outcome::from_result(result, "Success")
        .map(TodoView::local)
        .into()
}

/// Request body for creating a todo
#[derive(Debug, Default, Deserialize)]
pub struct CreateTodoRequest {
    pub name: Option<String>,
    pub age: Option<i64>,
    pub address: Option<String>,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub status: Option<bool>,
}

/// Create a new todo
pub async fn create_todo(
    State(state): State<AppState>,
    body: Result<Option<Json<CreateTodoRequest>>, JsonRejection>,
) -> ApiResult<TodoRef> {
    let request = body_or_default(body)?;

    info!("Creating todo: {:?}", request.name);

    let input = TodoCreateInput {
        name: request.name,
        status: request.status,
        address: request.address,
        age: request.age,
    };

    let result = state.storage.create_todo(input).await;
    Ok(Outcome::from_result(result, "Todo created successfully").into())
}

/// Request body for updating a todo. At least one of `name` or `status`
/// must be present; every absent field keeps its stored value.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTodoRequest {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub status: Option<bool>,
    pub age: Option<i64>,
    pub address: Option<String>,
}

impl UpdateTodoRequest {
    pub fn has_required_field(&self) -> bool {
        self.name.is_some() || self.status.is_some()
    }

    pub fn merge_onto(self, current: &Todo) -> TodoUpdateInput {
        let mut input = TodoUpdateInput::from_current(current);
        if let Some(name) = self.name {
            input.name = name;
        }
        if let Some(status) = self.status {
            input.status = status;
        }
        if let Some(age) = self.age {
            input.age = Some(age);
        }
        if let Some(address) = self.address {
            input.address = Some(address);
        }
        input
    }
}

/// Update an existing todo, merging omitted fields from its current state
pub async fn update_todo(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    body: Result<Option<Json<UpdateTodoRequest>>, JsonRejection>,
) -> ApiResult<TodoRef> {
    let request = body_or_default(body)?;

    if !request.has_required_field() {
        return Err(ApiError::MissingUpdateFields);
    }

    info!("Updating todo: {}", raw_id);

    let Some(id) = parse_id(&raw_id) else {
        return Ok(not_found());
    };

    let current = match state.storage.get_todo(id).await {
        Ok(todo) => todo,
        Err(err) => return Ok(Outcome::failure(&err).into()),
    };

    let result = state
        .storage
        .update_todo(id, request.merge_onto(&current))
        .await;

    Ok(Outcome::from_result(result, "Todo updated successfully").into())
}

/// Delete a todo
pub async fn delete_todo(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Envelope<()> {
    info!("Deleting todo: {}", raw_id);

    let Some(id) = parse_id(&raw_id) else {
        return not_found();
    };

    let result = state.storage.delete_todo(id).await;
    Outcome::from_result(result, "Todo deleted successfully").into()
}

/// Flip a todo's status
pub async fn toggle_todo(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Envelope<TodoRef> {
    info!("Toggling todo: {}", raw_id);

    let Some(id) = parse_id(&raw_id) else {
        return not_found();
    };

    let result = state.storage.toggle_todo(id).await;
    Outcome::from_result(result, "Todo toggled successfully").into()
}
