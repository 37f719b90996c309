// ABOUTME: Todo type definitions
// ABOUTME: Row type plus the inputs accepted by the record store

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Todo {
    pub id: i64,
    pub name: String,
    pub status: bool,
    pub address: Option<String>,
    pub age: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted at creation. `name` is optional here so that a missing
/// name reaches the store and is rejected as a validation error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TodoCreateInput {
    pub name: Option<String>,
    pub status: Option<bool>,
    pub address: Option<String>,
    pub age: Option<i64>,
}

/// Full replacement values for an existing row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TodoUpdateInput {
    pub name: String,
    pub status: bool,
    pub address: Option<String>,
    pub age: Option<i64>,
}

impl TodoUpdateInput {
    /// Start from the row's current values.
    pub fn from_current(todo: &Todo) -> Self {
        Self {
            name: todo.name.clone(),
            status: todo.status,
            address: todo.address.clone(),
            age: todo.age,
        }
    }
}

/// Identifier returned by mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoRef {
    pub id: i64,
}
