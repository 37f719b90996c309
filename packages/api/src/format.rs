// ABOUTME: Presentation formatting for todo rows
// ABOUTME: Renders storage timestamps as fixed local "YYYY-MM-DD HH:MM:SS" strings

use std::fmt::Display;

use chrono::{DateTime, Local, TimeZone, Utc};
use serde::Serialize;
use todo_storage::Todo;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Render `ts` in the given time zone.
pub fn format_timestamp_in<Tz>(ts: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    ts.with_timezone(tz).format(TIMESTAMP_FORMAT).to_string()
}

/// Render `ts` in the server's local time zone.
pub fn format_local(ts: &DateTime<Utc>) -> String {
    format_timestamp_in(ts, &Local)
}

/// A todo as returned over HTTP, with display timestamps.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TodoView {
    pub id: i64,
    pub name: String,
    pub status: bool,
    pub address: Option<String>,
    pub age: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
}

impl TodoView {
    pub fn in_timezone<Tz>(todo: Todo, tz: &Tz) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        Self {
            created_at: format_timestamp_in(&todo.created_at, tz),
            updated_at: format_timestamp_in(&todo.updated_at, tz),
            id: todo.id,
            name: todo.name,
            status: todo.status,
            address: todo.address,
            age: todo.age,
        }
    }

    pub fn local(todo: Todo) -> Self {
        Self::in_timezone(todo, &Local)
    }
}
