// ABOUTME: Todo storage layer using SQLite
// ABOUTME: Handles listing, lookup, and conditional writes for todo rows

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{TodoError, TodoResult};
use crate::pagination::{Page, PageRequest};
use crate::types::{Todo, TodoCreateInput, TodoRef, TodoUpdateInput};

const TODO_COLUMNS: &str = "id, name, status, address, age, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct TodoStorage {
    pool: SqlitePool,
}

impl TodoStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// List one page of todos, newest first, optionally filtered by a
    /// case-insensitive substring of `name`. Matching runs against the stored
    /// `name_folded` column so that non-ASCII letters fold as well.
    pub async fn list_todos(
        &self,
        request: PageRequest,
        search: &str,
    ) -> TodoResult<Page<Todo>> {
        debug!(
            "Fetching todos (page: {}, page_size: {}, search: {:?})",
            request.page(),
            request.page_size(),
            search
        );

        let pattern = like_pattern(&fold_name(search));
        let filter = if pattern.is_some() {
            " WHERE name_folded LIKE ? ESCAPE '\\'"
        } else {
            ""
        };

        let count_sql = format!("SELECT COUNT(*) FROM todos{}", filter);
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        if let Some(p) = pattern.as_deref() {
            count_query = count_query.bind(p);
        }
        let total = count_query.fetch_one(&self.pool).await?;

        let data_sql = format!(
            "SELECT {} FROM todos{} ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?",
            TODO_COLUMNS, filter
        );
        let mut data_query = sqlx::query_as::<_, Todo>(&data_sql);
        if let Some(p) = pattern.as_deref() {
            data_query = data_query.bind(p);
        }
        let todos = data_query
            .bind(request.limit())
            .bind(request.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok(Page::new(todos, &request, total))
    }

    /// Get a single todo by ID
    pub async fn get_todo(&self, id: i64) -> TodoResult<Todo> {
        debug!("Fetching todo: {}", id);

        let sql = format!("SELECT {} FROM todos WHERE id = ?", TODO_COLUMNS);
        sqlx::query_as::<_, Todo>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(TodoError::NotFound)
    }

    /// Create a new todo. Only the generated id is returned.
    pub async fn create_todo(&self, input: TodoCreateInput) -> TodoResult<TodoRef> {
        let name = match input.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => return Err(TodoError::validation("Name is required")),
        };
        let now = Utc::now();

        debug!("Creating todo (name: {})", name);

        let result = sqlx::query(
            r#"
            INSERT INTO todos (name, name_folded, status, address, age, created_at, updated_at)
            VALUES (?, ?, COALESCE(?, 0), ?, ?, ?, ?)
            "#,
        )
        .bind(name)
        .bind(fold_name(name))
        .bind(input.status)
        .bind(&input.address)
        .bind(input.age)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(TodoRef {
            id: result.last_insert_rowid(),
        })
    }

    /// Replace a todo's mutable fields.
    ///
    /// Existence is decided by the affected-row count of the write itself, so
    /// a row deleted by a concurrent call is reported as `NotFound`.
    pub async fn update_todo(&self, id: i64, input: TodoUpdateInput) -> TodoResult<TodoRef> {
        if input.name.trim().is_empty() {
            return Err(TodoError::validation("Name is required"));
        }

        debug!("Updating todo: {}", id);

        let result = sqlx::query(
            r#"
            UPDATE todos
            SET name = ?, name_folded = ?, status = ?, address = ?, age = ?,
                updated_at = MAX(created_at, ?)
            WHERE id = ?
            "#,
        )
        .bind(&input.name)
        .bind(fold_name(&input.name))
        .bind(input.status)
        .bind(&input.address)
        .bind(input.age)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(TodoError::NotFound);
        }

        Ok(TodoRef { id })
    }

    /// Delete a todo
    pub async fn delete_todo(&self, id: i64) -> TodoResult<()> {
        debug!("Deleting todo: {}", id);

        let result = sqlx::query("DELETE FROM todos WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(TodoError::NotFound);
        }

        Ok(())
    }

    /// Flip the status flag in place. The negation happens in SQL; the
    /// current value is never read back first.
    pub async fn toggle_todo(&self, id: i64) -> TodoResult<TodoRef> {
        debug!("Toggling todo: {}", id);

        let result = sqlx::query(
            "UPDATE todos SET status = NOT status, updated_at = MAX(created_at, ?) WHERE id = ?",
        )
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(TodoError::NotFound);
        }

        Ok(TodoRef { id })
    }
}

/// Case-folded form of a name, used for search. SQLite's own `LIKE` only
/// folds ASCII letters.
pub(crate) fn fold_name(name: &str) -> String {
    name.to_lowercase()
}

/// Build a LIKE pattern matching `search` as a literal substring.
/// Returns `None` for an empty search.
fn like_pattern(search: &str) -> Option<String> {
    if search.is_empty() {
        return None;
    }

    let mut pattern = String::with_capacity(search.len() + 2);
    pattern.push('%');
    for ch in search.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');

    Some(pattern)
}
