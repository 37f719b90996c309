// ABOUTME: Database connection management and schema bootstrap
// ABOUTME: Builds the bounded SQLite pool shared by all request handlers

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::TodoResult;
use crate::storage::fold_name;

pub const DEFAULT_DATABASE_URL: &str = "sqlite:todos.db";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;
pub const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection pool settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            acquire_timeout: DEFAULT_ACQUIRE_TIMEOUT,
        }
    }
}

impl DatabaseConfig {
    pub fn in_memory() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            ..Self::default()
        }
    }

    /// Every connection to an in-memory database sees its own empty
    /// database, so such pools are pinned to a single connection.
    fn is_in_memory(&self) -> bool {
        self.url.contains(":memory:") || self.url.contains("mode=memory")
    }
}

/// Open the pool. Acquisition queues until `acquire_timeout` once all
/// `max_connections` are checked out.
pub async fn connect(config: &DatabaseConfig) -> TodoResult<SqlitePool> {
    debug!("Connecting to database: {}", config.url);

    let mut options = SqliteConnectOptions::from_str(&config.url)?
        .create_if_missing(true)
        .busy_timeout(Duration::from_secs(5));

    let mut pool_options = SqlitePoolOptions::new().acquire_timeout(config.acquire_timeout);

    if config.is_in_memory() {
        // Dropping the only connection would drop the database with it.
        pool_options = pool_options
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None);
    } else {
        options = options.journal_mode(SqliteJournalMode::Wal);
        pool_options = pool_options.max_connections(config.max_connections.max(1));
    }

    let pool = pool_options.connect_with(options).await?;

    info!("Database connection established");

    Ok(pool)
}

/// Create the `todos` table and its ordering index if they are missing.
pub async fn ensure_schema(pool: &SqlitePool) -> TodoResult<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS todos (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            name_folded TEXT NOT NULL DEFAULT '',
            status INTEGER NOT NULL DEFAULT 0,
            address TEXT,
            age INTEGER,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_todos_created_at ON todos (created_at)")
        .execute(pool)
        .await?;

    ensure_folded_names(pool).await?;

    debug!("Todo schema ready");

    Ok(())
}

/// Tables created before `name_folded` existed get the column added and
/// filled from `name`.
async fn ensure_folded_names(pool: &SqlitePool) -> TodoResult<()> {
    let columns: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM pragma_table_info('todos') WHERE name = 'name_folded'",
    )
    .fetch_one(pool)
    .await?;

    if columns > 0 {
        return Ok(());
    }

    sqlx::query("ALTER TABLE todos ADD COLUMN name_folded TEXT NOT NULL DEFAULT ''")
        .execute(pool)
        .await?;

    let rows: Vec<(i64, String)> = sqlx::query_as("SELECT id, name FROM todos")
        .fetch_all(pool)
        .await?;

    for (id, name) in &rows {
        sqlx::query("UPDATE todos SET name_folded = ? WHERE id = ?")
            .bind(fold_name(name))
            .bind(id)
            .execute(pool)
            .await?;
    }

    info!("Added name_folded column and backfilled {} todos", rows.len());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DatabaseConfig::default();
        assert_eq!(config.url, DEFAULT_DATABASE_URL);
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.acquire_timeout, Duration::from_secs(30));
        assert!(!config.is_in_memory());
    }

    #[test]
    fn test_in_memory_detection() {
        assert!(DatabaseConfig::in_memory().is_in_memory());

        let shared = DatabaseConfig {
            url: "sqlite:file:todos?mode=memory&cache=shared".to_string(),
            ..DatabaseConfig::default()
        };
        assert!(shared.is_in_memory());
    }

    #[tokio::test]
    async fn test_ensure_schema_is_idempotent() {
        let pool = connect(&DatabaseConfig::in_memory()).await.unwrap();
        ensure_schema(&pool).await.unwrap();
        ensure_schema(&pool).await.unwrap();

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM todos")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_existing_table_gains_folded_names() {
        let pool = connect(&DatabaseConfig::in_memory()).await.unwrap();
        sqlx::query(
            r#"
            CREATE TABLE todos (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                status INTEGER NOT NULL DEFAULT 0,
                address TEXT,
                age INTEGER,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await
        .unwrap();
        sqlx::query(
            "INSERT INTO todos (name, created_at, updated_at) VALUES ('Ärger mit Öl', '2024-01-01T00:00:00Z', '2024-01-01T00:00:00Z')",
        )
        .execute(&pool)
        .await
        .unwrap();

        ensure_schema(&pool).await.unwrap();
        ensure_schema(&pool).await.unwrap();

        let folded: String = sqlx::query_scalar("SELECT name_folded FROM todos")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(folded, "ärger mit öl");
    }

    #[tokio::test]
    async fn test_file_database_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let config = DatabaseConfig {
            url: format!("sqlite:{}", dir.path().join("todos.db").display()),
            ..DatabaseConfig::default()
        };

        let pool = connect(&config).await.unwrap();
        ensure_schema(&pool).await.unwrap();
        pool.close().await;

        assert!(dir.path().join("todos.db").exists());
    }
}
