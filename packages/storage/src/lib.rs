// ABOUTME: Record store for todo rows and its uniform outcome contract
// ABOUTME: Provides types, storage, pagination, and the {code, data, message} envelope

pub mod db;
pub mod error;
pub mod outcome;
pub mod pagination;
pub mod storage;
pub mod types;

// Re-export main types
pub use db::{connect, ensure_schema, DatabaseConfig};
pub use error::{OutcomeCode, TodoError, TodoResult};
pub use outcome::Outcome;
pub use pagination::{Page, PageMeta, PageRequest, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use storage::TodoStorage;
pub use types::{Todo, TodoCreateInput, TodoRef, TodoUpdateInput};
