// ABOUTME: Error taxonomy for the todo record store
// ABOUTME: Every failure maps onto the closed set of outcome codes

use serde::{Serialize, Serializer};
use thiserror::Error;

/// The closed set of codes an outcome can carry.
///
/// The transport layer copies this value verbatim as its status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutcomeCode {
    Ok,
    BadRequest,
    Internal,
}

impl OutcomeCode {
    pub fn as_u16(self) -> u16 {
        match self {
            OutcomeCode::Ok => 200,
            OutcomeCode::BadRequest => 400,
            OutcomeCode::Internal => 500,
        }
    }
}

impl Serialize for OutcomeCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u16(self.as_u16())
    }
}

/// Record store errors
#[derive(Error, Debug)]
pub enum TodoError {
    /// A required field is missing or blank.
    #[error("Validation error: {0}")]
    Validation(String),

    /// No row matches the requested id. Reported as 400, not 404.
    #[error("Todo not found")]
    NotFound,

    /// Any failure from the underlying connection.
    #[error("Database error: {0}")]
    Storage(#[from] sqlx::Error),
}

pub type TodoResult<T> = Result<T, TodoError>;

impl TodoError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn code(&self) -> OutcomeCode {
        match self {
            TodoError::Validation(_) | TodoError::NotFound => OutcomeCode::BadRequest,
            TodoError::Storage(_) => OutcomeCode::Internal,
        }
    }

    /// Message safe to hand back to callers. Storage details stay in the logs.
    pub fn user_message(&self) -> String {
        match self {
            TodoError::Validation(msg) => msg.clone(),
            TodoError::NotFound => "Todo not found".to_string(),
            TodoError::Storage(_) => "Database error".to_string(),
        }
    }
}
