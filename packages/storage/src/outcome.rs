// ABOUTME: Uniform outcome envelope returned for every record operation
// ABOUTME: Serializes as {code, data, message} plus pagination fields on listings

use serde::Serialize;
use tracing::error;

use crate::error::{OutcomeCode, TodoError, TodoResult};
use crate::pagination::{Page, PageMeta};

/// The `{code, data, message}` envelope.
///
/// `data` is always `null` on failure. Listing successes additionally carry
/// `total`, `page`, `pageSize` and `totalPages` at the top level.
#[derive(Debug, Clone, Serialize)]
pub struct Outcome<T> {
    pub code: OutcomeCode,
    pub data: Option<T>,
    pub message: String,
    #[serde(flatten)]
    pub page: Option<PageMeta>,
}

impl<T> Outcome<T> {
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            code: OutcomeCode::Ok,
            data: Some(data),
            message: message.into(),
            page: None,
        }
    }

    pub fn failure(err: &TodoError) -> Self {
        if let TodoError::Storage(source) = err {
            error!(error = %source, "Storage operation failed");
        }

        Self::with_code(err.code(), err.user_message())
    }

    /// An error outcome that did not originate in the store.
    pub fn with_code(code: OutcomeCode, message: impl Into<String>) -> Self {
        Self {
            code,
            data: None,
            message: message.into(),
            page: None,
        }
    }

    pub fn from_result(result: TodoResult<T>, message: &str) -> Self {
        match result {
            Ok(data) => Self::success(data, message),
            Err(err) => Self::failure(&err),
        }
    }

    /// Transform the payload, keeping code, message and page fields.
    pub fn map<U, F>(self, f: F) -> Outcome<U>
    where
        F: FnOnce(T) -> U,
    {
        Outcome {
            code: self.code,
            data: self.data.map(f),
            message: self.message,
            page: self.page,
        }
    }
}

impl<T> Outcome<Vec<T>> {
    pub fn from_page_result(result: TodoResult<Page<T>>, message: &str) -> Self {
        match result {
            Ok(page) => Self {
                code: OutcomeCode::Ok,
                data: Some(page.items),
                message: message.to_string(),
                page: Some(page.meta),
            },
            Err(err) => Self::failure(&err),
        }
    }
}
