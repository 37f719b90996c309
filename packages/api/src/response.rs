// ABOUTME: Shared API response types and error handling
// ABOUTME: Mirrors the outcome code as the HTTP status and always emits the envelope

use std::any::Any;

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info};

use todo_storage::{Outcome, OutcomeCode};

/// An outcome ready to be sent over HTTP.
pub struct Envelope<T>(pub Outcome<T>);

impl<T> From<Outcome<T>> for Envelope<T> {
    fn from(outcome: Outcome<T>) -> Self {
        Self(outcome)
    }
}

pub fn status_for(code: OutcomeCode) -> StatusCode {
    match code {
        OutcomeCode::Ok => StatusCode::OK,
        OutcomeCode::BadRequest => StatusCode::BAD_REQUEST,
        OutcomeCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        (status_for(self.0.code), Json(self.0)).into_response()
    }
}

/// Errors raised while adapting a request, before the store is involved
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("name or status is required")]
    MissingUpdateFields,

    #[error("Invalid request body")]
    InvalidBody(#[from] JsonRejection),

    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    pub fn code(&self) -> OutcomeCode {
        match self {
            ApiError::MissingUpdateFields | ApiError::InvalidBody(_) => OutcomeCode::BadRequest,
            ApiError::Internal => OutcomeCode::Internal,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::InvalidBody(rejection) => {
                info!(rejection = %rejection.body_text(), "Rejected request body");
            }
            ApiError::Internal => error!("Internal server error"),
            ApiError::MissingUpdateFields => info!(error = %self, "API error response"),
        }

        Envelope(Outcome::<()>::with_code(self.code(), self.to_string())).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<Envelope<T>, ApiError>;

/// Render a handler panic as the generic 500 envelope.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!(panic = %detail, "Handler panicked");

    ApiError::Internal.into_response()
}
