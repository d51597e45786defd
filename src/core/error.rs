// Centralized error handling for the account service

use crate::models::response::ErrorResponse;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use thiserror::Error;

/// Errors surfaced to API clients
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    PayloadTooLarge(String),
}

impl ApiError {
    /// The one place error kinds are mapped to HTTP status codes
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }

    pub fn invalid_input(error: impl ToString) -> Self {
        ApiError::InvalidInput(error.to_string())
    }

    pub fn not_found(error: impl ToString) -> Self {
        ApiError::NotFound(error.to_string())
    }
}

impl From<ValidationError> for ApiError {
    fn from(error: ValidationError) -> Self {
        ApiError::InvalidInput(error.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status(),
            Json(ErrorResponse {
                message: self.to_string(),
            }),
        )
            .into_response()
    }
}

/// Errors raised while decoding and validating request input
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("invalid account id {0}")]
    InvalidId(String),

    #[error("request body is not valid JSON: {0}")]
    MalformedBody(String),

    #[error("request body must be a JSON object")]
    NotAnObject,

    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("field '{field}' must be a {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("name is empty")]
    EmptyName,

    #[error("name is too long: max {max} characters, got {actual}")]
    NameTooLong { max: usize, actual: usize },

    #[error("name must not contain control characters")]
    NameHasControlCharacters,

    #[error("no file attached in form field 'file'")]
    MissingFile,

    #[error("invalid query string: {0}")]
    InvalidQuery(String),

    #[error("invalid multipart body: {0}")]
    InvalidMultipart(String),

    #[error("failed to read request body: {0}")]
    UnreadableBody(String),
}
