use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;

use super::ApiResponse;
use crate::services::{AuthError, ErrorLogError};

#[derive(Debug)]
pub enum ApiError {
    /// Bad or missing input. Maps to 406 Not Acceptable.
    Validation(String),

    Unauthorized(String),

    Conflict(String),

    NotFound(String),

    /// Underlying store did not produce the expected effect.
    Storage(String),

    /// Unknown mode/action, or an undecodable request body.
    NoContent(String),
}

impl ApiError {
    pub fn no_content_for_mode() -> Self {
        Self::NoContent("No content available for mode requested".to_string())
    }

    pub fn no_content_for_action() -> Self {
        Self::NoContent("No content available for action requested".to_string())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(msg)
            | Self::Unauthorized(msg)
            | Self::Conflict(msg)
            | Self::NotFound(msg)
            | Self::Storage(msg)
            | Self::NoContent(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Validation(msg) | Self::NoContent(msg) => (StatusCode::NOT_ACCEPTABLE, msg),
            Self::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            Self::Conflict(msg) => (StatusCode::CONFLICT, msg),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::Storage(msg) => {
                tracing::error!("Storage error: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = ApiResponse::<()>::error(message);
        (status, Json(body)).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match &err {
            AuthError::Validation(_) => Self::Validation(err.to_string()),
            AuthError::Conflict(_) => Self::Conflict(err.to_string()),
            AuthError::InvalidCredentials => Self::Unauthorized(err.to_string()),
            AuthError::NotFound(_) => Self::NotFound(err.to_string()),
            AuthError::Storage(_) => Self::Storage(err.to_string()),
        }
    }
}

impl From<ErrorLogError> for ApiError {
    fn from(err: ErrorLogError) -> Self {
        match &err {
            ErrorLogError::Validation(_) => Self::Validation(err.to_string()),
            ErrorLogError::Storage(_) => Self::Storage(err.to_string()),
        }
    }
}
