// src/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

/// Global Application Error Enum.
/// Centralizes error handling and mapping to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    // 500 Internal Server Error
    InternalServerError(String),

    // 400 Bad Request (missing subject/file, malformed key, bad index)
    Validation(String),

    // 401 Unauthorized
    AuthError(String),

    // 401 Unauthorized, but the sign-in flow was abandoned, not rejected
    AuthCancelled,

    // 404 Not Found
    NotFound(String),

    // 409 Conflict (e.g., duplicate subject, grading already in flight)
    Conflict(String),

    // 500 Internal Server Error: a document-store write did not confirm
    Persistence(String),

    // 502 Bad Gateway: an upstream call failed in transit
    Transport(String),

    // 504 Gateway Timeout: the grading service did not answer in time
    GradingTimeout,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for AppError {}

/// Implements `IntoResponse` for `AppError`.
/// Converts the error into a JSON response with appropriate HTTP status code.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::AuthError(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::AuthCancelled => (
                StatusCode::UNAUTHORIZED,
                "Sign-in was cancelled before completion".to_string(),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::Persistence(msg) => {
                tracing::error!("Persistence failure: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "The write was not confirmed, please retry".to_string(),
                )
            }
            AppError::Transport(msg) => {
                tracing::warn!("Upstream transport failure: {}", msg);
                (
                    StatusCode::BAD_GATEWAY,
                    "Upstream service unavailable".to_string(),
                )
            }
            AppError::GradingTimeout => (
                StatusCode::GATEWAY_TIMEOUT,
                "Grading timed out, please try again".to_string(),
            ),
        };
        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Converts `sqlx::Error` into `AppError::Persistence`.
/// Allows using `?` operator on document-store queries.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Persistence(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InternalServerError(err.to_string())
    }
}

/// Converts `reqwest::Error` from the grading call, keeping a timed-out
/// request distinguishable from other transport failures.
impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AppError::GradingTimeout
        } else {
            AppError::Transport(err.to_string())
        }
    }
}
