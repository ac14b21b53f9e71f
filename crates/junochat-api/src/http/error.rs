//! Application error type mapping to HTTP status codes and a JSON error body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use junochat_types::error::ChatError;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Domain errors from the chat core.
    Chat(ChatError),
    /// Authentication failure.
    Unauthorized(String),
    /// Validation error raised at the HTTP layer.
    Validation(String),
    /// Generic internal error.
    Internal(String),
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        AppError::Chat(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Chat(ChatError::ChatNotFound) => {
                (StatusCode::NOT_FOUND, "CHAT_NOT_FOUND", "Chat not found".to_string())
            }
            AppError::Chat(ChatError::CharacterNotFound) => {
                (StatusCode::NOT_FOUND, "CHARACTER_NOT_FOUND", "Character not found".to_string())
            }
            AppError::Chat(ChatError::MessageNotFound) => {
                (StatusCode::NOT_FOUND, "MESSAGE_NOT_FOUND", "Message not found".to_string())
            }
            AppError::Chat(ChatError::UserNotFound) => {
                (StatusCode::NOT_FOUND, "USER_NOT_FOUND", "User not found".to_string())
            }
            AppError::Chat(ChatError::Forbidden(msg)) => {
                (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone())
            }
            AppError::Chat(ChatError::Validation(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Chat(ChatError::StorageError(msg)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR", msg.clone())
            }
            AppError::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
            }
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg.clone())
            }
        };

        let body = json!({
            "error": {
                "code": code,
                "message": message,
            }
        });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}
