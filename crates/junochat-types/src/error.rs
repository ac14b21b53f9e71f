use thiserror::Error;

/// Errors from chat, character, and user operations.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("chat not found")]
    ChatNotFound,

    #[error("character not found")]
    CharacterNotFound,

    #[error("message not found")]
    MessageNotFound,

    #[error("user not found")]
    UserNotFound,

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("storage error: {0}")]
    StorageError(String),
}

/// Errors from repository operations (used by trait definitions in junochat-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}
