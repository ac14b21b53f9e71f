//! Caller identity extractor.
//!
//! Requests identify their caller with an `X-User-Id` header carrying the
//! user's UUID. Extraction verifies the user exists in the users table;
//! identity is trusted from upstream, there is no credential layer here.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use junochat_types::user::UserId;

use crate::http::error::AppError;
use crate::state::AppState;

/// The authenticated caller. Extracting this validates the `X-User-Id`
/// header against the users table.
pub struct Identity(pub UserId);

impl FromRequestParts<AppState> for Identity {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user_id = extract_user_id(parts)?;

        let result = sqlx::query("SELECT id FROM users WHERE id = ?")
            .bind(user_id.to_string())
            .fetch_optional(&state.db_pool.reader)
            .await
            .map_err(|e| AppError::Internal(format!("Database error: {e}")))?;

        match result {
            Some(_) => Ok(Identity(user_id)),
            None => Err(AppError::Unauthorized("Unknown user id".to_string())),
        }
    }
}

/// Extract and parse the `X-User-Id` header.
fn extract_user_id(parts: &Parts) -> Result<UserId, AppError> {
    let raw = parts.headers.get("x-user-id").ok_or_else(|| {
        AppError::Unauthorized(
            "Missing caller identity. Provide it via 'X-User-Id: <uuid>' header.".to_string(),
        )
    })?;

    let raw = raw.to_str().map_err(|_| {
        AppError::Unauthorized("Invalid X-User-Id header encoding".to_string())
    })?;

    raw.trim()
        .parse::<UserId>()
        .map_err(|_| AppError::Unauthorized("X-User-Id is not a valid UUID".to_string()))
}
