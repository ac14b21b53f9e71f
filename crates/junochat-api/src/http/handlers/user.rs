//! User registration and lookup handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use uuid::Uuid;

use junochat_types::user::{CreateUserRequest, User, UserId};

use crate::http::error::AppError;
use crate::http::extractors::identity::Identity;
use crate::state::AppState;

/// POST /api/users - Register a new user. No identity required.
pub async fn create_user(
    State(state): State<AppState>,
    Json(body): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let user = state.user_service.create_user(&body.username).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /api/users/:id - Look up a user by id.
pub async fn get_user(
    State(state): State<AppState>,
    _identity: Identity,
    Path(id): Path<Uuid>,
) -> Result<Json<User>, AppError> {
    let user = state.user_service.get_user(&UserId::from_uuid(id)).await?;
    Ok(Json(user))
}
