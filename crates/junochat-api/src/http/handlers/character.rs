//! Character management handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde_json::{Value, json};
use uuid::Uuid;

use junochat_types::character::{Character, CharacterId, CreateCharacterRequest};

use crate::http::error::AppError;
use crate::http::extractors::identity::Identity;
use crate::state::AppState;

/// POST /api/characters - Create a new character owned by the caller.
pub async fn create_character(
    State(state): State<AppState>,
    Identity(caller): Identity,
    Json(body): Json<CreateCharacterRequest>,
) -> Result<(StatusCode, Json<Character>), AppError> {
    let character = state
        .character_service
        .create_character(Some(&caller), body)
        .await?;
    Ok((StatusCode::CREATED, Json(character)))
}

/// GET /api/characters - List all characters, newest first.
pub async fn list_characters(
    State(state): State<AppState>,
    _identity: Identity,
) -> Result<Json<Vec<Character>>, AppError> {
    let characters = state.character_service.list_characters().await?;
    Ok(Json(characters))
}

/// GET /api/characters/:id - Get a character by id.
pub async fn get_character(
    State(state): State<AppState>,
    _identity: Identity,
    Path(id): Path<Uuid>,
) -> Result<Json<Character>, AppError> {
    let character = state
        .character_service
        .get_character(&CharacterId::from_uuid(id))
        .await?;
    Ok(Json(character))
}

/// DELETE /api/characters/:id - Delete a character the caller created.
pub async fn delete_character(
    State(state): State<AppState>,
    Identity(caller): Identity,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    state
        .character_service
        .delete_character(&caller, &CharacterId::from_uuid(id))
        .await?;
    Ok(Json(json!({"deleted": true})))
}
