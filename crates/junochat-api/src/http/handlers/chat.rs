//! Chat thread handlers, including the two POST-based list/store endpoints
//! kept for older clients.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use junochat_types::character::CharacterId;
use junochat_types::chat::{Chat, ChatId, ChatSummary, Message};
use junochat_types::error::ChatError;
use junochat_types::user::UserId;

use crate::http::error::AppError;
use crate::http::extractors::identity::Identity;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateChatBody {
    pub character_id: CharacterId,
}

/// Response shape for chat listings: `{"chats": [...]}`.
#[derive(Debug, Serialize)]
pub struct ChatsResponse {
    pub chats: Vec<ChatSummary>,
}

/// A chat with its full message history.
#[derive(Debug, Serialize)]
pub struct ChatDetail {
    #[serde(flatten)]
    pub chat: Chat,
    pub messages: Vec<Message>,
}

/// POST /api/chats - Create a new chat with a character.
pub async fn create_chat(
    State(state): State<AppState>,
    Identity(caller): Identity,
    Json(body): Json<CreateChatBody>,
) -> Result<(StatusCode, Json<Chat>), AppError> {
    let chat = state
        .chat_service
        .create_chat(&caller, &body.character_id)
        .await?;
    Ok((StatusCode::CREATED, Json(chat)))
}

/// POST /api/chats/first - Return the caller's earliest chat with a
/// character, creating one if none exists.
pub async fn open_first_chat(
    State(state): State<AppState>,
    Identity(caller): Identity,
    Json(body): Json<CreateChatBody>,
) -> Result<Json<Chat>, AppError> {
    let chat = state
        .chat_service
        .open_first_chat(&caller, &body.character_id)
        .await?;
    Ok(Json(chat))
}

/// GET /api/chats - List the caller's chats, newest first.
pub async fn list_chats(
    State(state): State<AppState>,
    Identity(caller): Identity,
) -> Result<Json<ChatsResponse>, AppError> {
    let chats = state.chat_service.list_chats(&caller).await?;
    Ok(Json(ChatsResponse { chats }))
}

/// GET /api/chats/:id - Get a chat and its messages.
pub async fn get_chat(
    State(state): State<AppState>,
    Identity(caller): Identity,
    Path(chat_id): Path<i64>,
) -> Result<Json<ChatDetail>, AppError> {
    let chat = state
        .chat_service
        .get_owned_chat(&caller, ChatId(chat_id))
        .await?;
    let messages = state
        .chat_service
        .list_messages(&caller, ChatId(chat_id))
        .await?;
    Ok(Json(ChatDetail { chat, messages }))
}

/// DELETE /api/chats/:id - Delete a chat the caller owns.
pub async fn delete_chat(
    State(state): State<AppState>,
    Identity(caller): Identity,
    Path(chat_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    state
        .chat_service
        .delete_chat(&caller, ChatId(chat_id))
        .await?;
    Ok(Json(json!({"deleted": true})))
}

// ---------------------------------------------------------------------------
// Legacy POST endpoints
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct GetChatsBody {
    pub user_id: UserId,
}

/// POST /api/chats/get_chats - List chats for a user id given in the body.
///
/// The body's `user_id` must match the caller; listing another user's chats
/// is forbidden.
pub async fn get_chats_compat(
    State(state): State<AppState>,
    Identity(caller): Identity,
    Json(body): Json<GetChatsBody>,
) -> Result<Json<ChatsResponse>, AppError> {
    if body.user_id != caller {
        return Err(AppError::Chat(ChatError::Forbidden(
            "cannot list chats for another user".to_string(),
        )));
    }
    let chats = state.chat_service.list_chats(&caller).await?;
    Ok(Json(ChatsResponse { chats }))
}

#[derive(Debug, Deserialize)]
pub struct StoreMessageBody {
    pub chat_id: i64,
    pub message: StoredTurnSide,
}

/// One side of an externally generated turn. A client-supplied `id` field is
/// accepted and ignored; the server assigns its own message ids.
#[derive(Debug, Deserialize)]
pub struct StoredTurnSide {
    pub content: String,
    pub role: String,
}

/// POST /api/chats/store_message - Store one side of a turn that was
/// generated outside the server.
///
/// `role` selects the author: `user` stores the message as the caller,
/// `assistant` as the chat's character.
pub async fn store_message_compat(
    State(state): State<AppState>,
    Identity(caller): Identity,
    Json(body): Json<StoreMessageBody>,
) -> Result<(StatusCode, Json<Message>), AppError> {
    let role = body.message.role.parse().map_err(AppError::Validation)?;
    let message = state
        .chat_service
        .store_turn_side(&caller, ChatId(body.chat_id), role, &body.message.content)
        .await?;
    Ok((StatusCode::CREATED, Json(message)))
}
