//! Message handlers: history listing, the chat-turn endpoint, and deletion.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use uuid::Uuid;

use junochat_types::character::CharacterId;
use junochat_types::chat::{ChatId, Message, MessageAuthor, MessageId};
use junochat_types::error::ChatError;
use junochat_types::user::UserId;

use crate::http::error::AppError;
use crate::http::extractors::identity::Identity;
use crate::state::AppState;

/// GET /api/chats/:id/messages - List a chat's messages in number order.
pub async fn list_messages(
    State(state): State<AppState>,
    Identity(caller): Identity,
    Path(chat_id): Path<i64>,
) -> Result<Json<Vec<Message>>, AppError> {
    let messages = state
        .chat_service
        .list_messages(&caller, ChatId(chat_id))
        .await?;
    Ok(Json(messages))
}

#[derive(Debug, Deserialize)]
pub struct PostMessageBody {
    /// The message text.
    pub description: String,
    pub sender_user: Option<UserId>,
    pub sender_bot: Option<CharacterId>,
}

#[derive(Debug, Serialize)]
pub struct PostMessageResponse {
    pub message: Message,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply: Option<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degraded: Option<bool>,
}

/// POST /api/chats/:id/messages - Append a message to a chat.
///
/// With `sender_user` set the message starts a turn: the user side is
/// stored, the character's reply is generated and stored, and both come
/// back in the response. With `sender_bot` set the message is stored as the
/// character with no generation.
pub async fn post_message(
    State(state): State<AppState>,
    Identity(caller): Identity,
    Path(chat_id): Path<i64>,
    Json(body): Json<PostMessageBody>,
) -> Result<(StatusCode, Json<PostMessageResponse>), AppError> {
    let author = resolve_sender(&body)?;
    let text = body.description;

    match author {
        MessageAuthor::User(sender) => {
            if sender != caller {
                return Err(AppError::Chat(ChatError::Forbidden(
                    "cannot post a message as another user".to_string(),
                )));
            }
            // Run the turn on a detached task so a client disconnect cannot
            // cancel it once the user message is stored.
            let coordinator = state.turn_coordinator.clone();
            let handle = tokio::spawn(async move {
                coordinator.run_turn(ChatId(chat_id), &sender, &text).await
            });
            let turn = handle.await.map_err(|e| {
                tracing::warn!(chat_id, error = %e, "Turn task failed before completing");
                AppError::Internal(format!("turn task failed: {e}"))
            })??;
            Ok((
                StatusCode::CREATED,
                Json(PostMessageResponse {
                    message: turn.user_message,
                    reply: Some(turn.reply),
                    degraded: Some(turn.degraded),
                }),
            ))
        }
        MessageAuthor::Character(character_id) => {
            let message = state
                .chat_service
                .append_message(
                    &caller,
                    ChatId(chat_id),
                    MessageAuthor::Character(character_id),
                    &text,
                )
                .await?;
            Ok((
                StatusCode::CREATED,
                Json(PostMessageResponse {
                    message,
                    reply: None,
                    degraded: None,
                }),
            ))
        }
    }
}

/// DELETE /api/messages/:id - Delete a message from a chat the caller owns.
pub async fn delete_message(
    State(state): State<AppState>,
    Identity(caller): Identity,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    state
        .chat_service
        .delete_message(&caller, &MessageId::from_uuid(id))
        .await?;
    Ok(Json(json!({"deleted": true})))
}

/// Exactly one of `sender_user` and `sender_bot` must be set.
fn resolve_sender(body: &PostMessageBody) -> Result<MessageAuthor, AppError> {
    match (&body.sender_user, &body.sender_bot) {
        (Some(user_id), None) => Ok(MessageAuthor::User(user_id.clone())),
        (None, Some(character_id)) => Ok(MessageAuthor::Character(character_id.clone())),
        _ => Err(AppError::Validation(
            "exactly one of sender_user and sender_bot must be set".to_string(),
        )),
    }
}
