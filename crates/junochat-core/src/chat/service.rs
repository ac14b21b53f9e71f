//! Chat service orchestrating thread lifecycle and message persistence.
//!
//! ChatService enforces ownership: a chat's owner is fixed at creation and
//! only the owner may read it, write user messages into it, or delete it.
//! Character-authored appends bypass the ownership check (they are
//! system-generated) but must name the chat's own character.

use junochat_types::character::CharacterId;
use junochat_types::chat::{
    Chat, ChatId, ChatSummary, Message, MessageAuthor, MessageId, MessageRole,
};
use junochat_types::error::ChatError;
use junochat_types::user::UserId;
use tracing::info;

use crate::character::repository::CharacterRepository;
use crate::chat::repository::ChatRepository;

/// Orchestrates chat lifecycle and message persistence.
///
/// Generic over `ChatRepository` and `CharacterRepository` to maintain
/// clean architecture (junochat-core never depends on junochat-infra).
pub struct ChatService<C: ChatRepository, K: CharacterRepository> {
    chat_repo: C,
    character_repo: K,
}

impl<C: ChatRepository, K: CharacterRepository> ChatService<C, K> {
    /// Create a new chat service with the given repositories.
    pub fn new(chat_repo: C, character_repo: K) -> Self {
        Self {
            chat_repo,
            character_repo,
        }
    }

    /// Access the chat repository.
    pub fn chat_repo(&self) -> &C {
        &self.chat_repo
    }

    /// Access the character repository.
    pub fn character_repo(&self) -> &K {
        &self.character_repo
    }

    // --- Chat lifecycle ---

    /// Create a new chat between the caller and a character.
    ///
    /// Multiple chats with the same character are permitted; each call
    /// creates a fresh thread.
    pub async fn create_chat(
        &self,
        caller: &UserId,
        character_id: &CharacterId,
    ) -> Result<Chat, ChatError> {
        let character = self
            .character_repo
            .get_character(character_id)
            .await
            .map_err(|e| ChatError::StorageError(e.to_string()))?
            .ok_or(ChatError::CharacterNotFound)?;

        let chat = self
            .chat_repo
            .create_chat(caller, &character.id)
            .await
            .map_err(|e| ChatError::StorageError(e.to_string()))?;

        info!(chat_id = %chat.id, character = %character.name, "Chat created");
        Ok(chat)
    }

    /// Resume the caller's earliest chat with a character, creating one if
    /// none exists yet.
    pub async fn open_first_chat(
        &self,
        caller: &UserId,
        character_id: &CharacterId,
    ) -> Result<Chat, ChatError> {
        let existing = self
            .chat_repo
            .find_first_chat(caller, character_id)
            .await
            .map_err(|e| ChatError::StorageError(e.to_string()))?;

        if let Some(chat) = existing {
            return Ok(chat);
        }
        self.create_chat(caller, character_id).await
    }

    /// Get a chat the caller owns.
    ///
    /// Fails with `ChatNotFound` if it does not exist and `Forbidden` if it
    /// belongs to another user.
    pub async fn get_owned_chat(
        &self,
        caller: &UserId,
        chat_id: ChatId,
    ) -> Result<Chat, ChatError> {
        let chat = self
            .chat_repo
            .get_chat(chat_id)
            .await
            .map_err(|e| ChatError::StorageError(e.to_string()))?
            .ok_or(ChatError::ChatNotFound)?;

        if chat.user_id != *caller {
            return Err(ChatError::Forbidden(
                "chat belongs to another user".to_string(),
            ));
        }
        Ok(chat)
    }

    /// List the caller's chats as summaries, newest first.
    ///
    /// A user with zero chats gets an empty list, not an error.
    pub async fn list_chats(&self, caller: &UserId) -> Result<Vec<ChatSummary>, ChatError> {
        self.chat_repo
            .list_chats(caller)
            .await
            .map_err(|e| ChatError::StorageError(e.to_string()))
    }

    /// Delete a chat the caller owns, along with all its messages.
    pub async fn delete_chat(&self, caller: &UserId, chat_id: ChatId) -> Result<(), ChatError> {
        self.get_owned_chat(caller, chat_id).await?;

        self.chat_repo
            .delete_chat(chat_id)
            .await
            .map_err(|e| ChatError::StorageError(e.to_string()))?;

        info!(chat_id = %chat_id, "Chat deleted");
        Ok(())
    }

    // --- Message persistence ---

    /// Append a message to a chat.
    ///
    /// User-authored messages require the caller to both own the chat and
    /// be the named sender. Character-authored messages skip the ownership
    /// check but must name the chat's own character.
    pub async fn append_message(
        &self,
        caller: &UserId,
        chat_id: ChatId,
        author: MessageAuthor,
        body: &str,
    ) -> Result<Message, ChatError> {
        if body.trim().is_empty() {
            return Err(ChatError::Validation(
                "message text cannot be empty".to_string(),
            ));
        }

        let chat = self
            .chat_repo
            .get_chat(chat_id)
            .await
            .map_err(|e| ChatError::StorageError(e.to_string()))?
            .ok_or(ChatError::ChatNotFound)?;

        match &author {
            MessageAuthor::User(sender) => {
                if sender != caller {
                    return Err(ChatError::Forbidden(
                        "cannot post a message as another user".to_string(),
                    ));
                }
                if chat.user_id != *caller {
                    return Err(ChatError::Forbidden(
                        "chat belongs to another user".to_string(),
                    ));
                }
            }
            MessageAuthor::Character(sender) => {
                if *sender != chat.character_id {
                    return Err(ChatError::Validation(
                        "character does not belong to this chat".to_string(),
                    ));
                }
            }
        }

        self.chat_repo
            .append_message(chat_id, &author, body)
            .await
            .map_err(|e| ChatError::StorageError(e.to_string()))
    }

    /// Store one side of a turn by role, as the upstream clients do.
    ///
    /// `User` maps to a message authored by the caller; `Assistant` maps to
    /// one authored by the chat's character.
    pub async fn store_turn_side(
        &self,
        caller: &UserId,
        chat_id: ChatId,
        role: MessageRole,
        body: &str,
    ) -> Result<Message, ChatError> {
        let chat = self
            .chat_repo
            .get_chat(chat_id)
            .await
            .map_err(|e| ChatError::StorageError(e.to_string()))?
            .ok_or(ChatError::ChatNotFound)?;

        let author = match role {
            MessageRole::User => MessageAuthor::User(caller.clone()),
            MessageRole::Assistant => MessageAuthor::Character(chat.character_id.clone()),
        };
        self.append_message(caller, chat_id, author, body).await
    }

    /// List a chat's messages ordered by number ascending.
    pub async fn list_messages(
        &self,
        caller: &UserId,
        chat_id: ChatId,
    ) -> Result<Vec<Message>, ChatError> {
        self.get_owned_chat(caller, chat_id).await?;

        self.chat_repo
            .list_messages(chat_id)
            .await
            .map_err(|e| ChatError::StorageError(e.to_string()))
    }

    /// Delete a message from a chat the caller owns.
    ///
    /// Later messages in the chat are renumbered down by one so numbers
    /// stay gap-free.
    pub async fn delete_message(
        &self,
        caller: &UserId,
        message_id: &MessageId,
    ) -> Result<(), ChatError> {
        let message = self
            .chat_repo
            .get_message(message_id)
            .await
            .map_err(|e| ChatError::StorageError(e.to_string()))?
            .ok_or(ChatError::MessageNotFound)?;

        self.get_owned_chat(caller, message.chat_id).await?;

        self.chat_repo
            .delete_message(message_id)
            .await
            .map_err(|e| ChatError::StorageError(e.to_string()))?;

        info!(message_id = %message_id, chat_id = %message.chat_id, "Message deleted");
        Ok(())
    }
}
