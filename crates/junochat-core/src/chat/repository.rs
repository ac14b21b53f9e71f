//! ChatRepository trait definition.
//!
//! Provides CRUD operations for chats and their ordered messages. The
//! implementation owns the message-numbering invariant: `number` values in a
//! chat are unique, gap-free, and ascending in creation order, starting at 1.

use junochat_types::character::CharacterId;
use junochat_types::chat::{Chat, ChatId, ChatSummary, Message, MessageAuthor, MessageId};
use junochat_types::error::RepositoryError;
use junochat_types::user::UserId;

/// Repository trait for chat and message persistence.
///
/// Implementations live in junochat-infra (e.g., `SqliteChatRepository`).
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
///
/// Number assignment for `append_message` and compaction for
/// `delete_message` must each be atomic with respect to concurrent calls on
/// the same chat: two concurrent appends must never receive the same number,
/// and a delete must leave the remaining numbers gap-free.
pub trait ChatRepository: Send + Sync {
    /// Create a new chat between a user and a character.
    ///
    /// Multiple chats for the same (user, character) pair are permitted.
    fn create_chat(
        &self,
        user_id: &UserId,
        character_id: &CharacterId,
    ) -> impl std::future::Future<Output = Result<Chat, RepositoryError>> + Send;

    /// Get a chat by its unique ID.
    fn get_chat(
        &self,
        chat_id: ChatId,
    ) -> impl std::future::Future<Output = Result<Option<Chat>, RepositoryError>> + Send;

    /// Get the earliest-created chat between a user and a character, if any.
    fn find_first_chat(
        &self,
        user_id: &UserId,
        character_id: &CharacterId,
    ) -> impl std::future::Future<Output = Result<Option<Chat>, RepositoryError>> + Send;

    /// List a user's chats as summaries, newest chat first.
    ///
    /// Each summary carries the body of the chat's highest-numbered message,
    /// or `None` for an empty chat.
    fn list_chats(
        &self,
        user_id: &UserId,
    ) -> impl std::future::Future<Output = Result<Vec<ChatSummary>, RepositoryError>> + Send;

    /// Delete a chat and, by cascade, its messages.
    fn delete_chat(
        &self,
        chat_id: ChatId,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Append a message to a chat, assigning it the next number in the
    /// chat's sequence.
    fn append_message(
        &self,
        chat_id: ChatId,
        author: &MessageAuthor,
        body: &str,
    ) -> impl std::future::Future<Output = Result<Message, RepositoryError>> + Send;

    /// Get a message by its unique ID.
    fn get_message(
        &self,
        message_id: &MessageId,
    ) -> impl std::future::Future<Output = Result<Option<Message>, RepositoryError>> + Send;

    /// List a chat's messages ordered by number ascending.
    fn list_messages(
        &self,
        chat_id: ChatId,
    ) -> impl std::future::Future<Output = Result<Vec<Message>, RepositoryError>> + Send;

    /// Delete a message and renumber the chat's later messages down by one,
    /// in the same transaction.
    fn delete_message(
        &self,
        message_id: &MessageId,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Get the number of messages in a chat.
    fn count_messages(
        &self,
        chat_id: ChatId,
    ) -> impl std::future::Future<Output = Result<u32, RepositoryError>> + Send;
}
