//! Turn coordination: one user message plus its paired character reply.
//!
//! TurnCoordinator drives a conversational turn end to end: verify
//! ownership, persist the user message, call the reply generator with the
//! chat's prior history, and persist the reply. Generator failures degrade
//! to a fixed fallback reply so the conversation always gets a paired
//! character turn; they never fail the request once the user message is
//! committed.

use std::time::Duration;

use junochat_types::chat::{ChatId, Message, MessageAuthor};
use junochat_types::error::ChatError;
use junochat_types::reply::HistoryEntry;
use junochat_types::user::UserId;
use tracing::{Instrument, info, info_span, warn};

use crate::character::repository::CharacterRepository;
use crate::chat::repository::ChatRepository;
use crate::reply::generator::ReplyGenerator;

/// Stored as the character's message when the reply generator fails or
/// times out.
pub const FALLBACK_REPLY: &str = "Sorry, I couldn't respond right now.";

/// The outcome of one completed turn: both stored messages, in order.
#[derive(Debug, Clone)]
pub struct Turn {
    /// The caller's message, stored first.
    pub user_message: Message,
    /// The character's reply, stored second. Carries the fallback text when
    /// `degraded` is set.
    pub reply: Message,
    /// True when the generator failed and the fallback reply was stored
    /// instead of a generated one.
    pub degraded: bool,
}

/// Drives one conversational turn against a chat.
///
/// Generic over the repositories and the generator so the turn flow can be
/// tested without a database or a network.
pub struct TurnCoordinator<C: ChatRepository, K: CharacterRepository, G: ReplyGenerator> {
    chat_repo: C,
    character_repo: K,
    generator: G,
    timeout: Duration,
}

impl<C: ChatRepository, K: CharacterRepository, G: ReplyGenerator> TurnCoordinator<C, K, G> {
    /// Create a new coordinator.
    ///
    /// `timeout` bounds the single generator attempt; there are no retries.
    pub fn new(chat_repo: C, character_repo: K, generator: G, timeout: Duration) -> Self {
        Self {
            chat_repo,
            character_repo,
            generator,
            timeout,
        }
    }

    /// Run one turn: store the caller's message, obtain a reply, store it.
    ///
    /// Ownership and validation failures abort before any write. Once the
    /// user message is committed, generator failures degrade to
    /// [`FALLBACK_REPLY`] rather than failing the turn; only storage
    /// failures surface after that point.
    ///
    /// The user message is committed before the generator call and the
    /// reply is committed after it returns, so no storage transaction stays
    /// open across the network wait. History is snapshotted before the
    /// user message is stored: the generator sees all prior turns plus the
    /// new text as its prompt, never the new text twice.
    pub async fn run_turn(
        &self,
        chat_id: ChatId,
        caller: &UserId,
        text: &str,
    ) -> Result<Turn, ChatError> {
        if text.trim().is_empty() {
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

        if chat.user_id != *caller {
            return Err(ChatError::Forbidden(
                "chat belongs to another user".to_string(),
            ));
        }

        let character = self
            .character_repo
            .get_character(&chat.character_id)
            .await
            .map_err(|e| ChatError::StorageError(e.to_string()))?
            .ok_or(ChatError::CharacterNotFound)?;

        let history: Vec<HistoryEntry> = self
            .chat_repo
            .list_messages(chat_id)
            .await
            .map_err(|e| ChatError::StorageError(e.to_string()))?
            .into_iter()
            .map(|m| HistoryEntry::new(m.author.role(), m.body))
            .collect();

        let user_message = self
            .chat_repo
            .append_message(chat_id, &MessageAuthor::User(caller.clone()), text)
            .await
            .map_err(|e| ChatError::StorageError(e.to_string()))?;

        let span = info_span!(
            "reply.generate",
            generator = self.generator.name(),
            chat_id = %chat_id,
            character = %character.name,
            history_len = history.len(),
        );

        let outcome = tokio::time::timeout(
            self.timeout,
            self.generator.generate(&character.description, &history, text),
        )
        .instrument(span)
        .await;

        let (reply_text, degraded) = match outcome {
            Ok(Ok(reply)) => (reply, false),
            Ok(Err(e)) => {
                warn!(chat_id = %chat_id, error = %e, "Reply generation failed, storing fallback");
                (FALLBACK_REPLY.to_string(), true)
            }
            Err(_) => {
                warn!(
                    chat_id = %chat_id,
                    timeout_secs = self.timeout.as_secs(),
                    "Reply generation timed out, storing fallback"
                );
                (FALLBACK_REPLY.to_string(), true)
            }
        };

        let reply = self
            .chat_repo
            .append_message(
                chat_id,
                &MessageAuthor::Character(chat.character_id.clone()),
                &reply_text,
            )
            .await
            .map_err(|e| ChatError::StorageError(e.to_string()))?;

        info!(
            chat_id = %chat_id,
            user_number = user_message.number,
            reply_number = reply.number,
            degraded,
            "Turn completed"
        );

        Ok(Turn {
            user_message,
            reply,
            degraded,
        })
    }
}
