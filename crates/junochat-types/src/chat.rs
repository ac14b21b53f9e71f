//! Chat and message types.
//!
//! A chat is a conversation thread between one user and one character.
//! Messages within a chat carry a `number` forming a gap-free ascending
//! sequence starting at 1, in creation order. The sequencer in the storage
//! layer owns that invariant; these types only model it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

use crate::character::CharacterId;
use crate::user::UserId;

/// Unique identifier for a chat. Database-assigned auto-increment integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChatId(pub i64);

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ChatId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

/// Unique identifier for a message, wrapping a UUID v7 (time-sortable).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub Uuid);

impl MessageId {
    /// Create a new MessageId using UUID v7 (time-sortable, guaranteed ordering).
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Create a MessageId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MessageId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Conversational role of a message author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for MessageRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(MessageRole::User),
            "assistant" => Ok(MessageRole::Assistant),
            other => Err(format!("invalid message role: '{other}'")),
        }
    }
}

/// The author of a message: either the chat's owner or its character.
///
/// Modeled as a tagged variant so "both set" and "neither set" author
/// states are unrepresentable. The storage layer maps the variant onto two
/// mutually exclusive nullable columns guarded by a CHECK.
///
/// Serializes as `{"role": "user", "id": "<uuid>"}` with `role` matching
/// [`MessageRole`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", content = "id", rename_all = "lowercase")]
pub enum MessageAuthor {
    User(UserId),
    #[serde(rename = "assistant")]
    Character(CharacterId),
}

impl MessageAuthor {
    /// The conversational role implied by the author.
    pub fn role(&self) -> MessageRole {
        match self {
            MessageAuthor::User(_) => MessageRole::User,
            MessageAuthor::Character(_) => MessageRole::Assistant,
        }
    }

    /// The sending user, when this is a user-authored message.
    pub fn user_id(&self) -> Option<&UserId> {
        match self {
            MessageAuthor::User(id) => Some(id),
            MessageAuthor::Character(_) => None,
        }
    }

    /// The sending character, when this is a character-authored message.
    pub fn character_id(&self) -> Option<&CharacterId> {
        match self {
            MessageAuthor::User(_) => None,
            MessageAuthor::Character(id) => Some(id),
        }
    }
}

/// A conversation thread between one user and one character.
///
/// The owner is fixed at creation; only the owner may read or write its
/// messages. Multiple chats between the same (user, character) pair are
/// permitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chat {
    pub id: ChatId,
    pub user_id: UserId,
    pub character_id: CharacterId,
    pub created_at: DateTime<Utc>,
}

/// A single message within a chat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub chat_id: ChatId,
    /// Position within the chat: 1-based, gap-free, ascending in creation
    /// order.
    pub number: u32,
    pub body: String,
    pub author: MessageAuthor,
    pub created_at: DateTime<Utc>,
}

/// A chat as it appears in a user's chat list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSummary {
    pub id: ChatId,
    /// Thread title shown in listings: the character's name.
    pub title: String,
    /// Body of the highest-numbered message, or null for an empty chat.
    pub last_message: Option<String>,
    pub character_name: String,
    pub character_id: CharacterId,
}
