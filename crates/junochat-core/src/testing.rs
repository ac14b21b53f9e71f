//! In-memory repository implementations for unit tests.
//!
//! These honor the same contracts as the SQLite implementations in
//! junochat-infra, including gap-free message numbering, so service and
//! coordinator tests can assert real behavior without a database.

use std::sync::{Arc, Mutex};

use chrono::Utc;
use junochat_types::character::{Character, CharacterId};
use junochat_types::chat::{Chat, ChatId, ChatSummary, Message, MessageAuthor, MessageId};
use junochat_types::error::RepositoryError;
use junochat_types::user::{User, UserId};

use crate::character::repository::CharacterRepository;
use crate::chat::repository::ChatRepository;
use crate::user::repository::UserRepository;

pub(crate) fn make_character(name: &str) -> Character {
    Character {
        id: CharacterId::new(),
        name: name.to_string(),
        description: format!("{name} is a test persona."),
        creator: None,
        created_at: Utc::now(),
    }
}

/// In-memory `UserRepository` with username uniqueness.
#[derive(Clone, Default)]
pub(crate) struct InMemoryUserRepo {
    users: Arc<Mutex<Vec<User>>>,
}

impl UserRepository for InMemoryUserRepo {
    async fn create_user(&self, user: &User) -> Result<(), RepositoryError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.username == user.username) {
            return Err(RepositoryError::Conflict(format!(
                "username '{}' already exists",
                user.username
            )));
        }
        users.push(user.clone());
        Ok(())
    }

    async fn get_user(&self, user_id: &UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| &u.id == user_id)
            .cloned())
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }
}

/// In-memory `CharacterRepository`.
#[derive(Clone, Default)]
pub(crate) struct InMemoryCharacterRepo {
    characters: Arc<Mutex<Vec<Character>>>,
}

impl InMemoryCharacterRepo {
    /// Seed a character directly, bypassing the service.
    pub(crate) fn insert(&self, character: Character) {
        self.characters.lock().unwrap().push(character);
    }
}

impl CharacterRepository for InMemoryCharacterRepo {
    async fn create_character(&self, character: &Character) -> Result<(), RepositoryError> {
        self.characters.lock().unwrap().push(character.clone());
        Ok(())
    }

    async fn get_character(
        &self,
        character_id: &CharacterId,
    ) -> Result<Option<Character>, RepositoryError> {
        Ok(self
            .characters
            .lock()
            .unwrap()
            .iter()
            .find(|c| &c.id == character_id)
            .cloned())
    }

    async fn get_character_by_name(
        &self,
        name: &str,
    ) -> Result<Option<Character>, RepositoryError> {
        Ok(self
            .characters
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.name == name)
            .cloned())
    }

    async fn list_characters(&self) -> Result<Vec<Character>, RepositoryError> {
        let mut characters = self.characters.lock().unwrap().clone();
        characters.reverse();
        Ok(characters)
    }

    async fn delete_character(&self, character_id: &CharacterId) -> Result<(), RepositoryError> {
        let mut characters = self.characters.lock().unwrap();
        let before = characters.len();
        characters.retain(|c| &c.id != character_id);
        if characters.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

/// In-memory `ChatRepository` honoring the gap-free numbering contract.
///
/// Shares its character list with an [`InMemoryCharacterRepo`] (via
/// [`make_repos`]) so chat summaries can resolve character names.
#[derive(Clone, Default)]
pub(crate) struct InMemoryChatRepo {
    characters: Arc<Mutex<Vec<Character>>>,
    chats: Arc<Mutex<Vec<Chat>>>,
    messages: Arc<Mutex<Vec<Message>>>,
    next_chat_id: Arc<Mutex<i64>>,
}

/// Build a chat repo and character repo sharing one character list.
pub(crate) fn make_repos() -> (InMemoryChatRepo, InMemoryCharacterRepo) {
    let characters: Arc<Mutex<Vec<Character>>> = Arc::default();
    let chat_repo = InMemoryChatRepo {
        characters: characters.clone(),
        ..Default::default()
    };
    (chat_repo, InMemoryCharacterRepo { characters })
}

impl ChatRepository for InMemoryChatRepo {
    async fn create_chat(
        &self,
        user_id: &UserId,
        character_id: &CharacterId,
    ) -> Result<Chat, RepositoryError> {
        let id = {
            let mut next = self.next_chat_id.lock().unwrap();
            *next += 1;
            ChatId(*next)
        };
        let chat = Chat {
            id,
            user_id: user_id.clone(),
            character_id: character_id.clone(),
            created_at: Utc::now(),
        };
        self.chats.lock().unwrap().push(chat.clone());
        Ok(chat)
    }

    async fn get_chat(&self, chat_id: ChatId) -> Result<Option<Chat>, RepositoryError> {
        Ok(self
            .chats
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == chat_id)
            .cloned())
    }

    async fn find_first_chat(
        &self,
        user_id: &UserId,
        character_id: &CharacterId,
    ) -> Result<Option<Chat>, RepositoryError> {
        Ok(self
            .chats
            .lock()
            .unwrap()
            .iter()
            .filter(|c| &c.user_id == user_id && &c.character_id == character_id)
            .min_by_key(|c| c.id.0)
            .cloned())
    }

    async fn list_chats(&self, user_id: &UserId) -> Result<Vec<ChatSummary>, RepositoryError> {
        let chats = self.chats.lock().unwrap();
        let messages = self.messages.lock().unwrap();
        let characters = self.characters.lock().unwrap();

        let mut summaries = Vec::new();
        for chat in chats.iter().filter(|c| &c.user_id == user_id) {
            let character = characters
                .iter()
                .find(|k| k.id == chat.character_id)
                .ok_or(RepositoryError::NotFound)?;
            let last_message = messages
                .iter()
                .filter(|m| m.chat_id == chat.id)
                .max_by_key(|m| m.number)
                .map(|m| m.body.clone());
            summaries.push(ChatSummary {
                id: chat.id,
                title: character.name.clone(),
                last_message,
                character_name: character.name.clone(),
                character_id: character.id.clone(),
            });
        }
        summaries.sort_by(|a, b| b.id.0.cmp(&a.id.0));
        Ok(summaries)
    }

    async fn delete_chat(&self, chat_id: ChatId) -> Result<(), RepositoryError> {
        let mut chats = self.chats.lock().unwrap();
        let before = chats.len();
        chats.retain(|c| c.id != chat_id);
        if chats.len() == before {
            return Err(RepositoryError::NotFound);
        }
        self.messages.lock().unwrap().retain(|m| m.chat_id != chat_id);
        Ok(())
    }

    async fn append_message(
        &self,
        chat_id: ChatId,
        author: &MessageAuthor,
        body: &str,
    ) -> Result<Message, RepositoryError> {
        if self.get_chat(chat_id).await?.is_none() {
            return Err(RepositoryError::NotFound);
        }
        let mut messages = self.messages.lock().unwrap();
        let number = messages.iter().filter(|m| m.chat_id == chat_id).count() as u32 + 1;
        let message = Message {
            id: MessageId::new(),
            chat_id,
            number,
            body: body.to_string(),
            author: author.clone(),
            created_at: Utc::now(),
        };
        messages.push(message.clone());
        Ok(message)
    }

    async fn get_message(
        &self,
        message_id: &MessageId,
    ) -> Result<Option<Message>, RepositoryError> {
        Ok(self
            .messages
            .lock()
            .unwrap()
            .iter()
            .find(|m| &m.id == message_id)
            .cloned())
    }

    async fn list_messages(&self, chat_id: ChatId) -> Result<Vec<Message>, RepositoryError> {
        let mut messages: Vec<Message> = self
            .messages
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.chat_id == chat_id)
            .cloned()
            .collect();
        messages.sort_by_key(|m| m.number);
        Ok(messages)
    }

    async fn delete_message(&self, message_id: &MessageId) -> Result<(), RepositoryError> {
        let mut messages = self.messages.lock().unwrap();
        let Some(pos) = messages.iter().position(|m| &m.id == message_id) else {
            return Err(RepositoryError::NotFound);
        };
        let removed = messages.remove(pos);
        for message in messages.iter_mut() {
            if message.chat_id == removed.chat_id && message.number > removed.number {
                message.number -= 1;
            }
        }
        Ok(())
    }

    async fn count_messages(&self, chat_id: ChatId) -> Result<u32, RepositoryError> {
        Ok(self
            .messages
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.chat_id == chat_id)
            .count() as u32)
    }
}
