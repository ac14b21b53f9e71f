//! SQLite chat repository implementation.
//!
//! Implements `ChatRepository` from `junochat-core` using sqlx with split
//! read/write pools: raw queries, private Row structs, reader for SELECTs,
//! writer for mutations. Number assignment and delete-compaction run inside
//! writer transactions, so the gap-free numbering invariant survives
//! concurrent appends and deletes on the same chat.

use chrono::{DateTime, Utc};
use junochat_core::chat::repository::ChatRepository;
use junochat_types::character::CharacterId;
use junochat_types::chat::{Chat, ChatId, ChatSummary, Message, MessageAuthor, MessageId};
use junochat_types::error::RepositoryError;
use junochat_types::user::UserId;
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;
use super::sequencer;

/// SQLite-backed implementation of `ChatRepository`.
pub struct SqliteChatRepository {
    pool: DatabasePool,
}

impl SqliteChatRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Private Row types for SQLite-to-domain mapping
// ---------------------------------------------------------------------------

/// Internal row type for mapping SQLite rows to domain Chat.
struct ChatRow {
    id: i64,
    user_id: String,
    character_id: String,
    created_at: String,
}

impl ChatRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            character_id: row.try_get("character_id")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_chat(self) -> Result<Chat, RepositoryError> {
        let user_id = Uuid::parse_str(&self.user_id)
            .map_err(|e| RepositoryError::Query(format!("invalid user_id: {e}")))?;
        let character_id = Uuid::parse_str(&self.character_id)
            .map_err(|e| RepositoryError::Query(format!("invalid character_id: {e}")))?;
        let created_at = parse_datetime(&self.created_at)?;

        Ok(Chat {
            id: ChatId(self.id),
            user_id: UserId::from_uuid(user_id),
            character_id: CharacterId::from_uuid(character_id),
            created_at,
        })
    }
}

/// Internal row type for mapping SQLite rows to domain Message.
struct MessageRow {
    id: String,
    chat_id: i64,
    number: i64,
    body: String,
    sender_user_id: Option<String>,
    sender_character_id: Option<String>,
    created_at: String,
}

impl MessageRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            chat_id: row.try_get("chat_id")?,
            number: row.try_get("number")?,
            body: row.try_get("body")?,
            sender_user_id: row.try_get("sender_user_id")?,
            sender_character_id: row.try_get("sender_character_id")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_message(self) -> Result<Message, RepositoryError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| RepositoryError::Query(format!("invalid message id: {e}")))?;
        let created_at = parse_datetime(&self.created_at)?;

        let author = match (self.sender_user_id, self.sender_character_id) {
            (Some(user), None) => {
                let user = Uuid::parse_str(&user)
                    .map_err(|e| RepositoryError::Query(format!("invalid sender_user_id: {e}")))?;
                MessageAuthor::User(UserId::from_uuid(user))
            }
            (None, Some(character)) => {
                let character = Uuid::parse_str(&character).map_err(|e| {
                    RepositoryError::Query(format!("invalid sender_character_id: {e}"))
                })?;
                MessageAuthor::Character(CharacterId::from_uuid(character))
            }
            _ => {
                return Err(RepositoryError::Query(
                    "message row must set exactly one sender".to_string(),
                ));
            }
        };

        Ok(Message {
            id: MessageId::from_uuid(id),
            chat_id: ChatId(self.chat_id),
            number: self.number as u32,
            body: self.body,
            author,
            created_at,
        })
    }
}

/// Internal row type for chat list summaries.
struct ChatSummaryRow {
    id: i64,
    character_id: String,
    character_name: String,
    last_message: Option<String>,
}

impl ChatSummaryRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            character_id: row.try_get("character_id")?,
            character_name: row.try_get("character_name")?,
            last_message: row.try_get("last_message")?,
        })
    }

    fn into_summary(self) -> Result<ChatSummary, RepositoryError> {
        let character_id = Uuid::parse_str(&self.character_id)
            .map_err(|e| RepositoryError::Query(format!("invalid character_id: {e}")))?;

        Ok(ChatSummary {
            id: ChatId(self.id),
            title: self.character_name.clone(),
            last_message: self.last_message,
            character_name: self.character_name,
            character_id: CharacterId::from_uuid(character_id),
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

// ---------------------------------------------------------------------------
// ChatRepository implementation
// ---------------------------------------------------------------------------

impl ChatRepository for SqliteChatRepository {
    async fn create_chat(
        &self,
        user_id: &UserId,
        character_id: &CharacterId,
    ) -> Result<Chat, RepositoryError> {
        let created_at = Utc::now();
        let result =
            sqlx::query("INSERT INTO chats (user_id, character_id, created_at) VALUES (?, ?, ?)")
                .bind(user_id.to_string())
                .bind(character_id.to_string())
                .bind(format_datetime(&created_at))
                .execute(&self.pool.writer)
                .await;

        match result {
            Ok(result) => Ok(Chat {
                id: ChatId(result.last_insert_rowid()),
                user_id: user_id.clone(),
                character_id: character_id.clone(),
                created_at,
            }),
            Err(sqlx::Error::Database(db_err)) if db_err.message().contains("FOREIGN KEY") => {
                Err(RepositoryError::NotFound)
            }
            Err(e) => Err(RepositoryError::Query(e.to_string())),
        }
    }

    async fn get_chat(&self, chat_id: ChatId) -> Result<Option<Chat>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM chats WHERE id = ?")
            .bind(chat_id.0)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let chat_row =
                    ChatRow::from_row(&row).map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(chat_row.into_chat()?))
            }
            None => Ok(None),
        }
    }

    async fn find_first_chat(
        &self,
        user_id: &UserId,
        character_id: &CharacterId,
    ) -> Result<Option<Chat>, RepositoryError> {
        let row = sqlx::query(
            "SELECT * FROM chats WHERE user_id = ? AND character_id = ? ORDER BY id ASC LIMIT 1",
        )
        .bind(user_id.to_string())
        .bind(character_id.to_string())
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let chat_row =
                    ChatRow::from_row(&row).map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(chat_row.into_chat()?))
            }
            None => Ok(None),
        }
    }

    async fn list_chats(&self, user_id: &UserId) -> Result<Vec<ChatSummary>, RepositoryError> {
        let rows = sqlx::query(
            r#"SELECT c.id AS id,
                      ch.id AS character_id,
                      ch.name AS character_name,
                      (SELECT m.body FROM messages m
                       WHERE m.chat_id = c.id
                       ORDER BY m.number DESC LIMIT 1) AS last_message
               FROM chats c
               JOIN characters ch ON ch.id = c.character_id
               WHERE c.user_id = ?
               ORDER BY c.id DESC"#,
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut summaries = Vec::with_capacity(rows.len());
        for row in &rows {
            let summary_row = ChatSummaryRow::from_row(row)
                .map_err(|e| RepositoryError::Query(e.to_string()))?;
            summaries.push(summary_row.into_summary()?);
        }

        Ok(summaries)
    }

    async fn delete_chat(&self, chat_id: ChatId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM chats WHERE id = ?")
            .bind(chat_id.0)
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn append_message(
        &self,
        chat_id: ChatId,
        author: &MessageAuthor,
        body: &str,
    ) -> Result<Message, RepositoryError> {
        let mut tx = self
            .pool
            .writer
            .begin()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let number = sequencer::next_number(&mut *tx, chat_id).await?;

        let message = Message {
            id: MessageId::new(),
            chat_id,
            number,
            body: body.to_string(),
            author: author.clone(),
            created_at: Utc::now(),
        };

        let result = sqlx::query(
            r#"INSERT INTO messages (id, chat_id, number, body, sender_user_id, sender_character_id, created_at)
               VALUES (?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(message.id.to_string())
        .bind(message.chat_id.0)
        .bind(message.number as i64)
        .bind(&message.body)
        .bind(message.author.user_id().map(|u| u.to_string()))
        .bind(message.author.character_id().map(|c| c.to_string()))
        .bind(format_datetime(&message.created_at))
        .execute(&mut *tx)
        .await;

        match result {
            Ok(_) => {}
            Err(sqlx::Error::Database(db_err)) if db_err.message().contains("FOREIGN KEY") => {
                return Err(RepositoryError::NotFound);
            }
            Err(e) => return Err(RepositoryError::Query(e.to_string())),
        }

        tx.commit()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(message)
    }

    async fn get_message(
        &self,
        message_id: &MessageId,
    ) -> Result<Option<Message>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM messages WHERE id = ?")
            .bind(message_id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let message_row = MessageRow::from_row(&row)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(message_row.into_message()?))
            }
            None => Ok(None),
        }
    }

    async fn list_messages(&self, chat_id: ChatId) -> Result<Vec<Message>, RepositoryError> {
        let rows = sqlx::query("SELECT * FROM messages WHERE chat_id = ? ORDER BY number ASC")
            .bind(chat_id.0)
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut messages = Vec::with_capacity(rows.len());
        for row in &rows {
            let message_row =
                MessageRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            messages.push(message_row.into_message()?);
        }

        Ok(messages)
    }

    async fn delete_message(&self, message_id: &MessageId) -> Result<(), RepositoryError> {
        let mut tx = self
            .pool
            .writer
            .begin()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let row: Option<(i64, i64)> =
            sqlx::query_as("SELECT chat_id, number FROM messages WHERE id = ?")
                .bind(message_id.to_string())
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| RepositoryError::Query(e.to_string()))?;

        // Dropping the open transaction rolls it back.
        let Some((chat_id, number)) = row else {
            return Err(RepositoryError::NotFound);
        };

        sqlx::query("DELETE FROM messages WHERE id = ?")
            .bind(message_id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        sequencer::compact_after_delete(&mut *tx, ChatId(chat_id), number as u32).await?;

        tx.commit()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }

    async fn count_messages(&self, chat_id: ChatId) -> Result<u32, RepositoryError> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM messages WHERE chat_id = ?")
            .bind(chat_id.0)
            .fetch_one(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(row.0 as u32)
    }
}
