//! SQLite character repository implementation.
//!
//! Implements `CharacterRepository` from `junochat-core` using sqlx with
//! split read/write pools.

use chrono::{DateTime, Utc};
use junochat_core::character::repository::CharacterRepository;
use junochat_types::character::{Character, CharacterId};
use junochat_types::error::RepositoryError;
use junochat_types::user::UserId;
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `CharacterRepository`.
pub struct SqliteCharacterRepository {
    pool: DatabasePool,
}

impl SqliteCharacterRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Internal row type for mapping SQLite rows to domain Character.
struct CharacterRow {
    id: String,
    name: String,
    description: String,
    creator_id: Option<String>,
    created_at: String,
}

impl CharacterRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            creator_id: row.try_get("creator_id")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_character(self) -> Result<Character, RepositoryError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| RepositoryError::Query(format!("invalid character id: {e}")))?;

        let creator = match self.creator_id {
            Some(raw) => {
                let creator = Uuid::parse_str(&raw)
                    .map_err(|e| RepositoryError::Query(format!("invalid creator_id: {e}")))?;
                Some(UserId::from_uuid(creator))
            }
            None => None,
        };

        let created_at = parse_datetime(&self.created_at)?;

        Ok(Character {
            id: CharacterId::from_uuid(id),
            name: self.name,
            description: self.description,
            creator,
            created_at,
        })
    }
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

impl CharacterRepository for SqliteCharacterRepository {
    async fn create_character(&self, character: &Character) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO characters (id, name, description, creator_id, created_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(character.id.to_string())
        .bind(&character.name)
        .bind(&character.description)
        .bind(character.creator.as_ref().map(|c| c.to_string()))
        .bind(format_datetime(&character.created_at))
        .execute(&self.pool.writer)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db_err)) if db_err.message().contains("FOREIGN KEY") => {
                Err(RepositoryError::NotFound)
            }
            Err(e) => Err(RepositoryError::Query(e.to_string())),
        }
    }

    async fn get_character(
        &self,
        character_id: &CharacterId,
    ) -> Result<Option<Character>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM characters WHERE id = ?")
            .bind(character_id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let character_row = CharacterRow::from_row(&row)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(character_row.into_character()?))
            }
            None => Ok(None),
        }
    }

    async fn get_character_by_name(
        &self,
        name: &str,
    ) -> Result<Option<Character>, RepositoryError> {
        // Names are not unique; take the earliest-created match.
        let row = sqlx::query(
            "SELECT * FROM characters WHERE name = ? ORDER BY created_at ASC LIMIT 1",
        )
        .bind(name)
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let character_row = CharacterRow::from_row(&row)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(character_row.into_character()?))
            }
            None => Ok(None),
        }
    }

    async fn list_characters(&self) -> Result<Vec<Character>, RepositoryError> {
        let rows = sqlx::query("SELECT * FROM characters ORDER BY created_at DESC")
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut characters = Vec::with_capacity(rows.len());
        for row in &rows {
            let character_row =
                CharacterRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            characters.push(character_row.into_character()?);
        }

        Ok(characters)
    }

    async fn delete_character(&self, character_id: &CharacterId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM characters WHERE id = ?")
            .bind(character_id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::pool::DatabasePool;

    async fn test_pool() -> DatabasePool {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let url = format!("sqlite://{}?mode=rwc", db_path.display());
        // Leak tempdir so it lives for the test
        std::mem::forget(dir);
        DatabasePool::new(&url).await.unwrap()
    }

    fn make_character(name: &str, creator: Option<UserId>) -> Character {
        Character {
            id: CharacterId::new(),
            name: name.to_string(),
            description: format!("{name} is a test persona."),
            creator,
            created_at: Utc::now(),
        }
    }

    async fn seed_user(pool: &DatabasePool) -> UserId {
        let id = UserId::new();
        sqlx::query("INSERT INTO users (id, username, created_at) VALUES (?, ?, ?)")
            .bind(id.to_string())
            .bind(format!("user-{id}"))
            .bind(Utc::now().to_rfc3339())
            .execute(&pool.writer)
            .await
            .unwrap();
        id
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let pool = test_pool().await;
        let repo = SqliteCharacterRepository::new(pool);
        let character = make_character("Juno", None);

        repo.create_character(&character).await.unwrap();

        let found = repo.get_character(&character.id).await.unwrap().unwrap();
        assert_eq!(found.name, "Juno");
        assert_eq!(found.description, character.description);
        assert!(found.creator.is_none());
    }

    #[tokio::test]
    async fn test_get_missing() {
        let pool = test_pool().await;
        let repo = SqliteCharacterRepository::new(pool);
        let found = repo.get_character(&CharacterId::new()).await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_get_by_name() {
        let pool = test_pool().await;
        let repo = SqliteCharacterRepository::new(pool);
        let character = make_character("Baloo the Bear", None);

        repo.create_character(&character).await.unwrap();

        let found = repo
            .get_character_by_name("Baloo the Bear")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, character.id);

        let missing = repo.get_character_by_name("Nobody").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let pool = test_pool().await;
        let repo = SqliteCharacterRepository::new(pool);

        let mut older = make_character("Older", None);
        older.created_at = Utc::now() - chrono::Duration::seconds(5);
        let newer = make_character("Newer", None);

        repo.create_character(&older).await.unwrap();
        repo.create_character(&newer).await.unwrap();

        let listed = repo.list_characters().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].name, "Newer");
        assert_eq!(listed[1].name, "Older");
    }

    #[tokio::test]
    async fn test_create_with_creator() {
        let pool = test_pool().await;
        let creator = seed_user(&pool).await;
        let repo = SqliteCharacterRepository::new(pool);
        let character = make_character("Hisoka", Some(creator.clone()));

        repo.create_character(&character).await.unwrap();

        let found = repo.get_character(&character.id).await.unwrap().unwrap();
        assert_eq!(found.creator, Some(creator));
    }

    #[tokio::test]
    async fn test_create_with_unknown_creator() {
        let pool = test_pool().await;
        let repo = SqliteCharacterRepository::new(pool);
        let character = make_character("Orphan", Some(UserId::new()));

        let err = repo.create_character(&character).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_creator_nulled_when_user_deleted() {
        let pool = test_pool().await;
        let creator = seed_user(&pool).await;
        let character = make_character("Survivor", Some(creator.clone()));

        let repo = SqliteCharacterRepository::new(pool.clone());
        repo.create_character(&character).await.unwrap();

        sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(creator.to_string())
            .execute(&pool.writer)
            .await
            .unwrap();

        let found = repo.get_character(&character.id).await.unwrap().unwrap();
        assert!(found.creator.is_none());
    }

    #[tokio::test]
    async fn test_delete() {
        let pool = test_pool().await;
        let repo = SqliteCharacterRepository::new(pool);
        let character = make_character("Deletable", None);

        repo.create_character(&character).await.unwrap();
        repo.delete_character(&character.id).await.unwrap();

        let found = repo.get_character(&character.id).await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_delete_nonexistent() {
        let pool = test_pool().await;
        let repo = SqliteCharacterRepository::new(pool);

        let err = repo.delete_character(&CharacterId::new()).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }
}
