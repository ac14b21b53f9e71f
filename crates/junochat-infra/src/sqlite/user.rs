//! SQLite user repository implementation.
//!
//! Implements `UserRepository` from `junochat-core` using sqlx with split
//! read/write pools.

use chrono::{DateTime, Utc};
use junochat_core::user::repository::UserRepository;
use junochat_types::error::RepositoryError;
use junochat_types::user::{User, UserId};
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `UserRepository`.
pub struct SqliteUserRepository {
    pool: DatabasePool,
}

impl SqliteUserRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Internal row type for mapping SQLite rows to domain User.
struct UserRow {
    id: String,
    username: String,
    created_at: String,
}

impl UserRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            username: row.try_get("username")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_user(self) -> Result<User, RepositoryError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| RepositoryError::Query(format!("invalid user id: {e}")))?;
        let created_at = parse_datetime(&self.created_at)?;

        Ok(User {
            id: UserId::from_uuid(id),
            username: self.username,
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

impl UserRepository for SqliteUserRepository {
    async fn create_user(&self, user: &User) -> Result<(), RepositoryError> {
        let result = sqlx::query("INSERT INTO users (id, username, created_at) VALUES (?, ?, ?)")
            .bind(user.id.to_string())
            .bind(&user.username)
            .bind(format_datetime(&user.created_at))
            .execute(&self.pool.writer)
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db_err)) if db_err.message().contains("UNIQUE") => {
                Err(RepositoryError::Conflict(format!(
                    "username '{}' already exists",
                    user.username
                )))
            }
            Err(e) => Err(RepositoryError::Query(e.to_string())),
        }
    }

    async fn get_user(&self, user_id: &UserId) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM users WHERE id = ?")
            .bind(user_id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let user_row =
                    UserRow::from_row(&row).map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(user_row.into_user()?))
            }
            None => Ok(None),
        }
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let user_row =
                    UserRow::from_row(&row).map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(user_row.into_user()?))
            }
            None => Ok(None),
        }
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

    fn make_user(username: &str) -> User {
        User {
            id: UserId::new(),
            username: username.to_string(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let pool = test_pool().await;
        let repo = SqliteUserRepository::new(pool);
        let user = make_user("mara");

        repo.create_user(&user).await.unwrap();

        let found = repo.get_user(&user.id).await.unwrap().unwrap();
        assert_eq!(found.username, "mara");
        assert_eq!(found.id, user.id);
    }

    #[tokio::test]
    async fn test_get_missing() {
        let pool = test_pool().await;
        let repo = SqliteUserRepository::new(pool);
        let found = repo.get_user(&UserId::new()).await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_get_by_username() {
        let pool = test_pool().await;
        let repo = SqliteUserRepository::new(pool);
        let user = make_user("kenji");

        repo.create_user(&user).await.unwrap();

        let found = repo.get_user_by_username("kenji").await.unwrap().unwrap();
        assert_eq!(found.id, user.id);

        let missing = repo.get_user_by_username("nobody").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_conflict() {
        let pool = test_pool().await;
        let repo = SqliteUserRepository::new(pool);

        repo.create_user(&make_user("taken")).await.unwrap();
        let err = repo.create_user(&make_user("taken")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }
}
