//! User account service.

use chrono::Utc;
use junochat_types::error::{ChatError, RepositoryError};
use junochat_types::user::{User, UserId};
use tracing::info;

use crate::user::repository::UserRepository;

/// Longest accepted username, in characters.
const MAX_USERNAME_LEN: usize = 64;

/// Service orchestrating user account rules.
///
/// Generic over `UserRepository` to maintain clean architecture
/// (junochat-core never depends on junochat-infra).
pub struct UserService<U: UserRepository> {
    user_repo: U,
}

impl<U: UserRepository> UserService<U> {
    /// Create a new user service with the given repository.
    pub fn new(user_repo: U) -> Self {
        Self { user_repo }
    }

    /// Access the user repository.
    pub fn user_repo(&self) -> &U {
        &self.user_repo
    }

    /// Register a new user with a unique username.
    ///
    /// The username is trimmed before validation; it must be non-empty and
    /// at most 64 characters.
    pub async fn create_user(&self, username: &str) -> Result<User, ChatError> {
        let username = username.trim().to_string();
        if username.is_empty() {
            return Err(ChatError::Validation(
                "username cannot be empty".to_string(),
            ));
        }
        if username.chars().count() > MAX_USERNAME_LEN {
            return Err(ChatError::Validation(format!(
                "username must be at most {MAX_USERNAME_LEN} characters"
            )));
        }

        let user = User {
            id: UserId::new(),
            username: username.clone(),
            created_at: Utc::now(),
        };

        self.user_repo.create_user(&user).await.map_err(|e| match e {
            RepositoryError::Conflict(_) => {
                ChatError::Validation(format!("username '{username}' is already taken"))
            }
            other => ChatError::StorageError(other.to_string()),
        })?;

        info!(user_id = %user.id, username = %user.username, "User created");
        Ok(user)
    }

    /// Get a user by ID.
    pub async fn get_user(&self, id: &UserId) -> Result<User, ChatError> {
        self.user_repo
            .get_user(id)
            .await
            .map_err(|e| ChatError::StorageError(e.to_string()))?
            .ok_or(ChatError::UserNotFound)
    }

    /// Look up a user by username.
    pub async fn get_user_by_username(&self, username: &str) -> Result<User, ChatError> {
        self.user_repo
            .get_user_by_username(username)
            .await
            .map_err(|e| ChatError::StorageError(e.to_string()))?
            .ok_or(ChatError::UserNotFound)
    }
}
