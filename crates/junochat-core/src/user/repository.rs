//! UserRepository trait definition.

use junochat_types::error::RepositoryError;
use junochat_types::user::{User, UserId};

/// Repository trait for user persistence.
///
/// Implementations live in junochat-infra (e.g., `SqliteUserRepository`).
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
pub trait UserRepository: Send + Sync {
    /// Create a new user. Fails with `Conflict` if the username is taken.
    fn create_user(
        &self,
        user: &User,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Get a user by their unique ID.
    fn get_user(
        &self,
        user_id: &UserId,
    ) -> impl std::future::Future<Output = Result<Option<User>, RepositoryError>> + Send;

    /// Look up a user by username.
    fn get_user_by_username(
        &self,
        username: &str,
    ) -> impl std::future::Future<Output = Result<Option<User>, RepositoryError>> + Send;
}
