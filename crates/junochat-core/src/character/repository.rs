//! CharacterRepository trait definition.

use junochat_types::character::{Character, CharacterId};
use junochat_types::error::RepositoryError;

/// Repository trait for character persistence.
///
/// Implementations live in junochat-infra (e.g., `SqliteCharacterRepository`).
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
pub trait CharacterRepository: Send + Sync {
    /// Create a new character.
    fn create_character(
        &self,
        character: &Character,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Get a character by its unique ID.
    fn get_character(
        &self,
        character_id: &CharacterId,
    ) -> impl std::future::Future<Output = Result<Option<Character>, RepositoryError>> + Send;

    /// Look up a character by its exact name.
    fn get_character_by_name(
        &self,
        name: &str,
    ) -> impl std::future::Future<Output = Result<Option<Character>, RepositoryError>> + Send;

    /// List all characters, newest first.
    fn list_characters(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<Character>, RepositoryError>> + Send;

    /// Delete a character. Fails with `NotFound` if it does not exist.
    fn delete_character(
        &self,
        character_id: &CharacterId,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
