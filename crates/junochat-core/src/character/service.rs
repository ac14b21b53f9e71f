//! Character roster service.

use chrono::Utc;
use junochat_types::character::{Character, CharacterId, CreateCharacterRequest};
use junochat_types::error::ChatError;
use junochat_types::user::UserId;
use tracing::info;

use crate::character::repository::CharacterRepository;

/// Service managing the character roster.
///
/// Generic over `CharacterRepository` to maintain clean architecture
/// (junochat-core never depends on junochat-infra).
pub struct CharacterService<K: CharacterRepository> {
    character_repo: K,
}

impl<K: CharacterRepository> CharacterService<K> {
    /// Create a new character service with the given repository.
    pub fn new(character_repo: K) -> Self {
        Self { character_repo }
    }

    /// Access the character repository.
    pub fn character_repo(&self) -> &K {
        &self.character_repo
    }

    /// Create a new character.
    ///
    /// `creator` is `None` for characters installed by the seed command;
    /// those have no owner and cannot be deleted through the API.
    pub async fn create_character(
        &self,
        creator: Option<&UserId>,
        request: CreateCharacterRequest,
    ) -> Result<Character, ChatError> {
        let name = request.name.trim().to_string();
        if name.is_empty() {
            return Err(ChatError::Validation(
                "character name cannot be empty".to_string(),
            ));
        }
        let description = request.description.trim().to_string();
        if description.is_empty() {
            return Err(ChatError::Validation(
                "character description cannot be empty".to_string(),
            ));
        }

        let character = Character {
            id: CharacterId::new(),
            name,
            description,
            creator: creator.cloned(),
            created_at: Utc::now(),
        };

        self.character_repo
            .create_character(&character)
            .await
            .map_err(|e| ChatError::StorageError(e.to_string()))?;

        info!(character_id = %character.id, name = %character.name, "Character created");
        Ok(character)
    }

    /// Get a character by ID.
    pub async fn get_character(&self, id: &CharacterId) -> Result<Character, ChatError> {
        self.character_repo
            .get_character(id)
            .await
            .map_err(|e| ChatError::StorageError(e.to_string()))?
            .ok_or(ChatError::CharacterNotFound)
    }

    /// Look up a character by its exact name.
    pub async fn get_character_by_name(&self, name: &str) -> Result<Option<Character>, ChatError> {
        self.character_repo
            .get_character_by_name(name)
            .await
            .map_err(|e| ChatError::StorageError(e.to_string()))
    }

    /// List all characters, newest first.
    pub async fn list_characters(&self) -> Result<Vec<Character>, ChatError> {
        self.character_repo
            .list_characters()
            .await
            .map_err(|e| ChatError::StorageError(e.to_string()))
    }

    /// Delete a character. Only its creator may delete it.
    pub async fn delete_character(
        &self,
        caller: &UserId,
        id: &CharacterId,
    ) -> Result<(), ChatError> {
        let character = self.get_character(id).await?;
        if character.creator.as_ref() != Some(caller) {
            return Err(ChatError::Forbidden(
                "only the character's creator can delete it".to_string(),
            ));
        }

        self.character_repo
            .delete_character(id)
            .await
            .map_err(|e| ChatError::StorageError(e.to_string()))?;

        info!(character_id = %id, "Character deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::InMemoryCharacterRepo;

    fn make_request(name: &str, description: &str) -> CreateCharacterRequest {
        CreateCharacterRequest {
            name: name.to_string(),
            description: description.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_get_character() {
        let service = CharacterService::new(InMemoryCharacterRepo::default());
        let creator = UserId::new();
        let created = service
            .create_character(Some(&creator), make_request("Juno", "A sarcastic android."))
            .await
            .unwrap();

        let fetched = service.get_character(&created.id).await.unwrap();
        assert_eq!(fetched.name, "Juno");
        assert_eq!(fetched.creator, Some(creator));
    }

    #[tokio::test]
    async fn test_create_character_rejects_blank_name() {
        let service = CharacterService::new(InMemoryCharacterRepo::default());
        let result = service
            .create_character(None, make_request("  ", "Some description"))
            .await;
        assert!(matches!(result, Err(ChatError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_character_rejects_blank_description() {
        let service = CharacterService::new(InMemoryCharacterRepo::default());
        let result = service.create_character(None, make_request("Juno", "")).await;
        assert!(matches!(result, Err(ChatError::Validation(_))));
    }

    #[tokio::test]
    async fn test_delete_character_requires_creator() {
        let service = CharacterService::new(InMemoryCharacterRepo::default());
        let creator = UserId::new();
        let character = service
            .create_character(Some(&creator), make_request("Juno", "An android."))
            .await
            .unwrap();

        let stranger = UserId::new();
        let result = service.delete_character(&stranger, &character.id).await;
        assert!(matches!(result, Err(ChatError::Forbidden(_))));

        service.delete_character(&creator, &character.id).await.unwrap();
        let result = service.get_character(&character.id).await;
        assert!(matches!(result, Err(ChatError::CharacterNotFound)));
    }

    #[tokio::test]
    async fn test_seeded_character_cannot_be_deleted() {
        let service = CharacterService::new(InMemoryCharacterRepo::default());
        let character = service
            .create_character(None, make_request("Scooby-Doo", "A cowardly Great Dane."))
            .await
            .unwrap();

        let result = service.delete_character(&UserId::new(), &character.id).await;
        assert!(matches!(result, Err(ChatError::Forbidden(_))));
    }
}
