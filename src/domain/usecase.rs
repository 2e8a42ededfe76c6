//! Use cases sitting between screens and the repository. Thin by design;
//! they pin the defaults every screen shares.

use std::sync::Arc;

use super::entity::Character;
use super::error::CharacterError;
use super::feed::CharacterFeed;
use super::repository::CharacterRepository;

/// How many characters the backend serves per page.
pub const PAGE_SIZE: u32 = 20;

/// Builds the character list feed, optionally filtered by name.
#[derive(Clone)]
pub struct GetCharacters {
    repository: Arc<dyn CharacterRepository>,
}

impl GetCharacters {
    pub fn new(repository: Arc<dyn CharacterRepository>) -> Self {
        Self { repository }
    }

    pub fn call(&self, name_query: &str) -> CharacterFeed {
        self.repository.characters(PAGE_SIZE, name_query)
    }
}

/// Fetches one character for the detail screen.
#[derive(Clone)]
pub struct GetCharacterById {
    repository: Arc<dyn CharacterRepository>,
}

impl GetCharacterById {
    pub fn new(repository: Arc<dyn CharacterRepository>) -> Self {
        Self { repository }
    }

    pub async fn call(&self, character_id: u32) -> Result<Character, CharacterError> {
        self.repository.character_by_id(character_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::ErrorKind;
    use crate::test_support::{FakeCharacterRepository, test_character};

    fn repository() -> Arc<FakeCharacterRepository> {
        Arc::new(FakeCharacterRepository::new(vec![
            test_character(1, "Rick Sanchez"),
            test_character(2, "Morty Smith"),
            test_character(3, "Summer Smith"),
        ]))
    }

    #[tokio::test]
    async fn test_get_character_by_id_echoes_requested_id() {
        let use_case = GetCharacterById::new(repository());
        let character = use_case.call(2).await.unwrap();
        assert_eq!(character.id, 2);
        assert_eq!(character.name, "Morty Smith");
    }

    #[tokio::test]
    async fn test_get_character_by_id_absent_id_fails() {
        let use_case = GetCharacterById::new(repository());
        let err = use_case.call(999).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_get_characters_feed_serves_filtered_items() {
        let use_case = GetCharacters::new(repository());
        let mut feed = use_case.call("smith");

        let request = feed.next_request().unwrap();
        let outcome = request.load().await;
        feed.apply(outcome);

        let names: Vec<&str> = feed.items().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Morty Smith", "Summer Smith"]);
    }

    #[tokio::test]
    async fn test_get_characters_unfiltered_serves_everyone() {
        let use_case = GetCharacters::new(repository());
        let mut feed = use_case.call("");

        let request = feed.next_request().unwrap();
        let outcome = request.load().await;
        feed.apply(outcome);

        assert_eq!(feed.item_count(), 3);
        assert!(feed.end_reached());
    }
}
