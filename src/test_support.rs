//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::{
    Character, CharacterError, CharacterFeed, CharacterPage, CharacterRepository, ErrorKind,
    FIRST_PAGE, PageSource,
};

/// Builds a minimal character for tests.
pub fn test_character(id: u32, name: &str) -> Character {
    Character {
        id,
        name: name.to_string(),
        status: "Alive".to_string(),
        species: "Human".to_string(),
        ..Character::default()
    }
}

/// Builds a page of throwaway characters with the given neighbor keys.
pub fn test_page(ids: &[u32], prev_key: Option<u32>, next_key: Option<u32>) -> CharacterPage {
    CharacterPage {
        items: ids
            .iter()
            .map(|&id| test_character(id, &format!("c{id}")))
            .collect(),
        prev_key,
        next_key,
    }
}

/// Serves a scripted sequence of page outcomes, one per `load` call.
pub struct FakePageSource {
    outcomes: Mutex<VecDeque<Result<CharacterPage, CharacterError>>>,
}

impl FakePageSource {
    pub fn new(outcomes: Vec<Result<CharacterPage, CharacterError>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
        }
    }
}

#[async_trait]
impl PageSource for FakePageSource {
    async fn load(&self, _key: Option<u32>) -> Result<CharacterPage, CharacterError> {
        self.outcomes.lock().unwrap().pop_front().unwrap_or_else(|| {
            Err(CharacterError::new(
                ErrorKind::Unknown,
                "no scripted outcome left",
            ))
        })
    }
}

/// In-memory repository over a fixed character set. Filters by
/// case-insensitive name containment, the way the backend does.
pub struct FakeCharacterRepository {
    characters: Vec<Character>,
}

impl FakeCharacterRepository {
    pub fn new(characters: Vec<Character>) -> Self {
        Self { characters }
    }
}

#[async_trait]
impl CharacterRepository for FakeCharacterRepository {
    fn characters(&self, page_size: u32, name_query: &str) -> CharacterFeed {
        let query = name_query.to_lowercase();
        let filtered: Vec<Character> = self
            .characters
            .iter()
            .filter(|c| c.name.to_lowercase().contains(&query))
            .cloned()
            .collect();
        let source = InMemoryPageSource {
            characters: filtered,
            page_size,
        };
        CharacterFeed::new(Arc::new(source), page_size)
    }

    async fn character_by_id(&self, character_id: u32) -> Result<Character, CharacterError> {
        self.characters
            .iter()
            .find(|c| c.id == character_id)
            .cloned()
            .ok_or_else(|| {
                CharacterError::new(ErrorKind::NotFound, format!("no character {character_id}"))
            })
    }
}

/// Pages over an in-memory list the way the backend would.
struct InMemoryPageSource {
    characters: Vec<Character>,
    page_size: u32,
}

#[async_trait]
impl PageSource for InMemoryPageSource {
    async fn load(&self, key: Option<u32>) -> Result<CharacterPage, CharacterError> {
        let page = key.unwrap_or(FIRST_PAGE);
        let start = ((page - 1) * self.page_size) as usize;
        let items: Vec<Character> = self
            .characters
            .iter()
            .skip(start)
            .take(self.page_size as usize)
            .cloned()
            .collect();
        let has_more = start + items.len() < self.characters.len();
        Ok(CharacterPage {
            items,
            prev_key: (page > FIRST_PAGE).then(|| page - 1),
            next_key: has_more.then(|| page + 1),
        })
    }
}
