//! The seam between presentation and data: screens depend on this trait,
//! tests substitute it.

use async_trait::async_trait;

use super::entity::Character;
use super::error::CharacterError;
use super::feed::CharacterFeed;

#[async_trait]
pub trait CharacterRepository: Send + Sync {
    /// Builds a fresh feed over the catalogue, filtered by name. Every call
    /// starts from a fresh cursor; rebuilding the feed is how a refresh
    /// restarts the underlying loader.
    fn characters(&self, page_size: u32, name_query: &str) -> CharacterFeed;

    /// Fetches a single character. Transport failures, error statuses and
    /// malformed payloads all come back as structured outcomes, never as
    /// panics.
    async fn character_by_id(&self, character_id: u32) -> Result<Character, CharacterError>;
}
