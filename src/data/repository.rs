//! HTTP-backed repository implementation.

use std::sync::Arc;

use async_trait::async_trait;

use crate::api::CharacterApi;
use crate::domain::{Character, CharacterError, CharacterFeed, CharacterRepository};

use super::paging::HttpPageSource;

/// Serves the catalogue straight from the remote API. Nothing is cached;
/// every feed and every by-id fetch goes to the wire.
pub struct HttpCharacterRepository {
    api: Arc<CharacterApi>,
}

impl HttpCharacterRepository {
    pub fn new(api: Arc<CharacterApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl CharacterRepository for HttpCharacterRepository {
    fn characters(&self, page_size: u32, name_query: &str) -> CharacterFeed {
        let source = HttpPageSource::new(Arc::clone(&self.api), name_query);
        CharacterFeed::new(Arc::new(source), page_size)
    }

    async fn character_by_id(&self, character_id: u32) -> Result<Character, CharacterError> {
        let dto = self.api.character(character_id).await?;
        Ok(dto.into())
    }
}
