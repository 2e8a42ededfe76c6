//! HTTP-backed page source over the character list endpoint.

use std::sync::Arc;

use async_trait::async_trait;
use log::debug;

use crate::api::{CharacterApi, CharacterPageDto};
use crate::domain::{CharacterError, CharacterPage, FIRST_PAGE, PageSource};

/// Loads keyed pages from the remote catalogue for one fixed name filter.
pub struct HttpPageSource {
    api: Arc<CharacterApi>,
    name_query: String,
}

impl HttpPageSource {
    pub fn new(api: Arc<CharacterApi>, name_query: impl Into<String>) -> Self {
        Self {
            api,
            name_query: name_query.into(),
        }
    }
}

/// Translates one wire envelope into a keyed page. The previous key is pure
/// arithmetic; the next key exists only while the backend reports a further
/// page.
fn to_page(page: u32, dto: CharacterPageDto) -> CharacterPage {
    CharacterPage {
        items: dto.results.into_iter().map(Into::into).collect(),
        prev_key: (page > FIRST_PAGE).then(|| page - 1),
        next_key: dto.info.next.is_some().then(|| page + 1),
    }
}

#[async_trait]
impl PageSource for HttpPageSource {
    async fn load(&self, key: Option<u32>) -> Result<CharacterPage, CharacterError> {
        let page = key.unwrap_or(FIRST_PAGE);
        let dto = self.api.characters(page, &self.name_query).await?;
        debug!(
            "page {page} loaded: {} items, next={}",
            dto.results.len(),
            dto.info.next.is_some()
        );
        Ok(to_page(page, dto))
    }
}
