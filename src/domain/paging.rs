//! Incremental-loading contract: a source fetches one keyed page at a time.

use async_trait::async_trait;

use super::entity::Character;
use super::error::CharacterError;

/// Keys are plain page numbers; this is where the catalogue starts.
pub const FIRST_PAGE: u32 = 1;

/// One loaded page plus the keys of its neighbors.
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterPage {
    pub items: Vec<Character>,
    /// Key of the page before this one; absent on the first page.
    pub prev_key: Option<u32>,
    /// Key of the page after this one; absent once the backend reports
    /// no further page.
    pub next_key: Option<u32>,
}

/// Fetches exactly one page per call for a fixed name filter. `None` means
/// the first page. Implementations never retry on their own; a retry is the
/// caller issuing the same load again.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn load(&self, key: Option<u32>) -> Result<CharacterPage, CharacterError>;
}
