//! Accumulates pages from a `PageSource` into the list a screen renders.
//!
//! The feed itself is synchronous: `next_request` hands out work as a
//! `FeedRequest` value, the caller runs it wherever it likes (a spawned
//! task, usually) and feeds the outcome back through `apply`. All state
//! transitions happen on the caller's thread.

use std::sync::Arc;

use log::debug;

use super::entity::Character;
use super::error::CharacterError;
use super::paging::{CharacterPage, PageSource};

/// Where the feed currently stands with its source.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    /// Idle. `end_reached` turns true once a page arrives without a next key.
    NotLoading { end_reached: bool },
    /// A page request is out.
    Loading,
    /// The last request failed; `retry` re-issues it.
    Error(CharacterError),
}

/// A page request handed out by the feed.
pub struct FeedRequest {
    source: Arc<dyn PageSource>,
    key: Option<u32>,
}

impl FeedRequest {
    /// The cursor this request carries. `None` asks for the first page.
    pub fn key(&self) -> Option<u32> {
        self.key
    }

    pub async fn load(self) -> Result<CharacterPage, CharacterError> {
        self.source.load(self.key).await
    }
}

/// The continuously-growing paged character list.
pub struct CharacterFeed {
    source: Arc<dyn PageSource>,
    page_size: u32,
    pages: Vec<CharacterPage>,
    state: LoadState,
    /// Key of the most recently issued request; what `retry` re-issues.
    last_key: Option<u32>,
    /// Cursor for the first request; seeded when a refresh wants to come
    /// back up near the old position.
    initial_key: Option<u32>,
}

impl CharacterFeed {
    pub fn new(source: Arc<dyn PageSource>, page_size: u32) -> Self {
        Self {
            source,
            page_size,
            pages: Vec::new(),
            state: LoadState::NotLoading { end_reached: false },
            last_key: None,
            initial_key: None,
        }
    }

    /// Seeds the cursor the first request will carry.
    pub fn set_initial_key(&mut self, key: Option<u32>) {
        self.initial_key = key;
    }

    pub fn load_state(&self) -> &LoadState {
        &self.state
    }

    pub fn end_reached(&self) -> bool {
        matches!(self.state, LoadState::NotLoading { end_reached: true })
    }

    /// Number of items across all loaded pages.
    pub fn item_count(&self) -> usize {
        self.pages.iter().map(|p| p.items.len()).sum()
    }

    /// The item at a flat index spanning page boundaries.
    pub fn item(&self, index: usize) -> Option<&Character> {
        let mut remaining = index;
        for page in &self.pages {
            if remaining < page.items.len() {
                return Some(&page.items[remaining]);
            }
            remaining -= page.items.len();
        }
        None
    }

    /// Every loaded item in order.
    pub fn items(&self) -> impl Iterator<Item = &Character> {
        self.pages.iter().flat_map(|p| p.items.iter())
    }

    /// Hands out the next page request and marks the feed loading. Returns
    /// None while a request is out, after the end, or in the error state.
    pub fn next_request(&mut self) -> Option<FeedRequest> {
        match &self.state {
            LoadState::Loading | LoadState::Error(_) => return None,
            LoadState::NotLoading { end_reached: true } => return None,
            LoadState::NotLoading { end_reached: false } => {}
        }
        let key = match self.pages.last() {
            None => self.initial_key,
            Some(page) => Some(page.next_key?),
        };
        self.state = LoadState::Loading;
        self.last_key = key;
        debug!("issuing page request, key={key:?}");
        Some(FeedRequest {
            source: Arc::clone(&self.source),
            key,
        })
    }

    /// Re-issues the request that failed. Returns None unless the feed is
    /// in the error state.
    pub fn retry(&mut self) -> Option<FeedRequest> {
        if !matches!(self.state, LoadState::Error(_)) {
            return None;
        }
        self.state = LoadState::Loading;
        debug!("retrying page request, key={:?}", self.last_key);
        Some(FeedRequest {
            source: Arc::clone(&self.source),
            key: self.last_key,
        })
    }

    /// Takes a page outcome. Success appends the page and refreshes the end
    /// flag; failure parks the feed in the error state.
    pub fn apply(&mut self, outcome: Result<CharacterPage, CharacterError>) {
        match outcome {
            Ok(page) => {
                let end_reached = page.next_key.is_none();
                self.pages.push(page);
                self.state = LoadState::NotLoading { end_reached };
            }
            Err(err) => {
                debug!("page request failed: {err}");
                self.state = LoadState::Error(err);
            }
        }
    }

    /// True when the viewport sits within one page of the loaded end and
    /// more pages may exist.
    pub fn should_prefetch(&self, visible_index: usize) -> bool {
        if !matches!(self.state, LoadState::NotLoading { end_reached: false }) {
            return false;
        }
        let count = self.item_count();
        count > 0 && visible_index + self.page_size as usize >= count
    }

    /// The key a rebuilt feed should start from so `anchor_index` lands back
    /// in view: the anchor page's prev key plus one, else its next key minus
    /// one, else none (start over from the top).
    pub fn refresh_key(&self, anchor_index: usize) -> Option<u32> {
        let page = self.page_containing(anchor_index)?;
        page.prev_key
            .map(|k| k + 1)
            .or_else(|| page.next_key.map(|k| k - 1))
    }

    fn page_containing(&self, index: usize) -> Option<&CharacterPage> {
        let mut remaining = index;
        for page in &self.pages {
            if remaining < page.items.len() {
                return Some(page);
            }
            remaining -= page.items.len();
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::ErrorKind;
    use crate::test_support::{FakePageSource, test_page as page};

    fn feed() -> CharacterFeed {
        CharacterFeed::new(Arc::new(FakePageSource::new(vec![])), 20)
    }

    #[test]
    fn test_first_request_carries_no_key() {
        let mut feed = feed();
        let request = feed.next_request().unwrap();
        assert_eq!(request.key(), None);
        assert_eq!(*feed.load_state(), LoadState::Loading);
    }

    #[test]
    fn test_no_second_request_while_loading() {
        let mut feed = feed();
        let _ = feed.next_request().unwrap();
        assert!(feed.next_request().is_none());
    }

    #[test]
    fn test_next_request_follows_next_key() {
        let mut feed = feed();
        let _ = feed.next_request().unwrap();
        feed.apply(Ok(page(&[1, 2], None, Some(2))));

        let request = feed.next_request().unwrap();
        assert_eq!(request.key(), Some(2));
    }

    #[test]
    fn test_end_reached_stops_requests() {
        let mut feed = feed();
        let _ = feed.next_request().unwrap();
        feed.apply(Ok(page(&[1], None, None)));

        assert!(feed.end_reached());
        assert!(feed.next_request().is_none());
    }

    #[test]
    fn test_items_accumulate_across_pages() {
        let mut feed = feed();
        let _ = feed.next_request().unwrap();
        feed.apply(Ok(page(&[1, 2], None, Some(2))));
        let _ = feed.next_request().unwrap();
        feed.apply(Ok(page(&[3], Some(1), None)));

        assert_eq!(feed.item_count(), 3);
        assert_eq!(feed.item(2).unwrap().id, 3);
        assert!(feed.item(3).is_none());
        let ids: Vec<u32> = feed.items().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_failure_parks_feed_in_error_state() {
        let mut feed = feed();
        let _ = feed.next_request().unwrap();
        feed.apply(Err(CharacterError::new(ErrorKind::Network, "down")));

        assert!(matches!(feed.load_state(), LoadState::Error(_)));
        assert!(feed.next_request().is_none());
    }

    #[test]
    fn test_retry_reissues_failed_key() {
        let mut feed = feed();
        let _ = feed.next_request().unwrap();
        feed.apply(Ok(page(&[1], None, Some(2))));
        let _ = feed.next_request().unwrap();
        feed.apply(Err(CharacterError::new(ErrorKind::Network, "down")));

        let request = feed.retry().unwrap();
        assert_eq!(request.key(), Some(2));
        assert_eq!(*feed.load_state(), LoadState::Loading);
    }

    #[test]
    fn test_retry_outside_error_state_is_noop() {
        let mut feed = feed();
        assert!(feed.retry().is_none());
    }

    #[test]
    fn test_initial_key_seeds_first_request() {
        let mut feed = feed();
        feed.set_initial_key(Some(4));
        let request = feed.next_request().unwrap();
        assert_eq!(request.key(), Some(4));
    }

    #[test]
    fn test_prefetch_near_loaded_end() {
        let mut feed = feed();
        let _ = feed.next_request().unwrap();
        // 40 items over two pages, more available.
        feed.apply(Ok(page(&(1..=20).collect::<Vec<_>>(), None, Some(2))));
        let _ = feed.next_request().unwrap();
        feed.apply(Ok(page(&(21..=40).collect::<Vec<_>>(), Some(1), Some(3))));

        assert!(!feed.should_prefetch(10));
        assert!(feed.should_prefetch(20));
        assert!(feed.should_prefetch(39));
    }

    #[test]
    fn test_no_prefetch_after_end_or_while_loading() {
        let mut feed = feed();
        let _ = feed.next_request().unwrap();
        assert!(!feed.should_prefetch(0));
        feed.apply(Ok(page(&[1, 2], None, None)));
        assert!(!feed.should_prefetch(1));
    }

    #[test]
    fn test_refresh_key_prefers_prev_plus_one() {
        let mut feed = feed();
        let _ = feed.next_request().unwrap();
        feed.apply(Ok(page(&[1, 2], None, Some(2))));
        let _ = feed.next_request().unwrap();
        feed.apply(Ok(page(&[3, 4], Some(1), Some(3))));

        // Anchor on the second page: prev_key 1 + 1 = 2.
        assert_eq!(feed.refresh_key(2), Some(2));
        // Anchor on the first page: no prev, next_key 2 - 1 = 1.
        assert_eq!(feed.refresh_key(0), Some(1));
    }

    #[test]
    fn test_refresh_key_without_anchor_page() {
        let mut feed = feed();
        assert_eq!(feed.refresh_key(0), None);

        let _ = feed.next_request().unwrap();
        feed.apply(Ok(page(&[1], None, None)));
        // Single page with neither neighbor: start over.
        assert_eq!(feed.refresh_key(0), None);
        // Index past the loaded items: start over.
        assert_eq!(feed.refresh_key(99), None);
    }
}
