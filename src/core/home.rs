//! # Home screen state
//!
//! The character list with debounced search. Everything that can happen on
//! the screen becomes a `HomeAction`; `update()` takes the current state and
//! an action and returns the effect the event loop should run. No I/O here.
//!
//! ```text
//! State + Action  →  update()  →  New State + HomeEffect
//! ```
//!
//! Restart semantics: searching and refreshing both tear the feed down and
//! build a new one. The generation counter tags every page request; outcomes
//! arriving under an older tag are dropped, never cancelled.

use std::time::Duration;

use log::debug;

use crate::domain::{CharacterError, CharacterFeed, CharacterPage, FeedRequest, GetCharacters};

/// How long the search input must rest before a refresh fires.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(1500);

/// Queries shorter than this fire no search; clearing the field does.
pub const MIN_QUERY_LEN: usize = 2;

pub struct HomeState {
    pub search_query: String,
    pub feed: CharacterFeed,
    /// Bumped on every feed rebuild. Page outcomes from older generations
    /// are dropped on arrival.
    pub generation: u64,
    get_characters: GetCharacters,
}

#[derive(Debug)]
pub enum HomeAction {
    /// The search input changed.
    SearchChanged(String),
    /// A debounce timer elapsed for this query.
    SearchDebounced { query: String },
    /// Explicit refresh, keeping the anchor row's page in view when given.
    Refresh { anchor: Option<usize> },
    /// Re-issue the failed page request.
    Retry,
    /// The selection moved; loads more when it nears the loaded end.
    CursorMoved { visible_index: usize },
    /// The user activated a row.
    ItemActivated(usize),
    /// A page request finished.
    PageLoaded {
        generation: u64,
        outcome: Result<CharacterPage, CharacterError>,
    },
}

pub enum HomeEffect {
    None,
    /// Run the request in a task; report back as `PageLoaded` under this tag.
    FetchPage {
        request: FeedRequest,
        generation: u64,
    },
    /// Abort any pending debounce timer and start a new one for this query.
    Debounce { query: String },
    /// Abort any pending debounce timer without starting another.
    CancelDebounce,
    /// Open the detail screen. One-shot; the loop consumes it exactly once.
    Navigate { character_id: u32 },
}

impl HomeState {
    /// Builds the state and the effect that loads the first page.
    pub fn new(get_characters: GetCharacters, initial_query: String) -> (Self, HomeEffect) {
        let mut state = Self {
            search_query: initial_query.clone(),
            feed: get_characters.call(&initial_query),
            generation: 0,
            get_characters,
        };
        let effect = state.fetch_next();
        (state, effect)
    }

    /// Hands the feed's next request to the event loop, if it has one.
    fn fetch_next(&mut self) -> HomeEffect {
        match self.feed.next_request() {
            Some(request) => HomeEffect::FetchPage {
                request,
                generation: self.generation,
            },
            None => HomeEffect::None,
        }
    }

    /// Tears the feed down and starts over from `initial_key`.
    fn restart(&mut self, initial_key: Option<u32>) -> HomeEffect {
        self.generation += 1;
        self.feed = self.get_characters.call(&self.search_query);
        self.feed.set_initial_key(initial_key);
        debug!(
            "feed restarted: generation={}, query={:?}, key={initial_key:?}",
            self.generation, self.search_query
        );
        self.fetch_next()
    }
}

pub fn update(state: &mut HomeState, action: HomeAction) -> HomeEffect {
    match action {
        HomeAction::SearchChanged(text) => {
            if text == state.search_query {
                return HomeEffect::None;
            }
            state.search_query = text.clone();
            // The timer restarts for real queries and for a cleared field
            // (which restores the unfiltered list); lone characters only
            // kill the pending timer.
            if text.chars().count() >= MIN_QUERY_LEN || text.trim().is_empty() {
                HomeEffect::Debounce { query: text }
            } else {
                HomeEffect::CancelDebounce
            }
        }
        HomeAction::SearchDebounced { query } => {
            if query != state.search_query {
                debug!(
                    "ignoring stale debounce for {query:?}, current is {:?}",
                    state.search_query
                );
                return HomeEffect::None;
            }
            // Fresh cursor: a new filter shares no geometry with the old list.
            state.restart(None)
        }
        HomeAction::Refresh { anchor } => {
            let key = anchor.and_then(|index| state.feed.refresh_key(index));
            state.restart(key)
        }
        HomeAction::Retry => match state.feed.retry() {
            Some(request) => HomeEffect::FetchPage {
                request,
                generation: state.generation,
            },
            None => HomeEffect::None,
        },
        HomeAction::CursorMoved { visible_index } => {
            if state.feed.should_prefetch(visible_index) {
                state.fetch_next()
            } else {
                HomeEffect::None
            }
        }
        HomeAction::ItemActivated(index) => match state.feed.item(index) {
            Some(character) => HomeEffect::Navigate {
                character_id: character.id,
            },
            None => HomeEffect::None,
        },
        HomeAction::PageLoaded {
            generation,
            outcome,
        } => {
            if generation != state.generation {
                debug!("dropping page outcome from stale generation {generation}");
                return HomeEffect::None;
            }
            state.feed.apply(outcome);
            HomeEffect::None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ErrorKind, LoadState};
    use crate::test_support::{FakeCharacterRepository, test_character, test_page};
    use std::sync::Arc;

    fn get_characters(names: &[(u32, &str)]) -> GetCharacters {
        let characters = names
            .iter()
            .map(|&(id, name)| test_character(id, name))
            .collect();
        GetCharacters::new(Arc::new(FakeCharacterRepository::new(characters)))
    }

    fn home(names: &[(u32, &str)]) -> HomeState {
        let (state, _) = HomeState::new(get_characters(names), String::new());
        state
    }

    #[test]
    fn test_new_state_issues_first_fetch() {
        let (state, effect) = HomeState::new(get_characters(&[(1, "Rick Sanchez")]), String::new());
        assert_eq!(state.generation, 0);
        assert!(state.search_query.is_empty());
        assert!(matches!(
            effect,
            HomeEffect::FetchPage { generation: 0, ref request } if request.key().is_none()
        ));
    }

    #[test]
    fn test_search_change_stores_query_and_debounces() {
        let mut state = home(&[]);
        let effect = update(&mut state, HomeAction::SearchChanged("Rick".to_string()));
        assert_eq!(state.search_query, "Rick");
        assert!(matches!(effect, HomeEffect::Debounce { ref query } if query == "Rick"));
    }

    #[test]
    fn test_single_character_query_starts_no_timer() {
        let mut state = home(&[]);
        let effect = update(&mut state, HomeAction::SearchChanged("R".to_string()));
        assert_eq!(state.search_query, "R");
        assert!(matches!(effect, HomeEffect::CancelDebounce));
    }

    #[test]
    fn test_cleared_query_debounces_back_to_unfiltered() {
        let mut state = home(&[]);
        let _ = update(&mut state, HomeAction::SearchChanged("Rick".to_string()));
        let effect = update(&mut state, HomeAction::SearchChanged(String::new()));
        assert!(matches!(effect, HomeEffect::Debounce { ref query } if query.is_empty()));
    }

    #[test]
    fn test_unchanged_query_is_ignored() {
        let mut state = home(&[]);
        let _ = update(&mut state, HomeAction::SearchChanged("Rick".to_string()));
        let effect = update(&mut state, HomeAction::SearchChanged("Rick".to_string()));
        assert!(matches!(effect, HomeEffect::None));
    }

    #[test]
    fn test_stale_debounce_fires_nothing() {
        let mut state = home(&[]);
        let _ = update(&mut state, HomeAction::SearchChanged("Summer".to_string()));
        let _ = update(&mut state, HomeAction::SearchChanged("Rick".to_string()));

        // A timer that escaped the abort fires with the superseded query.
        let effect = update(
            &mut state,
            HomeAction::SearchDebounced {
                query: "Summer".to_string(),
            },
        );
        assert!(matches!(effect, HomeEffect::None));
        assert_eq!(state.generation, 0);
    }

    #[test]
    fn test_matching_debounce_restarts_feed_once() {
        let mut state = home(&[(1, "Rick Sanchez")]);
        let _ = update(&mut state, HomeAction::SearchChanged("Summer".to_string()));
        let _ = update(&mut state, HomeAction::SearchChanged("Rick".to_string()));

        let effect = update(
            &mut state,
            HomeAction::SearchDebounced {
                query: "Rick".to_string(),
            },
        );
        assert_eq!(state.generation, 1);
        assert!(matches!(
            effect,
            HomeEffect::FetchPage { generation: 1, ref request } if request.key().is_none()
        ));
    }

    #[test]
    fn test_page_outcome_from_stale_generation_is_dropped() {
        let mut state = home(&[]);
        // The initial fetch is in flight; a search restarts the feed.
        let _ = update(&mut state, HomeAction::SearchChanged("Rick".to_string()));
        let _ = update(
            &mut state,
            HomeAction::SearchDebounced {
                query: "Rick".to_string(),
            },
        );
        assert_eq!(state.generation, 1);

        let effect = update(
            &mut state,
            HomeAction::PageLoaded {
                generation: 0,
                outcome: Ok(test_page(&[1, 2], None, None)),
            },
        );
        assert!(matches!(effect, HomeEffect::None));
        assert_eq!(state.feed.item_count(), 0);
    }

    #[test]
    fn test_current_generation_page_is_applied() {
        let mut state = home(&[]);
        let effect = update(
            &mut state,
            HomeAction::PageLoaded {
                generation: 0,
                outcome: Ok(test_page(&[1, 2], None, None)),
            },
        );
        assert!(matches!(effect, HomeEffect::None));
        assert_eq!(state.feed.item_count(), 2);
        assert!(state.feed.end_reached());
    }

    #[test]
    fn test_failure_surfaces_as_error_state_and_retry_reissues() {
        let mut state = home(&[]);
        let _ = update(
            &mut state,
            HomeAction::PageLoaded {
                generation: 0,
                outcome: Err(CharacterError::new(ErrorKind::Network, "down")),
            },
        );
        assert!(matches!(state.feed.load_state(), LoadState::Error(_)));

        let effect = update(&mut state, HomeAction::Retry);
        assert!(matches!(
            effect,
            HomeEffect::FetchPage { generation: 0, ref request } if request.key().is_none()
        ));
    }

    #[test]
    fn test_retry_without_error_is_noop() {
        let mut state = home(&[]);
        // Initial fetch is still out; nothing failed yet.
        let effect = update(&mut state, HomeAction::Retry);
        assert!(matches!(effect, HomeEffect::None));
    }

    #[test]
    fn test_cursor_near_loaded_end_fetches_more() {
        let mut state = home(&[]);
        let _ = update(
            &mut state,
            HomeAction::PageLoaded {
                generation: 0,
                outcome: Ok(test_page(&(1..=20).collect::<Vec<_>>(), None, Some(2))),
            },
        );

        let effect = update(&mut state, HomeAction::CursorMoved { visible_index: 2 });
        assert!(matches!(effect, HomeEffect::None));

        let effect = update(&mut state, HomeAction::CursorMoved { visible_index: 19 });
        assert!(matches!(
            effect,
            HomeEffect::FetchPage { ref request, .. } if request.key() == Some(2)
        ));
    }

    #[test]
    fn test_item_activation_navigates_to_detail() {
        let mut state = home(&[]);
        let _ = update(
            &mut state,
            HomeAction::PageLoaded {
                generation: 0,
                outcome: Ok(test_page(&[7, 8], None, None)),
            },
        );

        let effect = update(&mut state, HomeAction::ItemActivated(1));
        assert!(matches!(effect, HomeEffect::Navigate { character_id: 8 }));

        let effect = update(&mut state, HomeAction::ItemActivated(5));
        assert!(matches!(effect, HomeEffect::None));
    }

    #[test]
    fn test_refresh_keeps_anchor_page_in_view() {
        let mut state = home(&[]);
        let _ = update(
            &mut state,
            HomeAction::PageLoaded {
                generation: 0,
                outcome: Ok(test_page(&(1..=20).collect::<Vec<_>>(), None, Some(2))),
            },
        );
        let _ = update(&mut state, HomeAction::CursorMoved { visible_index: 19 });
        let _ = update(
            &mut state,
            HomeAction::PageLoaded {
                generation: 0,
                outcome: Ok(test_page(&(21..=40).collect::<Vec<_>>(), Some(1), Some(3))),
            },
        );

        // Anchored on the second page: the rebuilt feed starts at its key.
        let effect = update(&mut state, HomeAction::Refresh { anchor: Some(25) });
        assert_eq!(state.generation, 1);
        assert_eq!(state.feed.item_count(), 0);
        assert!(matches!(
            effect,
            HomeEffect::FetchPage { generation: 1, ref request } if request.key() == Some(2)
        ));
    }

    #[test]
    fn test_refresh_without_anchor_starts_over() {
        let mut state = home(&[]);
        let _ = update(
            &mut state,
            HomeAction::PageLoaded {
                generation: 0,
                outcome: Ok(test_page(&[1], None, None)),
            },
        );

        let effect = update(&mut state, HomeAction::Refresh { anchor: None });
        assert!(matches!(
            effect,
            HomeEffect::FetchPage { generation: 1, ref request } if request.key().is_none()
        ));
    }
}
