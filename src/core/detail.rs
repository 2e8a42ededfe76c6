//! # Detail screen state
//!
//! One character, fetched by id the moment the screen opens. Outcomes carry
//! the id they were fetched for; an outcome for a different id is dropped.

use log::debug;

use crate::domain::{Character, CharacterError};

pub struct DetailState {
    pub character_id: u32,
    pub is_loading: bool,
    pub error: Option<CharacterError>,
    pub character: Option<Character>,
}

#[derive(Debug)]
pub enum DetailAction {
    /// The by-id fetch finished.
    FetchFinished {
        character_id: u32,
        outcome: Result<Character, CharacterError>,
    },
    /// Re-issue the fetch after a failure.
    Retry,
    /// The user asked to leave the screen.
    BackRequested,
}

pub enum DetailEffect {
    None,
    /// Run the by-id fetch in a task; report back as `FetchFinished`.
    Fetch { character_id: u32 },
    /// Close the screen. One-shot; the loop consumes it exactly once.
    NavigateBack,
}

impl DetailState {
    /// Builds the state and the effect that fetches the character.
    pub fn new(character_id: u32) -> (Self, DetailEffect) {
        (
            Self {
                character_id,
                is_loading: true,
                error: None,
                character: None,
            },
            DetailEffect::Fetch { character_id },
        )
    }
}

pub fn update(state: &mut DetailState, action: DetailAction) -> DetailEffect {
    match action {
        DetailAction::FetchFinished {
            character_id,
            outcome,
        } => {
            if character_id != state.character_id {
                debug!(
                    "dropping fetch outcome for {character_id}, screen shows {}",
                    state.character_id
                );
                return DetailEffect::None;
            }
            state.is_loading = false;
            match outcome {
                Ok(character) => {
                    state.error = None;
                    state.character = Some(character);
                }
                Err(err) => {
                    debug!("character fetch failed: {err}");
                    state.error = Some(err);
                }
            }
            DetailEffect::None
        }
        DetailAction::Retry => {
            if state.is_loading {
                return DetailEffect::None;
            }
            state.is_loading = true;
            state.error = None;
            DetailEffect::Fetch {
                character_id: state.character_id,
            }
        }
        DetailAction::BackRequested => DetailEffect::NavigateBack,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorKind;
    use crate::test_support::test_character;

    #[test]
    fn test_new_state_is_loading_and_fetches() {
        let (state, effect) = DetailState::new(42);
        assert_eq!(state.character_id, 42);
        assert!(state.is_loading);
        assert!(state.character.is_none());
        assert!(matches!(effect, DetailEffect::Fetch { character_id: 42 }));
    }

    #[test]
    fn test_success_stores_character_and_clears_loading() {
        let (mut state, _) = DetailState::new(1);
        let effect = update(
            &mut state,
            DetailAction::FetchFinished {
                character_id: 1,
                outcome: Ok(test_character(1, "Rick Sanchez")),
            },
        );
        assert!(matches!(effect, DetailEffect::None));
        assert!(!state.is_loading);
        assert!(state.error.is_none());
        assert_eq!(state.character.as_ref().unwrap().name, "Rick Sanchez");
    }

    #[test]
    fn test_failure_stores_structured_error() {
        let (mut state, _) = DetailState::new(999);
        let _ = update(
            &mut state,
            DetailAction::FetchFinished {
                character_id: 999,
                outcome: Err(CharacterError::new(ErrorKind::NotFound, "no character 999")),
            },
        );
        assert!(!state.is_loading);
        assert!(state.character.is_none());
        assert_eq!(state.error.as_ref().unwrap().kind, ErrorKind::NotFound);
    }

    #[test]
    fn test_outcome_for_other_id_is_dropped() {
        let (mut state, _) = DetailState::new(1);
        let _ = update(
            &mut state,
            DetailAction::FetchFinished {
                character_id: 2,
                outcome: Ok(test_character(2, "Morty Smith")),
            },
        );
        assert!(state.is_loading);
        assert!(state.character.is_none());
    }

    #[test]
    fn test_retry_refetches_after_failure() {
        let (mut state, _) = DetailState::new(5);
        let _ = update(
            &mut state,
            DetailAction::FetchFinished {
                character_id: 5,
                outcome: Err(CharacterError::new(ErrorKind::Network, "down")),
            },
        );

        let effect = update(&mut state, DetailAction::Retry);
        assert!(matches!(effect, DetailEffect::Fetch { character_id: 5 }));
        assert!(state.is_loading);
        assert!(state.error.is_none());
    }

    #[test]
    fn test_retry_while_loading_is_noop() {
        let (mut state, _) = DetailState::new(5);
        let effect = update(&mut state, DetailAction::Retry);
        assert!(matches!(effect, DetailEffect::None));
    }

    #[test]
    fn test_back_emits_one_shot_navigation() {
        let (mut state, _) = DetailState::new(5);
        let effect = update(&mut state, DetailAction::BackRequested);
        assert!(matches!(effect, DetailEffect::NavigateBack));
    }
}
