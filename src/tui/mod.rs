//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard events into screen actions.
//!
//! This is the only module that knows about ratatui and crossterm.
//! Everything that happens here lands back in the reducers as actions:
//! keystrokes become search edits and cursor moves, and finished
//! background fetches arrive over an mpsc channel as loaded pages.
//!
//! ## Redraw Strategy
//!
//! The event loop only redraws when something happened: an input event,
//! a resize, or an action from a background task. Otherwise it sleeps in
//! `poll_event_timeout` for up to 250ms per tick.

mod event;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::{Arc, mpsc};

use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use ratatui::widgets::ListState;
use tokio::task::AbortHandle;

use crate::api::CharacterApi;
use crate::core::config::ResolvedConfig;
use crate::core::detail::{self, DetailAction, DetailEffect, DetailState};
use crate::core::home::{self, HomeAction, HomeEffect, HomeState, SEARCH_DEBOUNCE};
use crate::core::nav::{self, NavState};
use crate::data::HttpCharacterRepository;
use crate::domain::{
    CharacterRepository, FeedRequest, GetCharacterById, GetCharacters, LoadState,
};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// Rows jumped by PageUp/PageDown.
const PAGE_JUMP: isize = 10;

/// Modal input mode: determines how keyboard events are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Navigate the list with arrow keys. Typing auto-switches to Input.
    Cursor,
    /// Text editing in the search box. Esc switches to Cursor.
    Input,
}

/// Messages sent from background tasks to the event loop.
#[derive(Debug)]
pub enum AppMsg {
    Home(HomeAction),
    Detail(DetailAction),
}

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub list_state: ListState,
    pub input_mode: InputMode,
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            list_state: ListState::default(),
            input_mode: InputMode::Cursor, // Browsing first; / focuses the search box
        }
    }
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(stdout(), EnableMouseCapture)?;
        info!("Terminal modes enabled (mouse capture)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), DisableMouseCapture);
    }
}

pub fn run(config: ResolvedConfig, initial_query: String) -> std::io::Result<()> {
    let api = Arc::new(CharacterApi::new(Some(config.base_url.clone())));
    let repository: Arc<dyn CharacterRepository> = Arc::new(HttpCharacterRepository::new(api));
    let get_characters = GetCharacters::new(Arc::clone(&repository));
    let get_character_by_id = GetCharacterById::new(repository);

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel::<AppMsg>();

    // Pending search debounce timer; replaced (aborted) on every keystroke
    let mut debounce_handle: Option<AbortHandle> = None;

    let (mut home, effect) = HomeState::new(get_characters, initial_query);
    let mut detail: Option<DetailState> = None;
    handle_home_effect(
        effect,
        &mut detail,
        &mut debounce_handle,
        &get_character_by_id,
        &tx,
    );

    // Reopen the detail screen from the previous run, if any
    let saved = nav::load();
    if let Some(character_id) = saved.character_id {
        let (state, effect) = DetailState::new(character_id);
        detail = Some(state);
        handle_detail_effect(effect, &mut detail, &get_character_by_id, &tx);
    }

    let mut tui = TuiState::new();
    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    let mut needs_redraw = true; // Force first frame

    loop {
        // Only draw when something changed
        if needs_redraw {
            terminal.draw(|f| ui::draw_ui(f, &home, detail.as_ref(), &mut tui))?;
            needs_redraw = false;
        }

        let first_event = poll_event_timeout(std::time::Duration::from_millis(250));

        // Process first event + drain ALL pending events before next draw
        let mut should_quit = false;
        if first_event.is_some() {
            needs_redraw = true;
        }
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            // Resize just needs a redraw (already flagged above)
            if matches!(event, TuiEvent::Resize) {
                continue;
            }

            // ForceQuit (Ctrl+C) always quits regardless of mode
            if matches!(event, TuiEvent::ForceQuit) {
                should_quit = true;
                continue;
            }

            // Detail screen captures everything while open
            if detail.is_some() {
                let action = match event {
                    TuiEvent::Escape => Some(DetailAction::BackRequested),
                    TuiEvent::InputChar('r') => Some(DetailAction::Retry),
                    TuiEvent::InputChar('q') => {
                        should_quit = true;
                        None
                    }
                    _ => None,
                };
                if let Some(action) = action {
                    dispatch_detail(action, &mut detail, &get_character_by_id, &tx);
                }
                continue;
            }

            // Ctrl+R restarts the list from either mode
            if matches!(event, TuiEvent::Refresh) {
                dispatch_home(
                    HomeAction::Refresh {
                        anchor: tui.list_state.selected(),
                    },
                    &mut home,
                    &mut detail,
                    &mut debounce_handle,
                    &get_character_by_id,
                    &tx,
                );
                sync_selection(&mut tui, &home);
                continue;
            }

            // Modal event dispatch
            match tui.input_mode {
                InputMode::Input => match event {
                    // Esc or Enter hands focus back to the list
                    TuiEvent::Escape | TuiEvent::Submit => {
                        tui.input_mode = InputMode::Cursor;
                    }
                    TuiEvent::InputChar(c) => {
                        let mut query = home.search_query.clone();
                        query.push(c);
                        dispatch_home(
                            HomeAction::SearchChanged(query),
                            &mut home,
                            &mut detail,
                            &mut debounce_handle,
                            &get_character_by_id,
                            &tx,
                        );
                    }
                    TuiEvent::Backspace => {
                        let mut query = home.search_query.clone();
                        query.pop();
                        dispatch_home(
                            HomeAction::SearchChanged(query),
                            &mut home,
                            &mut detail,
                            &mut debounce_handle,
                            &get_character_by_id,
                            &tx,
                        );
                    }
                    _ => {}
                },
                InputMode::Cursor => match event {
                    TuiEvent::InputChar('q') => should_quit = true,
                    TuiEvent::InputChar('/') => {
                        tui.input_mode = InputMode::Input;
                    }
                    // r retries a failed page, otherwise restarts from the current row
                    TuiEvent::InputChar('r') => {
                        let action = if matches!(home.feed.load_state(), LoadState::Error(_)) {
                            HomeAction::Retry
                        } else {
                            HomeAction::Refresh {
                                anchor: tui.list_state.selected(),
                            }
                        };
                        dispatch_home(
                            action,
                            &mut home,
                            &mut detail,
                            &mut debounce_handle,
                            &get_character_by_id,
                            &tx,
                        );
                    }
                    // Any other typing auto-switches to the search box and forwards
                    TuiEvent::InputChar(c) => {
                        tui.input_mode = InputMode::Input;
                        let mut query = home.search_query.clone();
                        query.push(c);
                        dispatch_home(
                            HomeAction::SearchChanged(query),
                            &mut home,
                            &mut detail,
                            &mut debounce_handle,
                            &get_character_by_id,
                            &tx,
                        );
                    }
                    // Enter opens the selected character
                    TuiEvent::Submit => {
                        if let Some(index) = tui.list_state.selected() {
                            dispatch_home(
                                HomeAction::ItemActivated(index),
                                &mut home,
                                &mut detail,
                                &mut debounce_handle,
                                &get_character_by_id,
                                &tx,
                            );
                        }
                    }
                    TuiEvent::CursorUp => {
                        if let Some(index) = move_selection(&mut tui, &home, -1) {
                            dispatch_home(
                                HomeAction::CursorMoved {
                                    visible_index: index,
                                },
                                &mut home,
                                &mut detail,
                                &mut debounce_handle,
                                &get_character_by_id,
                                &tx,
                            );
                        }
                    }
                    TuiEvent::CursorDown => {
                        if let Some(index) = move_selection(&mut tui, &home, 1) {
                            dispatch_home(
                                HomeAction::CursorMoved {
                                    visible_index: index,
                                },
                                &mut home,
                                &mut detail,
                                &mut debounce_handle,
                                &get_character_by_id,
                                &tx,
                            );
                        }
                    }
                    TuiEvent::PageUp => {
                        if let Some(index) = move_selection(&mut tui, &home, -PAGE_JUMP) {
                            dispatch_home(
                                HomeAction::CursorMoved {
                                    visible_index: index,
                                },
                                &mut home,
                                &mut detail,
                                &mut debounce_handle,
                                &get_character_by_id,
                                &tx,
                            );
                        }
                    }
                    TuiEvent::PageDown => {
                        if let Some(index) = move_selection(&mut tui, &home, PAGE_JUMP) {
                            dispatch_home(
                                HomeAction::CursorMoved {
                                    visible_index: index,
                                },
                                &mut home,
                                &mut detail,
                                &mut debounce_handle,
                                &get_character_by_id,
                                &tx,
                            );
                        }
                    }
                    _ => {}
                },
            }
            sync_selection(&mut tui, &home);
        }

        if should_quit {
            break;
        }

        // Handle background task actions (page loads, detail fetches, timers)
        while let Ok(message) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", message);
            match message {
                AppMsg::Home(action) => dispatch_home(
                    action,
                    &mut home,
                    &mut detail,
                    &mut debounce_handle,
                    &get_character_by_id,
                    &tx,
                ),
                AppMsg::Detail(action) => {
                    dispatch_detail(action, &mut detail, &get_character_by_id, &tx)
                }
            }
            sync_selection(&mut tui, &home);
        }
    }

    // Remember the open screen for the next launch
    nav::save(&NavState {
        character_id: detail.as_ref().map(|state| state.character_id),
    });

    ratatui::restore();
    Ok(())
}

fn dispatch_home(
    action: HomeAction,
    home: &mut HomeState,
    detail: &mut Option<DetailState>,
    debounce_handle: &mut Option<AbortHandle>,
    get_character_by_id: &GetCharacterById,
    tx: &mpsc::Sender<AppMsg>,
) {
    let effect = home::update(home, action);
    handle_home_effect(effect, detail, debounce_handle, get_character_by_id, tx);
}

fn dispatch_detail(
    action: DetailAction,
    detail: &mut Option<DetailState>,
    get_character_by_id: &GetCharacterById,
    tx: &mpsc::Sender<AppMsg>,
) {
    let Some(state) = detail.as_mut() else {
        debug!("Dropping detail action after screen closed: {:?}", action);
        return;
    };
    let effect = detail::update(state, action);
    handle_detail_effect(effect, detail, get_character_by_id, tx);
}

fn handle_home_effect(
    effect: HomeEffect,
    detail: &mut Option<DetailState>,
    debounce_handle: &mut Option<AbortHandle>,
    get_character_by_id: &GetCharacterById,
    tx: &mpsc::Sender<AppMsg>,
) {
    match effect {
        HomeEffect::None => {}
        HomeEffect::FetchPage {
            request,
            generation,
        } => {
            spawn_page_load(request, generation, tx.clone());
        }
        HomeEffect::Debounce { query } => {
            if let Some(handle) = debounce_handle.take() {
                handle.abort();
            }
            *debounce_handle = Some(spawn_debounce(query, tx.clone()));
        }
        HomeEffect::CancelDebounce => {
            if let Some(handle) = debounce_handle.take() {
                handle.abort();
            }
        }
        HomeEffect::Navigate { character_id } => {
            let (state, effect) = DetailState::new(character_id);
            *detail = Some(state);
            handle_detail_effect(effect, detail, get_character_by_id, tx);
        }
    }
}

fn handle_detail_effect(
    effect: DetailEffect,
    detail: &mut Option<DetailState>,
    get_character_by_id: &GetCharacterById,
    tx: &mpsc::Sender<AppMsg>,
) {
    match effect {
        DetailEffect::None => {}
        DetailEffect::Fetch { character_id } => {
            spawn_character_fetch(character_id, get_character_by_id.clone(), tx.clone());
        }
        DetailEffect::NavigateBack => {
            *detail = None;
        }
    }
}

/// Move the list cursor by `delta` rows, clamped to the loaded range.
/// Returns the new index, or None when the list is empty.
fn move_selection(tui: &mut TuiState, home: &HomeState, delta: isize) -> Option<usize> {
    let count = home.feed.item_count();
    if count == 0 {
        return None;
    }
    let current = tui.list_state.selected().unwrap_or(0);
    let target = if delta < 0 {
        current.saturating_sub(delta.unsigned_abs())
    } else {
        (current + delta as usize).min(count - 1)
    };
    tui.list_state.select(Some(target));
    Some(target)
}

/// Keep the list cursor inside the loaded range as pages come and go.
fn sync_selection(tui: &mut TuiState, home: &HomeState) {
    let count = home.feed.item_count();
    match tui.list_state.selected() {
        Some(_) if count == 0 => tui.list_state.select(None),
        Some(index) if index >= count => tui.list_state.select(Some(count - 1)),
        None if count > 0 => tui.list_state.select(Some(0)),
        _ => {}
    }
}

fn spawn_page_load(request: FeedRequest, generation: u64, tx: mpsc::Sender<AppMsg>) {
    info!(
        "Spawning page load (key={:?}, generation={})",
        request.key(),
        generation
    );
    tokio::spawn(async move {
        let outcome = request.load().await;
        if tx
            .send(AppMsg::Home(HomeAction::PageLoaded {
                generation,
                outcome,
            }))
            .is_err()
        {
            warn!("Failed to send page outcome: receiver dropped");
        }
    });
}

fn spawn_character_fetch(
    character_id: u32,
    get_character_by_id: GetCharacterById,
    tx: mpsc::Sender<AppMsg>,
) {
    info!("Spawning character fetch (id={})", character_id);
    tokio::spawn(async move {
        let outcome = get_character_by_id.call(character_id).await;
        if tx
            .send(AppMsg::Detail(DetailAction::FetchFinished {
                character_id,
                outcome,
            }))
            .is_err()
        {
            warn!("Failed to send character outcome: receiver dropped");
        }
    });
}

/// Start the search debounce timer. Returns a handle so the next keystroke
/// can abort this timer before it fires.
fn spawn_debounce(query: String, tx: mpsc::Sender<AppMsg>) -> AbortHandle {
    debug!("Debounce timer armed for query {:?}", query);
    let handle = tokio::spawn(async move {
        tokio::time::sleep(SEARCH_DEBOUNCE).await;
        if tx
            .send(AppMsg::Home(HomeAction::SearchDebounced { query }))
            .is_err()
        {
            warn!("Failed to send debounce expiry: receiver dropped");
        }
    });
    handle.abort_handle()
}
