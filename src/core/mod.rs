//! # Core Application Logic
//!
//! The screens' business logic, free of any UI technology. Each screen is an
//! elm-style state-holder: a state struct, an action enum for everything that
//! can happen on it, and an `update()` reducer that mutates the state and
//! returns the effect the event loop should run.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```
//!
//! The TUI adapter is the only place effects touch I/O: it spawns the page
//! fetches, runs the debounce timer, and realizes navigation effects as
//! screen changes.
//!
//! ## Modules
//!
//! - [`home`]: the character list with debounced search
//! - [`detail`]: one character, fetched by id
//! - [`nav`]: navigation state persisted across runs
//! - [`config`]: settings with the defaults → file → env → CLI hierarchy

pub mod config;
pub mod detail;
pub mod home;
pub mod nav;
