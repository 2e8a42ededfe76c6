//! # Navigation state persistence
//!
//! Remembers which screen was open across runs: `~/.rickdex/state.json`
//! holds the detail screen's character id (or null for the list). Writes
//! use atomic rename (write `.tmp`, then `rename()`) for crash safety;
//! loads are forgiving, a bad file just means starting on the list.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// What survives a restart: the character the detail screen was showing.
#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq, Eq)]
pub struct NavState {
    pub character_id: Option<u32>,
}

/// Returns `~/.rickdex/`, creating it if needed.
pub fn state_dir() -> io::Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no home directory"))?;
    let dir = home.join(".rickdex");
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

fn state_path() -> io::Result<PathBuf> {
    Ok(state_dir()?.join("state.json"))
}

/// Atomically write `data` as JSON to `path` (via `.tmp` + rename).
fn atomic_write_json<T: Serialize>(path: &Path, data: &T) -> io::Result<()> {
    let tmp_path = path.with_extension("tmp");
    let json = serde_json::to_string_pretty(data)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    fs::write(&tmp_path, json)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

fn parse(json: &str) -> NavState {
    serde_json::from_str(json).unwrap_or_else(|e| {
        warn!("corrupt navigation state, starting on the list: {e}");
        NavState::default()
    })
}

/// Saves the navigation state. Failures are logged, not surfaced; losing
/// the restore position costs one keypress.
pub fn save(state: &NavState) {
    match state_path().and_then(|path| atomic_write_json(&path, state)) {
        Ok(()) => debug!("navigation state saved: {state:?}"),
        Err(e) => warn!("failed to save navigation state: {e}"),
    }
}

/// Loads the navigation state saved by the previous run.
pub fn load() -> NavState {
    let path = match state_path() {
        Ok(path) => path,
        Err(e) => {
            warn!("failed to locate state dir: {e}");
            return NavState::default();
        }
    };
    if !path.exists() {
        return NavState::default();
    }
    match fs::read_to_string(&path) {
        Ok(json) => parse(&json),
        Err(e) => {
            warn!("failed to read navigation state: {e}");
            NavState::default()
        }
    }
}
