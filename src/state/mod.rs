//! State persistence module
//!
//! Tracks fragment hashes and the last released commit per source to enable
//! incremental status reporting. Stores state in JSON format
//! (.relnote-state.json).

mod types;

pub use types::{SourceState, State};

use crate::error::{RelnoteError, Result};
use chrono::Utc;
use std::fs;
use std::path::Path;

/// Load state from a JSON file, defaulting to empty state on first run
pub fn load(path: &Path) -> Result<State> {
    if !path.exists() {
        return Ok(State::default());
    }

    let content = fs::read_to_string(path).map_err(|e| {
        RelnoteError::State(format!("Cannot read state from '{}': {}", path.display(), e))
    })?;

    let state: State = serde_json::from_str(&content)?;
    Ok(state)
}

/// Save state to a JSON file
pub fn save(state: &State, path: &Path) -> Result<()> {
    let mut state = state.clone();
    state.last_updated = Utc::now();

    let json = serde_json::to_string_pretty(&state)?;

    // Create parent directories if needed
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(path, json)?;
    Ok(())
}

/// Get the recorded state for a source key
pub fn get_source<'a>(state: &'a State, key: &str) -> Option<&'a SourceState> {
    state.sources.get(key)
}

/// Replace the recorded state for a source key
pub fn update_source(state: &mut State, key: String, source: SourceState) {
    state.sources.insert(key, source);
}
