use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// State tracking for incremental fragment reporting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct State {
    /// State file format version
    pub version: String,

    /// Last time state was updated
    pub last_updated: DateTime<Utc>,

    /// Per-source state tracking
    pub sources: HashMap<String, SourceState>,
}

/// State for a specific source (fragment directory or git repository)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SourceState {
    #[serde(rename = "fragments")]
    Fragments {
        last_checked: DateTime<Utc>,
        item_hashes: Vec<String>,
    },
    #[serde(rename = "repo")]
    Repo {
        last_checked: DateTime<Utc>,
        /// Full hash of HEAD at the moment of the last release
        last_release_commit: Option<String>,
    },
}

impl Default for State {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            last_updated: Utc::now(),
            sources: HashMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_default() {
        let state = State::default();
        assert_eq!(state.version, "1.0");
        assert_eq!(state.sources.len(), 0);
    }

    #[test]
    fn test_state_serialization() {
        let state = State::default();
        let json = serde_json::to_string(&state).unwrap();
        let parsed: State = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.version, "1.0");
    }

    #[test]
    fn test_source_state_fragments_serialization() {
        let fragments_state = SourceState::Fragments {
            last_checked: Utc::now(),
            item_hashes: vec!["hash1".to_string(), "hash2".to_string()],
        };

        let json = serde_json::to_string(&fragments_state).unwrap();
        let parsed: SourceState = serde_json::from_str(&json).unwrap();

        match parsed {
            SourceState::Fragments { item_hashes, .. } => {
                assert_eq!(item_hashes.len(), 2);
            }
            _ => panic!("Expected Fragments variant"),
        }
    }

    #[test]
    fn test_source_state_repo_serialization() {
        let repo_state = SourceState::Repo {
            last_checked: Utc::now(),
            last_release_commit: Some("abc123def456".to_string()),
        };

        let json = serde_json::to_string(&repo_state).unwrap();
        let parsed: SourceState = serde_json::from_str(&json).unwrap();

        match parsed {
            SourceState::Repo {
                last_release_commit,
                ..
            } => {
                assert_eq!(last_release_commit.as_deref(), Some("abc123def456"));
            }
            _ => panic!("Expected Repo variant"),
        }
    }
}
