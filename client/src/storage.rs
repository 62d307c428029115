//! JSON file persistence for client-side state.
//!
//! One state file holds the vote map, the pending vote queue, the dismissed
//! alert ids, and the optional remembered admin credential. Corrupt or
//! missing storage degrades to empty defaults; it never fails a caller.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};
use vote_relay::{VoteRecord, VoteValue};

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialize error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Everything the client persists across restarts.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PersistedState {
    #[serde(default)]
    pub votes: HashMap<String, VoteValue>,
    #[serde(default)]
    pub queue: Vec<VoteRecord>,
    #[serde(default)]
    pub dismissed: Vec<String>,
    #[serde(default)]
    pub admin_key: Option<String>,
}

/// File-backed store for [`PersistedState`].
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load persisted state. Missing or corrupt files come back as defaults.
    pub fn load(&self) -> PersistedState {
        match fs::read_to_string(&self.path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(state) => state,
                Err(err) => {
                    warn!(path = %self.path.display(), %err, "state file corrupt, starting empty");
                    PersistedState::default()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no state file yet");
                PersistedState::default()
            }
            Err(err) => {
                warn!(path = %self.path.display(), %err, "state file unreadable, starting empty");
                PersistedState::default()
            }
        }
    }

    /// Save atomically: write a sibling temp file, then rename over the target.
    pub fn save(&self, state: &PersistedState) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(state)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_state() -> PersistedState {
        let mut votes = HashMap::new();
        votes.insert("inc-1".to_string(), VoteValue::Up);
        PersistedState {
            votes,
            queue: vec![VoteRecord {
                id: "inc-2".to_string(),
                vote: VoteValue::Down,
                ts: 1748685600000,
            }],
            dismissed: vec!["inc-3".to_string()],
            admin_key: Some("secret".to_string()),
        }
    }

    #[test]
    fn test_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = StateStore::new(dir.path().join("state.json"));

        let state = sample_state();
        store.save(&state).unwrap();
        assert_eq!(store.load(), state);
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = TempDir::new().unwrap();
        let store = StateStore::new(dir.path().join("absent.json"));
        assert_eq!(store.load(), PersistedState::default());
    }

    #[test]
    fn test_corrupt_file_is_default() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "{not json").unwrap();

        let store = StateStore::new(&path);
        assert_eq!(store.load(), PersistedState::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, r#"{"votes": {"a": "up"}}"#).unwrap();

        let store = StateStore::new(&path);
        let state = store.load();
        assert_eq!(state.votes.get("a"), Some(&VoteValue::Up));
        assert!(state.queue.is_empty());
        assert!(state.admin_key.is_none());
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let store = StateStore::new(dir.path().join("nested/deep/state.json"));
        store.save(&PersistedState::default()).unwrap();
        assert!(store.path().exists());
    }
}
