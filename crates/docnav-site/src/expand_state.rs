//! Expand/collapse state of sidebar groups.
//!
//! Keys are group ids (store directory paths such as `guide/advanced`).
//! Groups default to collapsed. Every change is written through to the
//! backing [`ExpandStateStore`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::structure::GlobalDocsStructure;

/// Error persisting expand state.
#[derive(Debug, thiserror::Error)]
pub enum ExpandStateError {
    /// Reading or writing the state file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The state file is not valid JSON.
    #[error("Invalid state file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Persistence for expand state.
pub trait ExpandStateStore: Send + Sync {
    /// Load the saved state. A store with nothing saved returns an empty map.
    fn load(&self) -> Result<BTreeMap<String, bool>, ExpandStateError>;

    /// Replace the saved state.
    fn save(&self, state: &BTreeMap<String, bool>) -> Result<(), ExpandStateError>;
}

/// In-memory store. State is lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryExpandStore {
    saved: Mutex<BTreeMap<String, bool>>,
}

impl MemoryExpandStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ExpandStateStore for MemoryExpandStore {
    fn load(&self) -> Result<BTreeMap<String, bool>, ExpandStateError> {
        Ok(self
            .saved
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn save(&self, state: &BTreeMap<String, bool>) -> Result<(), ExpandStateError> {
        state.clone_into(&mut self.saved.lock().unwrap_or_else(PoisonError::into_inner));
        Ok(())
    }
}

/// JSON file store.
#[derive(Debug, Clone)]
pub struct FileExpandStore {
    path: PathBuf,
}

impl FileExpandStore {
    /// Create a store backed by `path`. The file is created on first save.
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Location of the state file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ExpandStateStore for FileExpandStore {
    fn load(&self) -> Result<BTreeMap<String, bool>, ExpandStateError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, state: &BTreeMap<String, bool>) -> Result<(), ExpandStateError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(state)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

/// Expand state of sidebar groups, written through to a store.
pub struct ExpandState {
    store: Box<dyn ExpandStateStore>,
    expanded: Mutex<BTreeMap<String, bool>>,
}

impl ExpandState {
    /// Load state from `store`.
    pub fn load(store: Box<dyn ExpandStateStore>) -> Result<Self, ExpandStateError> {
        let expanded = store.load()?;
        tracing::debug!(groups = expanded.len(), "Loaded expand state");
        Ok(Self {
            store,
            expanded: Mutex::new(expanded),
        })
    }

    /// Whether a group is expanded. Unknown groups are collapsed.
    #[must_use]
    pub fn is_expanded(&self, id: &str) -> bool {
        self.lock().get(id).copied().unwrap_or(false)
    }

    /// Set a group's state and persist it.
    ///
    /// The in-memory state is left unchanged when saving fails.
    pub fn set(&self, id: &str, expanded: bool) -> Result<(), ExpandStateError> {
        let mut state = self.lock();
        let mut updated = state.clone();
        updated.insert(id.to_owned(), expanded);
        self.store.save(&updated)?;
        *state = updated;
        Ok(())
    }

    /// Flip a group's state and persist it. Returns the new state.
    pub fn toggle(&self, id: &str) -> Result<bool, ExpandStateError> {
        let mut state = self.lock();
        let expanded = !state.get(id).copied().unwrap_or(false);
        let mut updated = state.clone();
        updated.insert(id.to_owned(), expanded);
        self.store.save(&updated)?;
        *state = updated;
        Ok(expanded)
    }

    /// Copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<String, bool> {
        self.lock().clone()
    }

    /// Forget groups that no longer exist in `structure`.
    ///
    /// Returns the number of entries removed. Nothing is written when
    /// nothing was removed.
    pub fn retain_known(&self, structure: &GlobalDocsStructure) -> Result<usize, ExpandStateError> {
        let known = structure.group_ids();
        let mut state = self.lock();
        let mut updated = state.clone();
        updated.retain(|id, _| known.contains(id.as_str()));
        let removed = state.len() - updated.len();
        if removed > 0 {
            tracing::debug!(removed, "Dropped stale expand state");
            self.store.save(&updated)?;
            *state = updated;
        }
        Ok(removed)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, bool>> {
        self.expanded.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
