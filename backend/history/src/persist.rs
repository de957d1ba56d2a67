use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use tracing::debug;

/// Abstract interface for the persisted history blob.
///
/// The store owns serialization; implementations only move raw text. That
/// keeps corruption handling in one place and lets tests swap the backend.
pub trait HistoryPersistence: Send + Sync {
    /// Read the persisted representation; `None` if nothing was ever saved.
    fn load(&self) -> Result<Option<String>>;

    /// Replace the persisted representation wholesale.
    fn save(&self, serialized: &str) -> Result<()>;
}

/// History persisted as one JSON file at a fixed path.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl HistoryPersistence for JsonFileStore {
    fn load(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        Ok(Some(raw))
    }

    fn save(&self, serialized: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        fs::write(&self.path, serialized)
            .with_context(|| format!("failed to write {}", self.path.display()))?;
        debug!(path = %self.path.display(), bytes = serialized.len(), "History flushed");
        Ok(())
    }
}

/// In-memory persistence for tests. Clones share the same backing slot, so
/// a reopened store sees what a previous one saved.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    data: Arc<Mutex<Option<String>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed the slot, e.g. with malformed text.
    pub fn seeded(raw: impl Into<String>) -> Self {
        Self {
            data: Arc::new(Mutex::new(Some(raw.into()))),
        }
    }
}

impl HistoryPersistence for InMemoryStore {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.data.lock().unwrap().clone())
    }

    fn save(&self, serialized: &str) -> Result<()> {
        *self.data.lock().unwrap() = Some(serialized.to_string());
        Ok(())
    }
}
