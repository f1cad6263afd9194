//! Cache store backends.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::debug;

use crate::CacheError;

/// Backing store for one cache scope.
///
/// Holds at most one JSON document (the single active identity). All
/// operations are synchronous: `load` backs the first paint before the
/// engine has resolved anything.
pub trait CacheStore: Send + Sync {
    /// Returns the stored document, if any.
    fn load(&self) -> Result<Option<String>, CacheError>;

    /// Replaces the stored document.
    fn store(&self, document: &str) -> Result<(), CacheError>;

    /// Removes the stored document. Removing an absent document is not an
    /// error.
    fn remove(&self) -> Result<(), CacheError>;
}

/// In-memory store. Lives as long as the process - the tab-scoped default.
#[derive(Default)]
pub struct MemoryStore {
    slot: Mutex<Option<String>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl MemoryStore {
    fn slot(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.slot.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl CacheStore for MemoryStore {
    fn load(&self) -> Result<Option<String>, CacheError> {
        Ok(self.slot().clone())
    }

    fn store(&self, document: &str) -> Result<(), CacheError> {
        *self.slot() = Some(document.to_string());
        Ok(())
    }

    fn remove(&self) -> Result<(), CacheError> {
        *self.slot() = None;
        Ok(())
    }
}

/// File-backed store: one JSON document at a fixed path.
///
/// Survives remount within the same scope; the engine clears it on
/// teardown.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Creates a store over the given file path. The parent directory is
    /// created on first write.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl CacheStore for FileStore {
    fn load(&self) -> Result<Option<String>, CacheError> {
        match std::fs::read_to_string(&self.path) {
            Ok(document) => Ok(Some(document)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CacheError::Io(e.to_string())),
        }
    }

    fn store(&self, document: &str) -> Result<(), CacheError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| CacheError::Io(e.to_string()))?;
        }
        std::fs::write(&self.path, document).map_err(|e| CacheError::Io(e.to_string()))?;
        debug!(path = %self.path.display(), "cache document written");
        Ok(())
    }

    fn remove(&self) -> Result<(), CacheError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CacheError::Io(e.to_string())),
        }
    }
}
