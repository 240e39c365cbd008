//! Token persistence: one bearer-token slot behind a capability trait.
//!
//! DESIGN
//! ======
//! The session controller never touches a concrete storage mechanism; it is
//! handed a [`TokenStore`] and the gateway reads the same store on every
//! request. Implementations must not fail loudly: an unreadable slot means
//! "no token" and the session simply starts unauthenticated.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Storage capability for the session's bearer token.
///
/// One named slot, read and written synchronously. Enables swapping the
/// persistence mechanism in tests.
pub trait TokenStore: Send + Sync {
    /// Current token, if one is stored.
    fn get(&self) -> Option<String>;
    /// Store `token`, replacing any previous value.
    fn set(&self, token: &str);
    /// Discard the stored token, if any.
    fn remove(&self);
}

// =============================================================================
// FILE-BACKED STORE
// =============================================================================

/// File-backed token slot; survives process restarts.
///
/// I/O failures are logged and degrade to the empty slot.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self) -> Option<String> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                if token.is_empty() { None } else { Some(token.to_string()) }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "token slot unreadable");
                None
            }
        }
    }

    fn set(&self, token: &str) {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                if let Err(e) = std::fs::create_dir_all(parent) {
                    tracing::warn!(path = %parent.display(), error = %e, "token directory create failed");
                }
            }
        }
        if let Err(e) = std::fs::write(&self.path, token) {
            tracing::warn!(path = %self.path.display(), error = %e, "token write failed");
        }
    }

    fn remove(&self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "token remove failed");
            }
        }
    }
}

// =============================================================================
// IN-MEMORY STORE
// =============================================================================

/// In-memory token slot for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    slot: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seeded with `token`, as if a prior session had stored it.
    #[must_use]
    pub fn with_token(token: &str) -> Self {
        Self { slot: Mutex::new(Some(token.to_string())) }
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Option<String> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn set(&self, token: &str) {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(token.to_string());
    }

    fn remove(&self) {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

#[cfg(test)]
#[path = "storage_test.rs"]
mod tests;
