//! Durable local session storage.
//!
//! The cache is what lets a visitor skip retyping their code after a
//! restart. It is explicitly *not* a trust boundary: whatever `load`
//! returns goes back through gate resolution before anyone is admitted,
//! so the contract here is deliberately soft — absence, corruption, or an
//! unwritable backing store all degrade to "no cached session", never to
//! an error the caller has to handle.

use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use crate::SessionRecord;

/// Durable key-value storage for the current session.
///
/// `save` overwrites, `load` reads back, `clear` forgets. None of them
/// error outward: failures are logged and read as absence.
pub trait SessionCache: Send + Sync + 'static {
    /// Persists the record, replacing any previous one.
    async fn save(&self, record: &SessionRecord);

    /// Returns the cached record, or `None` if there is none — including
    /// when the backing storage is missing or corrupt.
    async fn load(&self) -> Option<SessionRecord>;

    /// Forgets the cached record. Idempotent.
    async fn clear(&self);
}

// ---------------------------------------------------------------------------
// FileSessionCache
// ---------------------------------------------------------------------------

/// A session cache backed by one JSON document on disk.
///
/// The local-storage analog: one small file holding `{code, name}`. A
/// missing or unparseable file reads as no session; the next `save`
/// overwrites whatever was there. Deserializing re-runs code validation
/// (via `Code`'s serde impl), so a hand-edited file with a malformed code
/// also reads as absent.
#[derive(Debug, Clone)]
pub struct FileSessionCache {
    path: PathBuf,
}

impl FileSessionCache {
    /// Creates a cache at the given path. Nothing is touched until the
    /// first `save` or `load`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file path.
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl SessionCache for FileSessionCache {
    async fn save(&self, record: &SessionRecord) {
        let json = match serde_json::to_vec_pretty(record) {
            Ok(json) => json,
            Err(error) => {
                tracing::warn!(%error, "session record failed to serialize");
                return;
            }
        };
        if let Err(error) = tokio::fs::write(&self.path, json).await {
            tracing::warn!(
                path = %self.path.display(),
                %error,
                "session cache write failed"
            );
        }
    }

    async fn load(&self) -> Option<SessionRecord> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(error) if error.kind() == ErrorKind::NotFound => return None,
            Err(error) => {
                tracing::warn!(
                    path = %self.path.display(),
                    %error,
                    "session cache read failed, treating as absent"
                );
                return None;
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(record) => Some(record),
            Err(error) => {
                tracing::warn!(
                    path = %self.path.display(),
                    %error,
                    "ignoring corrupt session cache"
                );
                None
            }
        }
    }

    async fn clear(&self) {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {}
            Err(error) if error.kind() == ErrorKind::NotFound => {}
            Err(error) => {
                tracing::warn!(
                    path = %self.path.display(),
                    %error,
                    "session cache clear failed"
                );
            }
        }
    }
}

// ---------------------------------------------------------------------------
// MemorySessionCache
// ---------------------------------------------------------------------------

/// An in-memory session cache for tests and ephemeral flows.
///
/// Clones share the same slot, so a lobby and a test can observe the same
/// cached session.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionCache {
    slot: Arc<Mutex<Option<SessionRecord>>>,
}

impl MemorySessionCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionCache for MemorySessionCache {
    async fn save(&self, record: &SessionRecord) {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) =
            Some(record.clone());
    }

    async fn load(&self) -> Option<SessionRecord> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    async fn clear(&self) {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

// =========================================================================
// Tests
// =========================================================================
