//! Error types for the roster layer.

use vestibule_directory::DirectoryError;

/// Errors that can occur while operating a roster feed.
#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    /// The live subscription could not be established. Terminal for this
    /// attempt — the feed does not retry; the operator re-invokes `watch`.
    #[error("failed to establish live subscription: {0}")]
    Subscribe(#[source] DirectoryError),
}
