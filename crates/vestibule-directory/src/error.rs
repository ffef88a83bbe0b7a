//! Error types for the directory layer.

use crate::Code;

/// A raw code failed format validation.
///
/// Raised before any store interaction — a malformed code never produces a
/// read or write. Both the registrar and the gate wrap this in their own
/// `InvalidCodeFormat` variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("code must be 3-16 characters, A-Z and 0-9 only")]
pub struct InvalidCode;

/// Errors that can occur against a directory store.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    /// The key is already taken in this registry, regardless of whether the
    /// existing entry is active. Create-if-absent never overwrites and
    /// never resurrects a revoked entry.
    #[error("code {0} already exists")]
    AlreadyExists(Code),

    /// No entry exists under this key. Only raised by operations that
    /// require a present entry (revocation); deletes are idempotent.
    #[error("code {0} not found")]
    NotFound(Code),

    /// A live subscription could not be established. Terminal for that
    /// attempt; retrying is an explicit caller action.
    #[error("subscription failed: {0}")]
    SubscriptionFailed(String),

    /// The store could not be reached at all.
    #[error("directory store unavailable: {0}")]
    Unavailable(String),
}
