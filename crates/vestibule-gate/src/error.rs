//! Error types for the admission gate.

use vestibule_directory::{DirectoryError, InvalidCode};

/// Errors that can occur while gating admission.
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    /// The submitted code failed format validation. Reported immediately;
    /// the gate never went Pending and no store call was made.
    #[error("invalid code format: {0}")]
    InvalidCodeFormat(#[from] InvalidCode),

    /// The code resolved to nothing usable: no entry, or a revoked one.
    /// The two cases are deliberately indistinguishable to the user.
    #[error("invalid or inactive code")]
    InvalidOrInactiveCode,

    /// The store could not be reached while resolving. The attempt is
    /// abandoned; no partial session exists.
    #[error(transparent)]
    Store(#[from] DirectoryError),
}
