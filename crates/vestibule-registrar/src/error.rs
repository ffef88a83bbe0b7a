//! Error types for the registration writer.

use vestibule_directory::{Code, DirectoryError, InvalidCode};

/// Errors that can occur while writing to a registry.
///
/// Validation variants (`NameRequired`, `InvalidCodeFormat`) are resolved
/// locally: when they fire, no store call was made. The remaining variants
/// are typed store outcomes — the caller presents them and leaves its own
/// state unchanged.
#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    /// The display name was empty after trimming.
    #[error("a display name is required")]
    NameRequired,

    /// The code failed format validation.
    #[error("invalid code format: {0}")]
    InvalidCodeFormat(#[from] InvalidCode),

    /// The code is already taken in this registry — including by a revoked
    /// entry. No overwrite, no resurrection.
    #[error("code {0} already exists")]
    CodeAlreadyExists(Code),

    /// The store rejected the operation.
    #[error(transparent)]
    Store(DirectoryError),
}

impl From<DirectoryError> for RegistrationError {
    fn from(err: DirectoryError) -> Self {
        match err {
            // The atomic create-if-absent losing a race surfaces exactly
            // like a sequential duplicate.
            DirectoryError::AlreadyExists(code) => {
                Self::CodeAlreadyExists(code)
            }
            other => Self::Store(other),
        }
    }
}
