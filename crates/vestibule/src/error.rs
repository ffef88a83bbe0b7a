//! Unified error type for the Vestibule meta-crate.

use vestibule_directory::DirectoryError;
use vestibule_gate::GateError;
use vestibule_registrar::RegistrationError;
use vestibule_roster::RosterError;

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `vestibule` meta-crate, you deal with this single error
/// type instead of importing errors from each sub-crate; the `#[from]`
/// attributes let `?` convert sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum VestibuleError {
    /// A directory-store error (availability, keying, subscriptions).
    #[error(transparent)]
    Directory(#[from] DirectoryError),

    /// A roster error (live subscription establishment).
    #[error(transparent)]
    Roster(#[from] RosterError),

    /// A registration error (validation, duplicate codes).
    #[error(transparent)]
    Registration(#[from] RegistrationError),

    /// An admission error (format, rejected codes).
    #[error(transparent)]
    Gate(#[from] GateError),
}

#[cfg(test)]
mod tests {
    use vestibule_directory::{Code, InvalidCode};

    use super::*;

    #[test]
    fn test_from_directory_error() {
        let err = DirectoryError::Unavailable("no config".into());
        let top: VestibuleError = err.into();
        assert!(matches!(top, VestibuleError::Directory(_)));
        assert!(top.to_string().contains("no config"));
    }

    #[test]
    fn test_from_roster_error() {
        let err = RosterError::Subscribe(DirectoryError::SubscriptionFailed(
            "denied".into(),
        ));
        let top: VestibuleError = err.into();
        assert!(matches!(top, VestibuleError::Roster(_)));
    }

    #[test]
    fn test_from_registration_error() {
        let code = Code::parse("AB1").expect("valid code");
        let err = RegistrationError::CodeAlreadyExists(code);
        let top: VestibuleError = err.into();
        assert!(matches!(top, VestibuleError::Registration(_)));
        assert!(top.to_string().contains("AB1"));
    }

    #[test]
    fn test_from_gate_error() {
        let err = GateError::InvalidCodeFormat(InvalidCode);
        let top: VestibuleError = err.into();
        assert!(matches!(top, VestibuleError::Gate(_)));
    }
}
