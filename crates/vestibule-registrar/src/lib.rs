//! Registration writing for Vestibule.
//!
//! The [`Registrar`] is the operator's pen: it validates and normalizes a
//! candidate name/code pair, then creates the entry through the store's
//! atomic create-if-absent. It never updates the local view itself — the
//! roster feed's live subscription is the single path by which new entries
//! become visible.

mod error;
mod registrar;

pub use error::RegistrationError;
pub use registrar::Registrar;
