//! # Vestibule
//!
//! Registration directory and admission gate for code-gated shared
//! sessions.
//!
//! Vestibule keeps two small uniquely-keyed registries — players and
//! arenas — live in an operator console, and admits end users into a
//! shared session when they present a valid registration code.
//!
//! Two façades tie the layers together:
//!
//! - [`OperatorConsole`] — the operator side: register, delete, revoke and
//!   restore entries, and watch a live ordered roster per registry.
//! - [`Lobby`] — the end-user side: submit a code, get admitted, come back
//!   later and be re-admitted silently from the cached session.
//!
//! ```text
//! OperatorConsole ──register/delete──→ DirectoryStore ──live feed──→ roster
//!                                          ↑
//! Lobby ──resolve code──────────────────────┘
//!   └── SessionCache (survives restarts, re-validated every time)
//! ```
//!
//! The layers underneath are usable on their own:
//! [`vestibule_directory`] (store capability + types),
//! [`vestibule_roster`] (live ordered snapshots),
//! [`vestibule_registrar`] (validated writes),
//! [`vestibule_gate`] (admission state machine + session cache).

mod console;
mod error;
mod lobby;

pub use console::OperatorConsole;
pub use error::VestibuleError;
pub use lobby::{Lobby, SubmitOutcome};

pub use vestibule_directory::{
    Code, DirectoryError, DirectoryStore, Entry, InvalidCode, MemoryStore,
    Registry,
};
pub use vestibule_gate::{
    AdmissionGate, FileSessionCache, GateError, GateState,
    MemorySessionCache, SessionCache, SessionRecord,
};
pub use vestibule_registrar::{Registrar, RegistrationError};
pub use vestibule_roster::{
    RosterError, RosterEvent, RosterFeed, RosterReceiver, RosterSnapshot,
};
