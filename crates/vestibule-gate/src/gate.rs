//! The admission state machine.
//!
//! The gate itself is synchronous and pure: it holds state and decides
//! transitions, while an async flow above it (the lobby) performs the
//! store resolution between [`begin`] and [`complete`]. Splitting it this
//! way keeps every transition unit-testable without a store.
//!
//! [`begin`]: AdmissionGate::begin
//! [`complete`]: AdmissionGate::complete

use serde::{Deserialize, Serialize};

use vestibule_directory::{Code, Entry};

/// The locally cached record of the currently admitted entry.
///
/// Mirrors one directory entry's `{code, name}` at admission time. Owned
/// by the client and disposable — losing it only forces re-entry of a
/// code. Serialized camelCase to match the stored document shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    /// The admitted code.
    pub code: Code,
    /// Display name at the time of admission.
    pub name: String,
}

impl From<&Entry> for SessionRecord {
    fn from(entry: &Entry) -> Self {
        Self {
            code: entry.code.clone(),
            name: entry.name.clone(),
        }
    }
}

/// The gate's current state.
///
/// ```text
/// Unauthenticated ──(begin)──→ Pending ──(complete: active entry)──→ Admitted
///        ↑                        │  ↺ (begin again: supersede)          │
///        └──(complete: missing/revoked, or fail)──┘     (sign_out)───────┘
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum GateState {
    /// No session; the gate is open for a code.
    Unauthenticated,
    /// A resolution is in flight for `code`. `seq` identifies the attempt;
    /// only a completion carrying the same `seq` may move the state.
    Pending { seq: u64, code: Code },
    /// A code resolved to an active entry; the session is live.
    Admitted(SessionRecord),
}

/// The result of completing a resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum AdmissionOutcome {
    /// The entry exists and is active — the session is established.
    Admitted(SessionRecord),
    /// The entry is missing or revoked — back to Unauthenticated.
    Rejected,
    /// A newer attempt superseded this one; its result was discarded and
    /// the state is untouched.
    Superseded,
}

/// Decides whether a presented code yields a usable session.
///
/// The Pending state is the mutual-exclusion point: one resolution is
/// "current" at a time, identified by a sequence number. A new submission
/// while Pending supersedes the in-flight one — the in-flight store call
/// is not cancelled, its late result is simply discarded when it presents
/// a stale sequence number (fire-and-compare). The state always reflects
/// the most recent user intent.
#[derive(Debug, Default)]
pub struct AdmissionGate {
    state: GateState,
    next_seq: u64,
}

impl Default for GateState {
    fn default() -> Self {
        Self::Unauthenticated
    }
}

impl AdmissionGate {
    /// Creates a gate in the Unauthenticated state.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current state.
    pub fn state(&self) -> &GateState {
        &self.state
    }

    /// The current session, if admitted.
    pub fn session(&self) -> Option<&SessionRecord> {
        match &self.state {
            GateState::Admitted(record) => Some(record),
            _ => None,
        }
    }

    /// Returns `true` while a resolution is in flight.
    pub fn is_pending(&self) -> bool {
        matches!(self.state, GateState::Pending { .. })
    }

    /// Starts a resolution attempt for an already-validated code and
    /// returns its sequence number.
    ///
    /// Malformed input must be rejected *before* this point — a code that
    /// fails format validation never reaches Pending. Beginning while
    /// Pending supersedes the in-flight attempt (the last submitted code
    /// wins); beginning while Admitted starts a fresh attempt for the new
    /// intent.
    pub fn begin(&mut self, code: Code) -> u64 {
        self.next_seq += 1;
        let seq = self.next_seq;
        if let GateState::Pending {
            code: superseded, ..
        } = &self.state
        {
            tracing::debug!(%superseded, %code, "pending attempt superseded");
        }
        self.state = GateState::Pending { seq, code };
        seq
    }

    /// Completes the attempt identified by `seq` with what the store
    /// resolved.
    ///
    /// A stale `seq` yields [`AdmissionOutcome::Superseded`] and leaves the
    /// state untouched. Otherwise: an active entry admits; a missing or
    /// revoked one rejects back to Unauthenticated.
    pub fn complete(
        &mut self,
        seq: u64,
        resolved: Option<Entry>,
    ) -> AdmissionOutcome {
        match &self.state {
            GateState::Pending { seq: current, .. } if *current == seq => {}
            _ => return AdmissionOutcome::Superseded,
        }

        match resolved {
            Some(entry) if entry.active => {
                let record = SessionRecord::from(&entry);
                tracing::info!(code = %record.code, "admitted");
                self.state = GateState::Admitted(record.clone());
                AdmissionOutcome::Admitted(record)
            }
            _ => {
                tracing::debug!("code missing or revoked, admission rejected");
                self.state = GateState::Unauthenticated;
                AdmissionOutcome::Rejected
            }
        }
    }

    /// Abandons the attempt identified by `seq` after a store failure.
    ///
    /// Reverts Pending → Unauthenticated only if `seq` is still current;
    /// a stale failure is ignored just like a stale result. No session is
    /// created or destroyed.
    pub fn fail(&mut self, seq: u64) {
        if matches!(self.state, GateState::Pending { seq: current, .. } if current == seq)
        {
            tracing::debug!("resolution failed, gate reopened");
            self.state = GateState::Unauthenticated;
        }
    }

    /// Explicit sign-out ("change player"). Returns the session that was
    /// live, if any. No store interaction is implied.
    pub fn sign_out(&mut self) -> Option<SessionRecord> {
        match std::mem::replace(&mut self.state, GateState::Unauthenticated)
        {
            GateState::Admitted(record) => {
                tracing::info!(code = %record.code, "signed out");
                Some(record)
            }
            _ => None,
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
