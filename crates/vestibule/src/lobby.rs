//! The lobby: the async admission flow end users go through.
//!
//! The gate itself (in `vestibule-gate`) is a synchronous state machine;
//! the lobby is what drives it against the directory store and the session
//! cache. The gate lives behind a `tokio::sync::Mutex` that is never held
//! across a store await — a resolution locks to begin, resolves unlocked,
//! then locks again to complete, and the gate's sequence guard discards
//! whichever resolutions arrived too late.

use tokio::sync::Mutex;

use vestibule_directory::{Code, DirectoryStore, Registry};
use vestibule_gate::{
    AdmissionGate, AdmissionOutcome, GateError, SessionCache, SessionRecord,
};

/// The outcome of an explicit code submission.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The code resolved to an active entry; the session is live and
    /// cached.
    Admitted(SessionRecord),
    /// A newer submission superseded this one while it was resolving; its
    /// result was discarded. Whatever the newest submission decides is
    /// what the UI shows.
    Superseded,
}

/// Admits end users into the shared session by code.
///
/// Resolution runs against the players registry. All methods take `&self`,
/// so a lobby can be shared (`Arc`) between an input handler and a startup
/// path; the gate's sequence numbers keep concurrent submissions from
/// racing each other into an inconsistent state.
pub struct Lobby<S: DirectoryStore, C: SessionCache> {
    store: S,
    cache: C,
    gate: Mutex<AdmissionGate>,
}

impl<S: DirectoryStore, C: SessionCache> Lobby<S, C> {
    /// Creates a lobby over a store handle and a session cache.
    pub fn new(store: S, cache: C) -> Self {
        Self {
            store,
            cache,
            gate: Mutex::new(AdmissionGate::new()),
        }
    }

    /// Submits a code for admission.
    ///
    /// Format validation happens first and locally: a malformed code
    /// reports [`GateError::InvalidCodeFormat`] with no store call and no
    /// state change. A valid code goes Pending, resolves through the
    /// store, and either admits (session cached) or rejects with
    /// [`GateError::InvalidOrInactiveCode`] (cache cleared) — an absent
    /// entry and a revoked one are indistinguishable on purpose.
    ///
    /// # Errors
    /// [`GateError::Store`] if the directory could not be reached; the
    /// attempt is abandoned and the cache is left as it was.
    pub async fn enter(
        &self,
        raw_code: &str,
    ) -> Result<SubmitOutcome, GateError> {
        let code = Code::parse(raw_code)?;
        let seq = self.gate.lock().await.begin(code.clone());

        let resolved = match self.store.get(Registry::Players, &code).await {
            Ok(resolved) => resolved,
            Err(error) => {
                self.gate.lock().await.fail(seq);
                return Err(error.into());
            }
        };

        match self.gate.lock().await.complete(seq, resolved) {
            AdmissionOutcome::Admitted(record) => {
                self.cache.save(&record).await;
                Ok(SubmitOutcome::Admitted(record))
            }
            AdmissionOutcome::Rejected => {
                self.cache.clear().await;
                Err(GateError::InvalidOrInactiveCode)
            }
            AdmissionOutcome::Superseded => Ok(SubmitOutcome::Superseded),
        }
    }

    /// Attempts silent re-admission from the cached session at startup.
    ///
    /// The cached code is never trusted: it goes through the same
    /// resolution as an explicit submission. A code that is gone or
    /// revoked yields `Ok(None)` — no user-facing error, the gate simply
    /// reopens — and the stale cache entry is cleared. A successful
    /// re-admission refreshes the cache (the display name may have
    /// changed).
    ///
    /// # Errors
    /// [`GateError::Store`] if the directory could not be reached; the
    /// cached record is cleared, since it could not be verified.
    pub async fn resume(
        &self,
    ) -> Result<Option<SessionRecord>, GateError> {
        let Some(cached) = self.cache.load().await else {
            return Ok(None);
        };
        tracing::debug!(code = %cached.code, "re-validating cached session");

        let seq = self.gate.lock().await.begin(cached.code.clone());

        let resolved =
            match self.store.get(Registry::Players, &cached.code).await {
                Ok(resolved) => resolved,
                Err(error) => {
                    self.gate.lock().await.fail(seq);
                    self.cache.clear().await;
                    return Err(error.into());
                }
            };

        match self.gate.lock().await.complete(seq, resolved) {
            AdmissionOutcome::Admitted(record) => {
                self.cache.save(&record).await;
                Ok(Some(record))
            }
            AdmissionOutcome::Rejected => {
                self.cache.clear().await;
                Ok(None)
            }
            AdmissionOutcome::Superseded => Ok(None),
        }
    }

    /// Explicit "change player": signs out and forgets the cached
    /// session. No store interaction. Returns the session that was live.
    pub async fn change_player(&self) -> Option<SessionRecord> {
        let previous = self.gate.lock().await.sign_out();
        self.cache.clear().await;
        previous
    }

    /// The current session, if admitted.
    pub async fn session(&self) -> Option<SessionRecord> {
        self.gate.lock().await.session().cloned()
    }
}

// =========================================================================
// Tests
// =========================================================================
