//! The operator console: registry writes plus live roster feeds.

use vestibule_directory::{DirectoryStore, Entry, Registry};
use vestibule_registrar::Registrar;
use vestibule_roster::{RosterFeed, RosterReceiver};

use crate::VestibuleError;

/// Everything the operator surface needs: a registrar for writes and one
/// roster feed per registry for the live tables.
///
/// Each feed owns its subscription handle, so re-watching a registry
/// (after a forced reload, say) cancels the old subscription before the
/// new one exists — the console can never double-render.
pub struct OperatorConsole<S: DirectoryStore + Clone> {
    registrar: Registrar<S>,
    players: RosterFeed<S>,
    arenas: RosterFeed<S>,
}

impl<S: DirectoryStore + Clone> OperatorConsole<S> {
    /// Creates a console over a store handle. No subscriptions are live
    /// until [`watch`](Self::watch) is called.
    pub fn new(store: S) -> Self {
        Self {
            registrar: Registrar::new(store.clone()),
            players: RosterFeed::new(store.clone(), Registry::Players),
            arenas: RosterFeed::new(store, Registry::Arenas),
        }
    }

    fn feed(&mut self, registry: Registry) -> &mut RosterFeed<S> {
        match registry {
            Registry::Players => &mut self.players,
            Registry::Arenas => &mut self.arenas,
        }
    }

    /// Starts (or restarts) the live feed for a registry and returns the
    /// snapshot channel. A previous feed for the same registry is
    /// superseded: its channel closes and it receives nothing further.
    pub async fn watch(
        &mut self,
        registry: Registry,
    ) -> Result<RosterReceiver, VestibuleError> {
        Ok(self.feed(registry).watch().await?)
    }

    /// Stops the live feed for a registry, if one is running.
    pub fn stop(&mut self, registry: Registry) {
        self.feed(registry).stop();
    }

    /// Registers a new entry.
    pub async fn add(
        &self,
        registry: Registry,
        name: &str,
        raw_code: &str,
    ) -> Result<Entry, VestibuleError> {
        Ok(self.registrar.register(registry, name, raw_code).await?)
    }

    /// Deletes an entry outright. The next roster snapshot no longer
    /// contains it, and the gate resolves its code as not found.
    pub async fn remove(
        &self,
        registry: Registry,
        raw_code: &str,
    ) -> Result<(), VestibuleError> {
        Ok(self.registrar.remove(registry, raw_code).await?)
    }

    /// Revokes an entry without deleting it: invisible to admission, still
    /// listed (inactive) in the roster.
    pub async fn revoke(
        &self,
        registry: Registry,
        raw_code: &str,
    ) -> Result<(), VestibuleError> {
        Ok(self
            .registrar
            .set_active(registry, raw_code, false)
            .await?)
    }

    /// Restores a previously revoked entry.
    pub async fn restore(
        &self,
        registry: Registry,
        raw_code: &str,
    ) -> Result<(), VestibuleError> {
        Ok(self.registrar.set_active(registry, raw_code, true).await?)
    }

    /// Suggests a random code for the add-entry form.
    pub fn suggest_code(&self, len: usize) -> String {
        self.registrar.suggest_code(len)
    }
}

// =========================================================================
// Tests
// =========================================================================
