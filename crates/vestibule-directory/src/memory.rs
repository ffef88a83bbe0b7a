//! In-process reference implementation of [`DirectoryStore`].
//!
//! `MemoryStore` keeps every registry in a keyed map behind one mutex and
//! notifies live watchers after each mutation. It exists for two reasons:
//! it is the store the test suites and demos run against, and it documents
//! by example what the [`DirectoryStore`] contract requires — in
//! particular that create-if-absent checks and inserts under a single lock
//! acquisition, which is the atomicity the registration path depends on.
//!
//! # Concurrency note
//!
//! The mutex is a plain `std::sync::Mutex`, never held across an await
//! point (none of the methods await while locked). Poisoning is recovered
//! with `PoisonError::into_inner` instead of panicking, so a watcher that
//! panicked mid-send cannot take the store down with it.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::{
    Code, DirectoryError, DirectoryStore, Entry, Registry, SignalSender,
    StoreSignal, Subscription,
};

/// A registered live watcher on one registry.
struct Watcher {
    id: u64,
    registry: Registry,
    sink: SignalSender,
}

#[derive(Default)]
struct State {
    registries: HashMap<Registry, BTreeMap<String, Entry>>,
    watchers: Vec<Watcher>,
    /// Monotonic sequence backing `created_at`. Store-assigned so client
    /// clocks can never reorder the live list.
    next_created_at: u64,
    next_watcher_id: u64,
}

impl State {
    fn entries(&self, registry: Registry) -> Vec<Entry> {
        self.registries
            .get(&registry)
            .map(|docs| docs.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Pushes the registry's current document set to every live watcher.
    /// Watchers whose receiver is gone are pruned on the spot.
    fn broadcast(&mut self, registry: Registry) {
        let snapshot = self.entries(registry);
        self.watchers.retain(|watcher| {
            if watcher.registry != registry {
                return true;
            }
            watcher
                .sink
                .send(StoreSignal::Changed(snapshot.clone()))
                .is_ok()
        });
    }
}

/// In-memory keyed-document store with live change signals.
///
/// Cheap to clone — clones share the same underlying state, so a cloned
/// handle given to a registrar and another given to a roster feed observe
/// the same documents.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<State>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of live watchers on a registry. Exposed so lifecycle tests
    /// can assert the at-most-one-subscription invariant from the outside.
    pub fn watcher_count(&self, registry: Registry) -> usize {
        self.state()
            .watchers
            .iter()
            .filter(|w| w.registry == registry)
            .count()
    }

    /// Number of entries currently in a registry (active or revoked).
    pub fn len(&self, registry: Registry) -> usize {
        self.state()
            .registries
            .get(&registry)
            .map_or(0, BTreeMap::len)
    }

    /// Returns `true` if the registry holds no entries.
    pub fn is_empty(&self, registry: Registry) -> bool {
        self.len(registry) == 0
    }
}

impl DirectoryStore for MemoryStore {
    async fn get(
        &self,
        registry: Registry,
        code: &Code,
    ) -> Result<Option<Entry>, DirectoryError> {
        let state = self.state();
        Ok(state
            .registries
            .get(&registry)
            .and_then(|docs| docs.get(code.as_str()))
            .cloned())
    }

    async fn create_if_absent(
        &self,
        registry: Registry,
        code: &Code,
        name: &str,
    ) -> Result<Entry, DirectoryError> {
        let mut state = self.state();

        let docs = state.registries.entry(registry).or_default();
        // Check-and-insert under one lock acquisition: this is the atomic
        // create-if-absent the registration race resolves through. A
        // revoked entry still occupies its key.
        if docs.contains_key(code.as_str()) {
            return Err(DirectoryError::AlreadyExists(code.clone()));
        }

        state.next_created_at += 1;
        let entry = Entry {
            code: code.clone(),
            name: name.to_string(),
            active: true,
            created_at: state.next_created_at,
        };
        state
            .registries
            .entry(registry)
            .or_default()
            .insert(code.as_str().to_string(), entry.clone());

        tracing::info!(%registry, %code, "entry created");
        state.broadcast(registry);
        Ok(entry)
    }

    async fn delete(
        &self,
        registry: Registry,
        code: &Code,
    ) -> Result<(), DirectoryError> {
        let mut state = self.state();
        let removed = state
            .registries
            .get_mut(&registry)
            .and_then(|docs| docs.remove(code.as_str()));

        if removed.is_some() {
            tracing::info!(%registry, %code, "entry deleted");
            state.broadcast(registry);
        }
        Ok(())
    }

    async fn set_active(
        &self,
        registry: Registry,
        code: &Code,
        active: bool,
    ) -> Result<(), DirectoryError> {
        let mut state = self.state();
        let entry = state
            .registries
            .get_mut(&registry)
            .and_then(|docs| docs.get_mut(code.as_str()))
            .ok_or_else(|| DirectoryError::NotFound(code.clone()))?;

        entry.active = active;
        tracing::info!(%registry, %code, active, "entry active flag updated");
        state.broadcast(registry);
        Ok(())
    }

    async fn subscribe(
        &self,
        registry: Registry,
        sink: SignalSender,
    ) -> Result<Subscription, DirectoryError> {
        let mut state = self.state();
        state.next_watcher_id += 1;
        let id = state.next_watcher_id;

        // Initial load goes out before the watcher can see any mutation,
        // so a subscriber always starts from a complete snapshot.
        let initial = state.entries(registry);
        if sink.send(StoreSignal::Changed(initial)).is_err() {
            return Err(DirectoryError::SubscriptionFailed(
                "subscriber hung up before the initial snapshot".to_string(),
            ));
        }
        state.watchers.push(Watcher {
            id,
            registry,
            sink,
        });
        drop(state);

        tracing::debug!(%registry, watcher = id, "subscription established");

        let inner = Arc::clone(&self.inner);
        Ok(Subscription::new(move || {
            let mut state =
                inner.lock().unwrap_or_else(PoisonError::into_inner);
            state.watchers.retain(|w| w.id != id);
            tracing::debug!(%registry, watcher = id, "subscription cancelled");
        }))
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc;

    use super::*;

    fn code(raw: &str) -> Code {
        Code::parse(raw).expect("test code should be valid")
    }

    /// Receives the next signal, panicking if the store sent nothing.
    fn next_changed(
        rx: &mut mpsc::UnboundedReceiver<StoreSignal>,
    ) -> Vec<Entry> {
        match rx.try_recv().expect("expected a pending signal") {
            StoreSignal::Changed(entries) => entries,
            StoreSignal::Lost(reason) => {
                panic!("subscription unexpectedly lost: {reason}")
            }
        }
    }

    // =====================================================================
    // create_if_absent()
    // =====================================================================

    #[tokio::test]
    async fn test_create_if_absent_assigns_monotonic_created_at() {
        let store = MemoryStore::new();

        let first = store
            .create_if_absent(Registry::Players, &code("AAA"), "Ada")
            .await
            .expect("first create");
        let second = store
            .create_if_absent(Registry::Players, &code("BBB"), "Brian")
            .await
            .expect("second create");

        assert!(first.active);
        assert!(
            second.created_at > first.created_at,
            "created_at must be monotonic"
        );
    }

    #[tokio::test]
    async fn test_create_if_absent_duplicate_returns_already_exists() {
        let store = MemoryStore::new();
        store
            .create_if_absent(Registry::Players, &code("AAA"), "Ada")
            .await
            .expect("first create");

        let result = store
            .create_if_absent(Registry::Players, &code("AAA"), "Impostor")
            .await;

        assert!(matches!(result, Err(DirectoryError::AlreadyExists(_))));
        assert_eq!(store.len(Registry::Players), 1);
    }

    #[tokio::test]
    async fn test_create_if_absent_rejects_resurrecting_revoked_entry() {
        // A revoked entry still occupies its key: no overwrite, no
        // resurrection through create.
        let store = MemoryStore::new();
        store
            .create_if_absent(Registry::Players, &code("AAA"), "Ada")
            .await
            .expect("create");
        store
            .set_active(Registry::Players, &code("AAA"), false)
            .await
            .expect("revoke");

        let result = store
            .create_if_absent(Registry::Players, &code("AAA"), "Ada again")
            .await;

        assert!(matches!(result, Err(DirectoryError::AlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_create_if_absent_same_code_different_registry_ok() {
        // Uniqueness is per registry; a player and an arena may share "AAA".
        let store = MemoryStore::new();
        store
            .create_if_absent(Registry::Players, &code("AAA"), "Ada")
            .await
            .expect("player create");
        store
            .create_if_absent(Registry::Arenas, &code("AAA"), "Main hall")
            .await
            .expect("arena create");

        assert_eq!(store.len(Registry::Players), 1);
        assert_eq!(store.len(Registry::Arenas), 1);
    }

    // =====================================================================
    // get() / delete() / set_active()
    // =====================================================================

    #[tokio::test]
    async fn test_get_returns_revoked_entries_too() {
        let store = MemoryStore::new();
        store
            .create_if_absent(Registry::Players, &code("AAA"), "Ada")
            .await
            .expect("create");
        store
            .set_active(Registry::Players, &code("AAA"), false)
            .await
            .expect("revoke");

        let entry = store
            .get(Registry::Players, &code("AAA"))
            .await
            .expect("get")
            .expect("entry should still exist");
        assert!(!entry.active, "revoked entry is returned with active=false");
    }

    #[tokio::test]
    async fn test_get_unknown_code_returns_none() {
        let store = MemoryStore::new();
        let result = store.get(Registry::Players, &code("ZZZ")).await;
        assert!(matches!(result, Ok(None)));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = MemoryStore::new();
        store
            .create_if_absent(Registry::Players, &code("AAA"), "Ada")
            .await
            .expect("create");

        store
            .delete(Registry::Players, &code("AAA"))
            .await
            .expect("first delete");
        store
            .delete(Registry::Players, &code("AAA"))
            .await
            .expect("second delete of an absent key still succeeds");

        assert!(store.is_empty(Registry::Players));
    }

    #[tokio::test]
    async fn test_set_active_unknown_code_returns_not_found() {
        let store = MemoryStore::new();
        let result = store
            .set_active(Registry::Players, &code("ZZZ"), false)
            .await;
        assert!(matches!(result, Err(DirectoryError::NotFound(_))));
    }

    // =====================================================================
    // subscribe()
    // =====================================================================

    #[tokio::test]
    async fn test_subscribe_delivers_initial_snapshot_immediately() {
        let store = MemoryStore::new();
        store
            .create_if_absent(Registry::Players, &code("AAA"), "Ada")
            .await
            .expect("create");

        let (tx, mut rx) = mpsc::unbounded_channel();
        let _sub = store
            .subscribe(Registry::Players, tx)
            .await
            .expect("subscribe");

        let initial = next_changed(&mut rx);
        assert_eq!(initial.len(), 1);
        assert_eq!(initial[0].code.as_str(), "AAA");
    }

    #[tokio::test]
    async fn test_subscribe_signals_every_mutation() {
        let store = MemoryStore::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let _sub = store
            .subscribe(Registry::Players, tx)
            .await
            .expect("subscribe");
        assert!(next_changed(&mut rx).is_empty(), "initial load is empty");

        store
            .create_if_absent(Registry::Players, &code("AAA"), "Ada")
            .await
            .expect("create");
        assert_eq!(next_changed(&mut rx).len(), 1);

        store
            .set_active(Registry::Players, &code("AAA"), false)
            .await
            .expect("revoke");
        let after_revoke = next_changed(&mut rx);
        assert!(!after_revoke[0].active);

        store
            .delete(Registry::Players, &code("AAA"))
            .await
            .expect("delete");
        assert!(next_changed(&mut rx).is_empty(), "deleted entry is gone");
    }

    #[tokio::test]
    async fn test_subscribe_other_registry_mutations_do_not_signal() {
        let store = MemoryStore::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let _sub = store
            .subscribe(Registry::Players, tx)
            .await
            .expect("subscribe");
        next_changed(&mut rx); // drain initial

        store
            .create_if_absent(Registry::Arenas, &code("HALL1"), "Main hall")
            .await
            .expect("arena create");

        assert!(
            rx.try_recv().is_err(),
            "players watcher must not see arena mutations"
        );
    }

    #[tokio::test]
    async fn test_cancel_removes_watcher_and_closes_channel() {
        let store = MemoryStore::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let sub = store
            .subscribe(Registry::Players, tx)
            .await
            .expect("subscribe");
        assert_eq!(store.watcher_count(Registry::Players), 1);

        sub.cancel();
        assert_eq!(store.watcher_count(Registry::Players), 0);

        // The store dropped its sender, so after draining the initial
        // snapshot the channel reads closed.
        next_changed(&mut rx);
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_dropped_receiver_is_pruned_on_next_broadcast() {
        let store = MemoryStore::new();
        let (tx, rx) = mpsc::unbounded_channel();
        let _sub = store
            .subscribe(Registry::Players, tx)
            .await
            .expect("subscribe");
        drop(rx);

        store
            .create_if_absent(Registry::Players, &code("AAA"), "Ada")
            .await
            .expect("create");

        assert_eq!(
            store.watcher_count(Registry::Players),
            0,
            "dead watcher should be pruned when the send fails"
        );
    }
}
