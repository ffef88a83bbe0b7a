//! The `DirectoryStore` capability trait and subscription plumbing.
//!
//! Any keyed-document store with a point read, an *atomic* create-if-absent,
//! a delete, and ordered live change notifications can back a directory.
//! The trait deliberately mirrors that minimal surface; everything else in
//! the workspace is written against it, never against a concrete store.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::mpsc;

use crate::{Code, DirectoryError, Entry, Registry};

/// A change notification pushed to a subscriber.
///
/// Stores deliver the *full* document set of the registry on the initial
/// load and after every mutation — never a diff. Downstream consumers are
/// snapshot-based and must not accumulate state from deltas. No particular
/// order is guaranteed here; presentation ordering is the synchronizer's
/// job.
#[derive(Debug, Clone)]
pub enum StoreSignal {
    /// The registry's current document set.
    Changed(Vec<Entry>),
    /// The subscription died (transport failure, permission revoked).
    /// Terminal: no further signals follow, and the store does not retry.
    Lost(String),
}

/// Channel end a store pushes [`StoreSignal`]s into.
pub type SignalSender = mpsc::UnboundedSender<StoreSignal>;

/// Cancel handle for a live subscription.
///
/// Cancellation is synchronous and idempotent: the first [`cancel`] tears
/// the watcher down, later calls are no-ops. Dropping the handle cancels
/// too, so a leaked subscription cannot outlive its owner.
///
/// [`cancel`]: Subscription::cancel
pub struct Subscription {
    cancelled: AtomicBool,
    teardown: Box<dyn Fn() + Send + Sync>,
}

impl Subscription {
    /// Wraps a teardown closure. The closure runs at most once.
    pub fn new(teardown: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            cancelled: AtomicBool::new(false),
            teardown: Box::new(teardown),
        }
    }

    /// Cancels the subscription. Safe to call repeatedly; only the first
    /// call runs the teardown.
    pub fn cancel(&self) {
        if !self.cancelled.swap(true, Ordering::SeqCst) {
            (self.teardown)();
        }
    }

    /// Returns `true` once [`cancel`](Self::cancel) has run.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("cancelled", &self.is_cancelled())
            .finish_non_exhaustive()
    }
}

/// The abstract keyed-document store backing the registries.
pub trait DirectoryStore: Send + Sync + 'static {
    /// Point read. `Ok(None)` means no entry under this key — note that a
    /// *revoked* entry is still returned; interpreting `active` is the
    /// caller's concern.
    async fn get(
        &self,
        registry: Registry,
        code: &Code,
    ) -> Result<Option<Entry>, DirectoryError>;

    /// Atomically creates an entry if and only if the key is absent.
    ///
    /// The store assigns `created_at`; the new entry starts `active`.
    /// This is the one operation the whole system requires atomicity from:
    /// two concurrent creates for the same key must resolve to exactly one
    /// winner, the loser seeing [`DirectoryError::AlreadyExists`].
    async fn create_if_absent(
        &self,
        registry: Registry,
        code: &Code,
        name: &str,
    ) -> Result<Entry, DirectoryError>;

    /// Removes the entry under this key. Idempotent — deleting an absent
    /// key succeeds.
    async fn delete(
        &self,
        registry: Registry,
        code: &Code,
    ) -> Result<(), DirectoryError>;

    /// Revokes or restores an entry without deleting it.
    ///
    /// # Errors
    /// [`DirectoryError::NotFound`] if no entry exists under the key.
    async fn set_active(
        &self,
        registry: Registry,
        code: &Code,
        active: bool,
    ) -> Result<(), DirectoryError>;

    /// Establishes a live subscription on a registry.
    ///
    /// The store pushes an initial [`StoreSignal::Changed`] immediately,
    /// then one per mutation, into `sink`. Returns the cancel handle; the
    /// caller owns the subscription's lifetime.
    async fn subscribe(
        &self,
        registry: Registry,
        sink: SignalSender,
    ) -> Result<Subscription, DirectoryError>;
}

// =========================================================================
// Tests
// =========================================================================
