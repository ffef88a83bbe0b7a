//! The roster feed: owns one registry's live subscription.
//!
//! The feed is the only place a subscription handle lives — it is internal
//! state of one `RosterFeed` instance, never a process-wide variable. That
//! ownership is what makes the at-most-one-live-subscription invariant
//! checkable: re-watching cancels the previous handle before establishing
//! the next, so duplicate watchers can never double-render or double-count.

use tokio::sync::mpsc;

use vestibule_directory::{
    DirectoryStore, Registry, StoreSignal, Subscription,
};

use crate::{RosterError, RosterEvent, RosterSnapshot};

/// Channel end a roster consumer reads [`RosterEvent`]s from.
///
/// The channel closes (recv returns `None`) when the feed is re-watched,
/// stopped, or lost — a closed channel means "this view is dead", not
/// "the registry is empty".
pub type RosterReceiver = mpsc::UnboundedReceiver<RosterEvent>;

/// Keeps one registry's live, ordered view in sync with the store.
///
/// ## Lifecycle
///
/// ```text
/// watch() ──→ [subscribed] ──(watch() again)──→ cancel old, subscribe new
///                  │
///                  ├──(stop())──→ [idle]
///                  └──(store failure)──→ RosterEvent::Lost, channel closes
/// ```
///
/// Subscription failure is terminal for that attempt: the feed never
/// retries on its own. An explicit `watch()` call is the retry.
pub struct RosterFeed<S: DirectoryStore> {
    store: S,
    registry: Registry,
    active: Option<Subscription>,
}

impl<S: DirectoryStore> RosterFeed<S> {
    /// Creates an idle feed for one registry. Nothing is subscribed until
    /// [`watch`](Self::watch) is called.
    pub fn new(store: S, registry: Registry) -> Self {
        Self {
            store,
            registry,
            active: None,
        }
    }

    /// Which registry this feed serves.
    pub fn registry(&self) -> Registry {
        self.registry
    }

    /// Returns `true` while a live subscription is held.
    pub fn is_watching(&self) -> bool {
        self.active.is_some()
    }

    /// Establishes the live subscription and returns the consumer channel.
    ///
    /// Any prior subscription is cancelled first — at most one may be live
    /// per feed at any time. The superseded consumer's channel closes once
    /// its forwarding task drains; it receives no further snapshots.
    ///
    /// # Errors
    /// [`RosterError::Subscribe`] if the store rejects the subscription.
    /// The feed is left idle; nothing retries automatically.
    pub async fn watch(&mut self) -> Result<RosterReceiver, RosterError> {
        if let Some(previous) = self.active.take() {
            previous.cancel();
            tracing::debug!(
                registry = %self.registry,
                "previous subscription cancelled before re-watch"
            );
        }

        let (signal_tx, signal_rx) = mpsc::unbounded_channel();
        let subscription = self
            .store
            .subscribe(self.registry, signal_tx)
            .await
            .map_err(RosterError::Subscribe)?;

        let (event_tx, event_rx) = mpsc::unbounded_channel();
        tokio::spawn(forward(self.registry, signal_rx, event_tx));

        self.active = Some(subscription);
        tracing::info!(registry = %self.registry, "roster feed watching");
        Ok(event_rx)
    }

    /// Cancels the live subscription, if any. Idempotent.
    pub fn stop(&mut self) {
        if let Some(subscription) = self.active.take() {
            subscription.cancel();
            tracing::info!(registry = %self.registry, "roster feed stopped");
        }
    }
}

/// Forwarding task: rebuilds a complete ordered snapshot per change signal.
///
/// Ends when the store side closes (cancelled subscription) or after a
/// terminal loss; either way the consumer channel closes behind it.
async fn forward(
    registry: Registry,
    mut signals: mpsc::UnboundedReceiver<StoreSignal>,
    events: mpsc::UnboundedSender<RosterEvent>,
) {
    while let Some(signal) = signals.recv().await {
        let event = match signal {
            StoreSignal::Changed(entries) => {
                let snapshot = RosterSnapshot::build(registry, entries);
                tracing::debug!(
                    %registry,
                    entries = snapshot.len(),
                    "roster snapshot rebuilt"
                );
                RosterEvent::Snapshot(snapshot)
            }
            StoreSignal::Lost(reason) => {
                tracing::warn!(%registry, %reason, "roster subscription lost");
                let _ = events.send(RosterEvent::Lost(reason));
                break;
            }
        };

        if events.send(event).is_err() {
            // Consumer hung up; nothing left to feed.
            break;
        }
    }

    tracing::debug!(%registry, "roster forwarding task ended");
}

// =========================================================================
// Tests
// =========================================================================
