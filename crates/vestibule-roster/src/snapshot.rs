//! Ordered snapshots and the events a roster consumer receives.

use std::cmp::Reverse;

use vestibule_directory::{Entry, Registry};

/// A complete, ordered view of one registry at a moment in time.
///
/// Always the full entry set, never a diff: downstream rendering replaces
/// its whole table per snapshot, so it can never accumulate stale rows.
/// Revoked entries are included — the operator sees them; only the
/// admission gate treats them as nonexistent.
#[derive(Debug, Clone, PartialEq)]
pub struct RosterSnapshot {
    registry: Registry,
    entries: Vec<Entry>,
}

impl RosterSnapshot {
    /// Builds a snapshot from an unordered document set.
    ///
    /// Orders by `created_at` descending (newest first), breaking ties by
    /// code so the order is total and stable across rebuilds.
    pub fn build(registry: Registry, mut entries: Vec<Entry>) -> Self {
        entries.sort_by(|a, b| {
            Reverse(a.created_at)
                .cmp(&Reverse(b.created_at))
                .then_with(|| a.code.as_str().cmp(b.code.as_str()))
        });
        Self { registry, entries }
    }

    /// Which registry this snapshot describes.
    pub fn registry(&self) -> Registry {
        self.registry
    }

    /// The ordered entries, newest first.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Number of entries — the visible count next to the operator table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// What a roster consumer receives on its channel.
#[derive(Debug, Clone)]
pub enum RosterEvent {
    /// A fresh complete snapshot. Replaces everything shown so far.
    Snapshot(RosterSnapshot),
    /// The live subscription died. Terminal: the channel closes after
    /// this, and nothing retries — surfacing the failure to the operator
    /// is preferred over silent staleness.
    Lost(String),
}

// =========================================================================
// Tests
// =========================================================================
