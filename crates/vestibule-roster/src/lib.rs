//! Live ordered registry views for Vestibule.
//!
//! A [`RosterFeed`] keeps one registry's entries visible in real time: it
//! holds at most one live store subscription, turns every change signal
//! into a complete ordered snapshot (newest first), and pushes those
//! snapshots to whoever renders them.
//!
//! # Key types
//!
//! - [`RosterFeed`] — owns the subscription lifecycle (watch, re-watch,
//!   stop)
//! - [`RosterSnapshot`] — a full ordered view of the registry, never a diff
//! - [`RosterEvent`] — what a consumer receives (snapshots, or a terminal
//!   loss notice)
//! - [`RosterError`] — why a subscription could not be established

mod error;
mod feed;
mod snapshot;

pub use error::RosterError;
pub use feed::{RosterFeed, RosterReceiver};
pub use snapshot::{RosterEvent, RosterSnapshot};
