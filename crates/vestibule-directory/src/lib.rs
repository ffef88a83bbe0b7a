//! Directory store abstraction for Vestibule.
//!
//! A *directory* is a small set of uniquely-keyed registries (players,
//! arenas). This crate defines the vocabulary the rest of the workspace
//! speaks:
//!
//! - **Types** ([`Registry`], [`Code`], [`Entry`]) — what lives in a
//!   registry and how entries are keyed.
//! - **Store** ([`DirectoryStore`] trait, [`Subscription`]) — the abstract
//!   keyed-document capability: point reads, atomic create-if-absent,
//!   deletes, revocation, and push-based live subscriptions.
//! - **Reference implementation** ([`MemoryStore`]) — an in-process store
//!   that satisfies the full contract, used by tests and demos.
//!
//! # Architecture
//!
//! The directory layer knows nothing about admission or rendering. It only
//! answers "what is in this registry right now?" and "tell me when that
//! changes."
//!
//! ```text
//! Registrar / Gate (above)  ← write and resolve entries by code
//!     ↕
//! Directory layer (this crate)  ← keyed documents + live change signals
//! ```

#![allow(async_fn_in_trait)]

mod error;
mod memory;
mod store;
mod types;

pub use error::{DirectoryError, InvalidCode};
pub use memory::MemoryStore;
pub use store::{DirectoryStore, SignalSender, StoreSignal, Subscription};
pub use types::{Code, Entry, Registry};
