//! Admission gating for Vestibule.
//!
//! This crate decides whether a presented code yields a usable session:
//!
//! 1. **State machine** ([`AdmissionGate`]) — Unauthenticated, Pending,
//!    Admitted, with sequence-numbered attempts so a superseded resolution
//!    can never clobber the latest user intent.
//! 2. **Session cache** ([`SessionCache`] trait) — the durable local
//!    `{code, name}` record that survives restarts. Never a trust
//!    boundary: everything loaded from it is re-validated through the
//!    gate before being treated as admitted.
//!
//! # How it fits in the stack
//!
//! ```text
//! Lobby flow (above)  ← drives the gate against the directory store
//!     ↕
//! Gate layer (this crate)  ← pure admission decisions + cached session
//!     ↕
//! Directory layer (below)  ← resolves codes to entries
//! ```

#![allow(async_fn_in_trait)]

mod cache;
mod error;
mod gate;

pub use cache::{FileSessionCache, MemorySessionCache, SessionCache};
pub use error::GateError;
pub use gate::{AdmissionGate, AdmissionOutcome, GateState, SessionRecord};
