//! Core registry types: which registry, keyed by what, holding what.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::InvalidCode;

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// The two registries the directory keeps.
///
/// Each registry is an independent keyed collection of [`Entry`] documents.
/// A code only needs to be unique *within* its registry — a player and an
/// arena may share a code without conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Registry {
    /// People who may be admitted through the gate.
    Players,
    /// Shared session venues. Membership semantics beyond the entry itself
    /// are out of scope for the directory.
    Arenas,
}

impl Registry {
    /// The store collection name backing this registry.
    pub fn collection(self) -> &'static str {
        match self {
            Self::Players => "players",
            Self::Arenas => "arenas",
        }
    }
}

impl fmt::Display for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.collection())
    }
}

// ---------------------------------------------------------------------------
// Code
// ---------------------------------------------------------------------------

/// A validated registration code: 3–16 uppercase letters and digits.
///
/// A `Code` is the primary key of an [`Entry`] — keying on it is what makes
/// codes unique within a registry. Construction goes through
/// [`Code::parse`], which normalizes (trim + uppercase) before validating,
/// so `" ab1 "` and `"AB1"` produce the same key. Once constructed, a code
/// never changes.
///
/// Serde round-trips go through the same validation (`try_from = "String"`),
/// so a code read back from a stored document or a cached session is checked
/// again rather than trusted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Code(String);

impl Code {
    /// Minimum accepted length after normalization.
    pub const MIN_LEN: usize = 3;
    /// Maximum accepted length after normalization.
    pub const MAX_LEN: usize = 16;

    /// Normalizes and validates a raw code.
    ///
    /// Trims surrounding whitespace, uppercases, then requires
    /// `^[A-Z0-9]{3,16}$`.
    ///
    /// # Errors
    /// Returns [`InvalidCode`] if the normalized string is out of range or
    /// contains anything other than `A–Z` / `0–9`.
    pub fn parse(raw: &str) -> Result<Self, InvalidCode> {
        let normalized = raw.trim().to_ascii_uppercase();

        if normalized.len() < Self::MIN_LEN || normalized.len() > Self::MAX_LEN {
            return Err(InvalidCode);
        }
        if !normalized
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        {
            return Err(InvalidCode);
        }

        Ok(Self(normalized))
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Code {
    type Error = InvalidCode;

    fn try_from(raw: String) -> Result<Self, InvalidCode> {
        Self::parse(&raw)
    }
}

impl From<Code> for String {
    fn from(code: Code) -> String {
        code.0
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Entry
// ---------------------------------------------------------------------------

/// One record in a registry.
///
/// The store owns the authoritative copy. Field semantics:
///
/// - `code` — primary key; uniqueness within the registry comes from
///   keying the document on it.
/// - `name` — operator-supplied display string; trimmed by the registrar
///   but otherwise not normalized.
/// - `active` — `true` at creation. `false` marks the entry revoked: the
///   admission gate treats it as nonexistent while the operator roster
///   still shows the record.
/// - `created_at` — store-assigned monotonic sequence value, set once at
///   creation and never by a client. Used only for presentation ordering
///   (newest first); a client-supplied clock could reorder the live list,
///   which is why the store assigns it.
///
/// Serialized with camelCase field names to match the stored document
/// shape (`createdAt` on the wire).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    /// Primary key.
    pub code: Code,
    /// Display name.
    pub name: String,
    /// `false` means revoked — invisible to admission, visible to operators.
    pub active: bool,
    /// Store-assigned creation sequence number.
    pub created_at: u64,
}

// =========================================================================
// Tests
// =========================================================================
