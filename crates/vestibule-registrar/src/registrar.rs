//! The registration writer.

use rand::Rng;

use vestibule_directory::{Code, DirectoryStore, Entry, Registry};

use crate::RegistrationError;

/// Characters a suggested code draws from — the same alphabet
/// [`Code::parse`] accepts.
const CODE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Writes validated entries into a registry.
///
/// Validation runs in order and short-circuits: name first, then code
/// format — a failed check means no store call happened. The write itself
/// is check-then-create: a point read gives the operator a precise
/// duplicate error, and the store's atomic create-if-absent resolves the
/// race two concurrent writers can still hit between check and create.
/// Exactly one of them wins; the other sees
/// [`RegistrationError::CodeAlreadyExists`].
pub struct Registrar<S: DirectoryStore> {
    store: S,
}

impl<S: DirectoryStore> Registrar<S> {
    /// Creates a registrar over a store handle.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Validates and registers a new entry.
    ///
    /// Normalization: `name` is trimmed; `raw_code` is trimmed and
    /// uppercased by [`Code::parse`].
    ///
    /// No optimistic local update follows a success — the live roster
    /// subscription is how the new entry becomes visible.
    ///
    /// # Errors
    /// - [`RegistrationError::NameRequired`] — empty name (no store call)
    /// - [`RegistrationError::InvalidCodeFormat`] — bad code (no store call)
    /// - [`RegistrationError::CodeAlreadyExists`] — key taken, active or not
    /// - [`RegistrationError::Store`] — the store could not be reached
    pub async fn register(
        &self,
        registry: Registry,
        name: &str,
        raw_code: &str,
    ) -> Result<Entry, RegistrationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RegistrationError::NameRequired);
        }
        let code = Code::parse(raw_code)?;

        if self.store.get(registry, &code).await?.is_some() {
            return Err(RegistrationError::CodeAlreadyExists(code));
        }

        let entry = self.store.create_if_absent(registry, &code, name).await?;
        tracing::info!(%registry, %code, name, "entry registered");
        Ok(entry)
    }

    /// Removes an entry. Operator-only; idempotent like the store delete.
    ///
    /// # Errors
    /// [`RegistrationError::InvalidCodeFormat`] for a malformed code (no
    /// store call), otherwise store outcomes.
    pub async fn remove(
        &self,
        registry: Registry,
        raw_code: &str,
    ) -> Result<(), RegistrationError> {
        let code = Code::parse(raw_code)?;
        self.store.delete(registry, &code).await?;
        Ok(())
    }

    /// Revokes or restores an entry without deleting it.
    ///
    /// A revoked entry stays in the operator roster but reads as
    /// nonexistent to the admission gate.
    pub async fn set_active(
        &self,
        registry: Registry,
        raw_code: &str,
        active: bool,
    ) -> Result<(), RegistrationError> {
        let code = Code::parse(raw_code)?;
        self.store.set_active(registry, &code, active).await?;
        Ok(())
    }

    /// Suggests a random code of the given length for the operator form.
    ///
    /// The length is clamped into the valid range. A suggestion is only a
    /// suggestion: uniqueness is still settled by [`register`], which may
    /// reject it if an operator got there first.
    ///
    /// [`register`]: Self::register
    pub fn suggest_code(&self, len: usize) -> String {
        let len = len.clamp(Code::MIN_LEN, Code::MAX_LEN);
        let mut rng = rand::rng();
        (0..len)
            .map(|_| {
                let idx = rng.random_range(0..CODE_CHARSET.len());
                CODE_CHARSET[idx] as char
            })
            .collect()
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use vestibule_directory::MemoryStore;

    use super::*;

    fn registrar() -> (Registrar<MemoryStore>, MemoryStore) {
        let store = MemoryStore::new();
        (Registrar::new(store.clone()), store)
    }

    // =====================================================================
    // register()
    // =====================================================================

    #[tokio::test]
    async fn test_register_valid_pair_creates_active_entry() {
        let (registrar, store) = registrar();

        let entry = registrar
            .register(Registry::Players, "Ada", "ab1")
            .await
            .expect("register");

        assert_eq!(entry.code.as_str(), "AB1", "code is normalized");
        assert_eq!(entry.name, "Ada");
        assert!(entry.active);
        assert_eq!(store.len(Registry::Players), 1);
    }

    #[tokio::test]
    async fn test_register_trims_name() {
        let (registrar, _store) = registrar();

        let entry = registrar
            .register(Registry::Players, "  Ada  ", "AB1")
            .await
            .expect("register");

        assert_eq!(entry.name, "Ada");
    }

    #[tokio::test]
    async fn test_register_empty_name_fails_before_code_check() {
        // Validation order matters: a blank name reports NameRequired even
        // when the code is also malformed.
        let (registrar, _store) = registrar();

        let result = registrar.register(Registry::Players, "   ", "x").await;

        assert!(matches!(result, Err(RegistrationError::NameRequired)));
    }

    #[tokio::test]
    async fn test_register_malformed_code_fails() {
        let (registrar, store) = registrar();

        let result = registrar
            .register(Registry::Players, "Ada", "ab-1")
            .await;

        assert!(matches!(
            result,
            Err(RegistrationError::InvalidCodeFormat(_))
        ));
        assert!(store.is_empty(Registry::Players));
    }

    #[tokio::test]
    async fn test_register_duplicate_fails_and_size_grows_by_one() {
        let (registrar, store) = registrar();
        registrar
            .register(Registry::Players, "Ada", "AB1")
            .await
            .expect("first register");

        let result = registrar
            .register(Registry::Players, "Brian", "AB1")
            .await;

        assert!(matches!(
            result,
            Err(RegistrationError::CodeAlreadyExists(_))
        ));
        assert_eq!(store.len(Registry::Players), 1);
    }

    #[tokio::test]
    async fn test_register_duplicate_differs_only_by_case_fails() {
        // "ab1" normalizes to the same key as "AB1".
        let (registrar, _store) = registrar();
        registrar
            .register(Registry::Players, "Ada", "AB1")
            .await
            .expect("first register");

        let result = registrar
            .register(Registry::Players, "Brian", " ab1 ")
            .await;

        assert!(matches!(
            result,
            Err(RegistrationError::CodeAlreadyExists(_))
        ));
    }

    #[tokio::test]
    async fn test_register_revoked_code_is_not_resurrected() {
        let (registrar, _store) = registrar();
        registrar
            .register(Registry::Players, "Ada", "AB1")
            .await
            .expect("register");
        registrar
            .set_active(Registry::Players, "AB1", false)
            .await
            .expect("revoke");

        let result = registrar
            .register(Registry::Players, "Ada again", "AB1")
            .await;

        assert!(matches!(
            result,
            Err(RegistrationError::CodeAlreadyExists(_))
        ));
    }

    // =====================================================================
    // remove() / set_active()
    // =====================================================================

    #[tokio::test]
    async fn test_remove_deletes_entry() {
        let (registrar, store) = registrar();
        registrar
            .register(Registry::Players, "Ada", "AB1")
            .await
            .expect("register");

        registrar
            .remove(Registry::Players, "ab1")
            .await
            .expect("remove");

        assert!(store.is_empty(Registry::Players));
    }

    #[tokio::test]
    async fn test_remove_malformed_code_fails_locally() {
        let (registrar, _store) = registrar();
        let result = registrar.remove(Registry::Players, "!").await;
        assert!(matches!(
            result,
            Err(RegistrationError::InvalidCodeFormat(_))
        ));
    }

    // =====================================================================
    // suggest_code()
    // =====================================================================

    #[test]
    fn test_suggest_code_produces_valid_codes() {
        let (registrar, _store) = registrar();

        for len in [0, 3, 6, 16, 40] {
            let suggestion = registrar.suggest_code(len);
            let code = Code::parse(&suggestion)
                .expect("suggestions must satisfy the code format");
            assert_eq!(code.as_str(), suggestion, "already normalized");
        }
    }

    #[test]
    fn test_suggest_code_clamps_length() {
        let (registrar, _store) = registrar();
        assert_eq!(registrar.suggest_code(0).len(), Code::MIN_LEN);
        assert_eq!(registrar.suggest_code(99).len(), Code::MAX_LEN);
        assert_eq!(registrar.suggest_code(6).len(), 6);
    }
}
