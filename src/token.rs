//! Session-scoped token persistence

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Capability for persisting the session token across reloads within a
/// browsing session.
///
/// The store is injected into [`crate::store::Store`] at construction so
/// tests can substitute a fake. Calls are synchronous: `load` runs once
/// when the store is built, `save` and `clear` run inside atomic state
/// transitions after a successful login/registration and on logout.
#[cfg_attr(test, mockall::automock)]
pub trait TokenStore: Send + Sync {
    /// Token surviving from a prior session, if any.
    fn load(&self) -> Option<String>;

    /// Persist the token issued by a successful login or registration.
    fn save(&self, token: &str);

    /// Remove the persisted token.
    fn clear(&self);
}

/// In-process token store. Lives for the process, not across restarts,
/// which is the native analog of session-scoped browser storage.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self) -> MutexGuard<'_, Option<String>> {
        self.token.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<String> {
        self.slot().clone()
    }

    fn save(&self, token: &str) {
        *self.slot() = Some(token.to_string());
    }

    fn clear(&self) {
        *self.slot() = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_load_clear() {
        let store = MemoryTokenStore::new();
        assert_eq!(store.load(), None);
        store.save("T1");
        assert_eq!(store.load().as_deref(), Some("T1"));
        store.clear();
        assert_eq!(store.load(), None);
    }
}
